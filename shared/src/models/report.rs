//! Report preview / generation requests

use serde::{Deserialize, Serialize};
use std::fmt;

use super::element::{Filter, SortSpec};
use super::template::TemplateConfig;

/// Downloadable artifact format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Xlsx,
}

impl ReportFormat {
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
        }
    }

    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            other => Err(format!("unsupported report format: {other}")),
        }
    }
}

/// Render an unsaved configuration against live data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewRequest {
    pub template: TemplateConfig,
    pub data_source: String,
    pub row_limit: u32,
}

/// Produce a downloadable artifact from a saved template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateRequest {
    pub template_id: i64,
    pub data_source: String,
    pub format: ReportFormat,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorting: Vec<SortSpec>,
    /// Per-request TemplateConfig overrides, merged by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<serde_json::Value>,
}

/// Binary document returned by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub content_type: String,
    /// From `Content-Disposition`, when the backend sends one
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Turn a template name into a safe download file name
pub fn report_file_name(name: &str, format: ReportFormat) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches('_');
    let stem = if stem.is_empty() { "report" } else { stem };
    format!("{}.{}", stem, format.extension())
}
