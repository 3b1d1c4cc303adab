//! Report Template Model

use serde::{Deserialize, Serialize};

use super::template::TemplateConfig;

/// Report template entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportTemplate {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub template: TemplateConfig,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_public: bool,
    pub created_by: Option<i64>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Create report template payload (server assigns the id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTemplateCreate {
    pub name: String,
    pub description: Option<String>,
    pub template: TemplateConfig,
    #[serde(default)]
    pub is_public: bool,
}

/// Update report template payload
///
/// `template` replaces the whole configuration; absent fields are left
/// untouched by the backend. `description: Some(None)` is sent as an
/// explicit `null` and clears the stored description.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportTemplateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// Tells a present `null` (`Some(None)`) apart from an absent field (`None`)
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

/// Template list query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for TemplateListQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl TemplateListQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Default::default()
        }
    }

    /// Query-string pairs, search omitted when blank
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            pairs.push(("search", search.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

/// One page of templates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedTemplates {
    pub data: Vec<ReportTemplate>,
    pub total: u64,
}

impl PaginatedTemplates {
    pub fn total_pages(&self, limit: u32) -> u64 {
        if limit == 0 {
            return 0;
        }
        self.total.div_ceil(limit as u64)
    }
}
