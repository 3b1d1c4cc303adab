//! Template configuration aggregate
//!
//! [`TemplateConfig`] is the unit persisted by the backend, rendered on the
//! canvas and sent along with preview requests.

use serde::{Deserialize, Serialize};

use super::element::Element;
use super::geometry::{FontConfig, PageSettings};

pub const PAGE_PLACEHOLDER: &str = "{page}";
pub const TOTAL_PLACEHOLDER: &str = "{total}";

fn default_true() -> bool {
    true
}

fn default_region_height() -> f64 {
    20.0
}

fn default_page_number_format() -> String {
    format!("Page {} of {}", PAGE_PLACEHOLDER, TOTAL_PLACEHOLDER)
}

/// Page header region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Header {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_region_height")]
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default = "default_true")]
    pub show_on_all_pages: bool,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            enabled: false,
            height: default_region_height(),
            background_color: None,
            elements: Vec::new(),
            show_on_all_pages: true,
        }
    }
}

/// Page footer region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Footer {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_region_height")]
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default = "default_true")]
    pub show_on_all_pages: bool,
    #[serde(default = "default_true")]
    pub show_page_number: bool,
    /// Supports `{page}` and `{total}` placeholders
    #[serde(default = "default_page_number_format")]
    pub page_number_format: String,
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            enabled: false,
            height: default_region_height(),
            background_color: None,
            elements: Vec::new(),
            show_on_all_pages: true,
            show_page_number: true,
            page_number_format: default_page_number_format(),
        }
    }
}

impl Footer {
    /// Render the page-number label, `None` when page numbers are hidden
    pub fn format_page_number(&self, page: u32, total: u32) -> Option<String> {
        if !self.show_page_number {
            return None;
        }
        Some(
            self.page_number_format
                .replace(PAGE_PLACEHOLDER, &page.to_string())
                .replace(TOTAL_PLACEHOLDER, &total.to_string()),
        )
    }
}

/// Template-wide style defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GlobalStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// Complete, serializable description of one report layout
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TemplateConfig {
    #[serde(default)]
    pub page: PageSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Footer>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_styles: Option<GlobalStyles>,
}

impl TemplateConfig {
    /// Header that contributes to layout (present and enabled)
    pub fn effective_header(&self) -> Option<&Header> {
        self.header.as_ref().filter(|h| h.enabled)
    }

    /// Footer that contributes to layout (present and enabled)
    pub fn effective_footer(&self) -> Option<&Footer> {
        self.footer.as_ref().filter(|f| f.enabled)
    }

    /// Body height available between the margins and enabled regions
    pub fn body_height_mm(&self) -> f64 {
        let (_, content_height) = self.page.content_size_mm();
        let header = self.effective_header().map_or(0.0, |h| h.height);
        let footer = self.effective_footer().map_or(0.0, |f| f.height);
        (content_height - header - footer).max(0.0)
    }

    /// Every element of every region, body first
    pub fn all_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .chain(self.header.iter().flat_map(|h| h.elements.iter()))
            .chain(self.footer.iter().flat_map(|f| f.elements.iter()))
    }

    /// Data source of the first body table, if any
    pub fn primary_data_source(&self) -> Option<&str> {
        self.elements.iter().find_map(|el| match &el.content {
            super::element::ElementContent::Table(t) => Some(t.data_source.as_str()),
            _ => None,
        })
    }

    /// Structural checks the canvas cannot enforce by construction
    pub fn validate(&self) -> Result<(), String> {
        self.page.validate()?;
        let mut seen = std::collections::HashSet::new();
        for el in self.all_elements() {
            if el.id.is_empty() {
                return Err(format!("{} element has an empty id", el.element_type()));
            }
            if !seen.insert(el.id.as_str()) {
                return Err(format!("duplicate element id {}", el.id));
            }
        }
        for (name, height) in [
            ("header", self.header.as_ref().map(|h| h.height)),
            ("footer", self.footer.as_ref().map(|f| f.height)),
        ] {
            if let Some(h) = height
                && h < 0.0
            {
                return Err(format!("{name} height must be >= 0 (got {h})"));
            }
        }
        Ok(())
    }
}
