//! Geometry & style primitives
//!
//! Value objects for page settings and element placement. All lengths are
//! millimeters unless stated otherwise.

use serde::{Deserialize, Serialize};

/// Paper size
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
    Legal,
    A3,
}

impl PaperSize {
    /// Portrait (width, height) in millimeters
    pub const fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::Letter => (215.9, 279.4),
            Self::Legal => (215.9, 355.6),
            Self::A3 => (297.0, 420.0),
        }
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(20.0)
    }
}

impl Margins {
    pub const fn uniform(mm: f64) -> Self {
        Self {
            top: mm,
            right: mm,
            bottom: mm,
            left: mm,
        }
    }
}

/// Page settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageSettings {
    #[serde(default)]
    pub paper_size: PaperSize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub margins: Margins,
    /// Explicit page width, overrides the paper size table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Explicit page height, overrides the paper size table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl PageSettings {
    /// Rendered page (width, height) in millimeters.
    ///
    /// Landscape swaps the paper's portrait dimensions; explicit
    /// `width`/`height` win over the table.
    pub fn page_size_mm(&self) -> (f64, f64) {
        let (w, h) = self.paper_size.dimensions_mm();
        let (w, h) = match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        };
        (self.width.unwrap_or(w), self.height.unwrap_or(h))
    }

    pub fn page_width_mm(&self) -> f64 {
        self.page_size_mm().0
    }

    pub fn page_height_mm(&self) -> f64 {
        self.page_size_mm().1
    }

    /// Content box (width, height) inside the margins, never negative
    pub fn content_size_mm(&self) -> (f64, f64) {
        let (w, h) = self.page_size_mm();
        let m = &self.margins;
        (
            (w - m.left - m.right).max(0.0),
            (h - m.top - m.bottom).max(0.0),
        )
    }

    /// Reject negative margins or non-positive explicit dimensions
    pub fn validate(&self) -> Result<(), String> {
        let m = &self.margins;
        for (name, value) in [
            ("top", m.top),
            ("right", m.right),
            ("bottom", m.bottom),
            ("left", m.left),
        ] {
            if !(value >= 0.0) {
                return Err(format!("margin {name} must be >= 0 (got {value})"));
            }
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if let Some(v) = value
                && !(v > 0.0)
            {
                return Err(format!("page {name} must be > 0 (got {v})"));
            }
        }
        Ok(())
    }
}

/// Anchor point of an element (alignment reference)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Element position relative to the enclosing region's content box
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub anchor: Anchor,
    /// Element takes part in block flow; `x`/`y` are not used for placement
    #[serde(default)]
    pub relative: bool,
}

impl Position {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    /// Block-flow position (tables)
    pub fn flow() -> Self {
        Self {
            relative: true,
            ..Default::default()
        }
    }

    /// Shift by a delta, clamped so neither axis goes below zero
    pub fn offset_clamped(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: (self.x + dx).max(0.0),
            y: (self.y + dy).max(0.0),
            ..*self
        }
    }
}

/// Element size. A width of 0 means auto.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
    /// Height is computed by the renderer from the content
    #[serde(default)]
    pub auto_height: bool,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            auto_height: false,
        }
    }

    pub fn is_auto_width(&self) -> bool {
        self.width == 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: String,
}

/// Per-side padding
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Element box style. Absent fields inherit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

/// Font settings shared by text-bearing content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FontConfig {
    pub family: String,
    /// Point size
    pub size: f64,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default)]
    pub style: FontStyle,
    pub color: String,
    pub line_height: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            size: 12.0,
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
            color: "#000000".to_string(),
            line_height: 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}
