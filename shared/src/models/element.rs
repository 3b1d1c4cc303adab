//! Canvas element model
//!
//! An [`Element`] carries shared geometry/style/visibility and one
//! [`ElementContent`] variant. The element's type tag is the content
//! variant itself, so the two can never disagree:
//!
//! ```json
//! {
//!   "id": "text_1718000000000_k3j9x2a",
//!   "type": "text",
//!   "content": { "text": "Incident summary", "font": { ... } },
//!   "position": { "x": 10, "y": 10 },
//!   "size": { "width": 100, "height": 20 },
//!   "style": {},
//!   "locked": false,
//!   "visible": true,
//!   "z_index": 0
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::{FontConfig, HorizontalAlign, Position, Size, Style, VerticalAlign};

/// Element type tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Text,
    Image,
    Table,
    Shape,
    Line,
    DynamicField,
    Chart,
    Spacer,
}

impl ElementType {
    pub const ALL: [ElementType; 8] = [
        Self::Text,
        Self::Image,
        Self::Table,
        Self::Shape,
        Self::Line,
        Self::DynamicField,
        Self::Chart,
        Self::Spacer,
    ];

    /// Wire tag, also the element id prefix
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Table => "table",
            Self::Shape => "shape",
            Self::Line => "line",
            Self::DynamicField => "dynamic_field",
            Self::Chart => "chart",
            Self::Spacer => "spacer",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TEXT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextContent {
    pub text: String,
    #[serde(default)]
    pub font: FontConfig,
    #[serde(default)]
    pub align: HorizontalAlign,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    #[serde(default = "default_true")]
    pub word_wrap: bool,
    #[serde(default)]
    pub truncate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lines: Option<u32>,
}

// ============================================================================
// IMAGE
// ============================================================================

/// Where an image's `src` comes from
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageSourceKind {
    #[default]
    Url,
    Base64,
    File,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
    Fill,
    None,
    ScaleDown,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageContent {
    pub src: String,
    #[serde(default)]
    pub source_kind: ImageSourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default)]
    pub fit: ImageFit,
    #[serde(default)]
    pub image_position: ImagePosition,
}

// ============================================================================
// TABLE
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WidthUnit {
    #[default]
    Mm,
    Percent,
    Auto,
}

/// Per-cell / per-row style
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CellStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableColumn {
    pub field: String,
    pub label: String,
    pub width: f64,
    #[serde(default)]
    pub width_unit: WidthUnit,
    #[serde(default)]
    pub align: HorizontalAlign,
    /// Renderer format hint (e.g. a date pattern)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    In,
    Between,
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableContent {
    pub data_source: String,
    #[serde(default)]
    pub columns: Vec<TableColumn>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub sort: Vec<SortSpec>,
    #[serde(default = "default_true")]
    pub show_header: bool,
    #[serde(default)]
    pub alternate_row_colors: bool,
    #[serde(default)]
    pub show_row_numbers: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_style: Option<CellStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_style: Option<CellStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_row_style: Option<CellStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<u32>,
    #[serde(default)]
    pub paginate: bool,
}

impl TableContent {
    pub fn has_column(&self, field: &str) -> bool {
        self.columns.iter().any(|c| c.field == field)
    }
}

// ============================================================================
// SHAPE / LINE
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Ellipse,
    Triangle,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShapeContent {
    pub shape: ShapeKind,
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineOrientation {
    #[default]
    Horizontal,
    Vertical,
    Diagonal,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineContent {
    pub orientation: LineOrientation,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_color: String,
    pub stroke_width: f64,
    #[serde(default)]
    pub line_style: LineStyle,
}

// ============================================================================
// DYNAMIC FIELD
// ============================================================================

/// Value computed at render time
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DynamicFieldKind {
    #[default]
    Date,
    Datetime,
    PageNumber,
    TotalPages,
    UserName,
    ReportName,
    Custom,
}

impl DynamicFieldKind {
    /// Kinds whose rendering honours `date_format`
    pub const fn uses_date_format(&self) -> bool {
        matches!(self, Self::Date | Self::Datetime)
    }

    /// Kinds whose rendering honours `custom_value`
    pub const fn uses_custom_value(&self) -> bool {
        matches!(self, Self::Custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DynamicFieldContent {
    pub field_kind: DynamicFieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default)]
    pub font: FontConfig,
    #[serde(default)]
    pub align: HorizontalAlign,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_value: Option<String>,
}

// ============================================================================
// CHART
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Doughnut,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Count,
    Sum,
    Avg,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartContent {
    pub chart_kind: ChartKind,
    pub data_source: String,
    #[serde(default)]
    pub x_field: String,
    #[serde(default)]
    pub y_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default = "default_true")]
    pub show_legend: bool,
    #[serde(default)]
    pub show_labels: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

/// Spacer has no payload; it reserves vertical room in the flow
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SpacerContent {}

// ============================================================================
// CONTENT UNION
// ============================================================================

/// Type-specific element payload, tagged by element type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum ElementContent {
    Text(TextContent),
    Image(ImageContent),
    Table(TableContent),
    Shape(ShapeContent),
    Line(LineContent),
    DynamicField(DynamicFieldContent),
    Chart(ChartContent),
    Spacer(SpacerContent),
}

impl ElementContent {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Text(_) => ElementType::Text,
            Self::Image(_) => ElementType::Image,
            Self::Table(_) => ElementType::Table,
            Self::Shape(_) => ElementType::Shape,
            Self::Line(_) => ElementType::Line,
            Self::DynamicField(_) => ElementType::DynamicField,
            Self::Chart(_) => ElementType::Chart,
            Self::Spacer(_) => ElementType::Spacer,
        }
    }

    /// Data source the content binds to (tables and charts)
    pub fn data_source(&self) -> Option<&str> {
        match self {
            Self::Table(t) => Some(&t.data_source),
            Self::Chart(c) => Some(&c.data_source),
            _ => None,
        }
    }
}

// ============================================================================
// ELEMENT
// ============================================================================

fn default_true() -> bool {
    true
}

/// One positioned, styled, typed unit of content on the canvas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    pub id: String,
    #[serde(flatten)]
    pub content: ElementContent,
    pub position: Position,
    pub size: Size,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub z_index: i32,
}

impl Element {
    pub fn element_type(&self) -> ElementType {
        self.content.element_type()
    }

    /// Placed by block flow instead of absolute coordinates
    pub fn is_flow(&self) -> bool {
        self.position.relative
    }

    /// Position/size may be changed interactively
    pub fn is_movable(&self) -> bool {
        !self.locked && !self.position.relative
    }
}
