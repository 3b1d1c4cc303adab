//! Properties panel controller
//!
//! Binds the panel to whichever element is selected. Shared fields go
//! through [`CanvasEngine::update_element`]; content edits rebuild the whole
//! content and go through [`CanvasEngine::update_content`].

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use shared::models::{
    ChartContent, DataSourceCatalog, DynamicFieldContent, DynamicFieldKind, ElementContent,
    ElementType, FieldDescriptor, FontConfig, HorizontalAlign, ImageContent, ImageSourceKind,
    LineContent, Position, ShapeContent, Size, Style, TableColumn, TableContent, TextContent,
    WidthUnit,
};

use crate::canvas::{CanvasEngine, ElementPatch, Region};
use crate::error::{DesignerError, DesignerResult};
use crate::factory::DEFAULT_DATE_FORMAT;

/// Width of a newly added table column, mm
pub const DEFAULT_COLUMN_WIDTH_MM: f64 = 30.0;

/// Image source input shown in the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageInputMode {
    Url,
    Upload,
}

impl ImageInputMode {
    fn of(kind: ImageSourceKind) -> Self {
        match kind {
            ImageSourceKind::Url => Self::Url,
            ImageSourceKind::Base64 | ImageSourceKind::File => Self::Upload,
        }
    }
}

/// Type-specific part of the panel
#[derive(Debug, Clone, PartialEq)]
pub enum ContentForm {
    Text(TextContent),
    Image {
        content: ImageContent,
        mode: ImageInputMode,
    },
    Table {
        content: TableContent,
        /// Catalog fields not yet used as a column
        available_fields: Vec<FieldDescriptor>,
    },
    Shape(ShapeContent),
    Line(LineContent),
    DynamicField {
        content: DynamicFieldContent,
        show_format_input: bool,
        show_custom_input: bool,
    },
    Chart {
        content: ChartContent,
        fields: Vec<FieldDescriptor>,
    },
    Spacer,
}

/// Everything the panel renders for the selected element
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub region: Region,
    pub id: String,
    pub element_type: ElementType,
    pub position: Position,
    pub size: Size,
    pub style: Style,
    pub locked: bool,
    pub visible: bool,
    pub z_index: i32,
    /// False while locked; only the lock toggle and duplicate stay active
    pub editable: bool,
    pub content: ContentForm,
}

/// Image file read for upload, ready to be inlined as a data URI
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Read `path` asynchronously; the mime type comes from the extension
    pub async fn read(path: impl AsRef<Path>) -> DesignerResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let mime_type = image_mime_type(&extension).ok_or_else(|| {
            DesignerError::Validation(format!("Unsupported image type: {}", path.display()))
        })?;
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::debug!(file = %file_name, bytes = bytes.len(), "Image read for upload");
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

fn image_mime_type(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "svg" => Some("image/svg+xml"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

fn not_applicable(edit: &str, content: &ElementContent) -> DesignerError {
    DesignerError::NotApplicable(format!(
        "{} does not apply to {} elements",
        edit,
        content.element_type()
    ))
}

/// Panel controller over the engine's current selection
pub struct PropertiesPanel<'a> {
    engine: &'a mut CanvasEngine,
    catalog: &'a DataSourceCatalog,
}

impl<'a> PropertiesPanel<'a> {
    pub fn new(engine: &'a mut CanvasEngine, catalog: &'a DataSourceCatalog) -> Self {
        Self { engine, catalog }
    }

    /// Panel contents, `None` without a selection
    pub fn view(&self) -> Option<PanelView> {
        let (region, el) = self.engine.selected()?;
        let content = match &el.content {
            ElementContent::Text(t) => ContentForm::Text(t.clone()),
            ElementContent::Image(i) => ContentForm::Image {
                content: i.clone(),
                mode: ImageInputMode::of(i.source_kind),
            },
            ElementContent::Table(t) => ContentForm::Table {
                available_fields: self
                    .fields_of(&t.data_source)
                    .filter(|f| !t.has_column(&f.field))
                    .cloned()
                    .collect(),
                content: t.clone(),
            },
            ElementContent::Shape(s) => ContentForm::Shape(s.clone()),
            ElementContent::Line(l) => ContentForm::Line(l.clone()),
            ElementContent::DynamicField(d) => ContentForm::DynamicField {
                show_format_input: d.field_kind.uses_date_format(),
                show_custom_input: d.field_kind.uses_custom_value(),
                content: d.clone(),
            },
            ElementContent::Chart(c) => ContentForm::Chart {
                fields: self.fields_of(&c.data_source).cloned().collect(),
                content: c.clone(),
            },
            ElementContent::Spacer(_) => ContentForm::Spacer,
        };
        Some(PanelView {
            region,
            id: el.id.clone(),
            element_type: el.element_type(),
            position: el.position,
            size: el.size,
            style: el.style.clone(),
            locked: el.locked,
            visible: el.visible,
            z_index: el.z_index,
            editable: !el.locked,
            content,
        })
    }

    fn fields_of(&self, data_source: &str) -> impl Iterator<Item = &FieldDescriptor> {
        self.catalog
            .get(data_source)
            .into_iter()
            .flat_map(|s| s.fields.iter())
    }

    fn target(&self) -> DesignerResult<(Region, String)> {
        self.engine
            .selected()
            .map(|(region, el)| (region, el.id.clone()))
            .ok_or(DesignerError::NoSelection)
    }

    /// Selected element, rejected while locked
    fn editable_target(&self) -> DesignerResult<(Region, String)> {
        let (region, el) = self.engine.selected().ok_or(DesignerError::NoSelection)?;
        if el.locked {
            return Err(DesignerError::ElementLocked(el.id.clone()));
        }
        Ok((region, el.id.clone()))
    }

    fn patch(&mut self, patch: ElementPatch) -> DesignerResult<()> {
        let (region, id) = self.editable_target()?;
        self.engine.update_element(region, &id, patch);
        Ok(())
    }

    fn style_patch(&mut self, f: impl FnOnce(&mut Style)) -> DesignerResult<()> {
        let (region, id) = self.editable_target()?;
        let mut style = self
            .engine
            .element(region, &id)
            .map(|el| el.style.clone())
            .unwrap_or_default();
        f(&mut style);
        self.engine.update_element(
            region,
            &id,
            ElementPatch {
                style: Some(style),
                ..Default::default()
            },
        );
        Ok(())
    }

    // ========== Shared fields ==========

    pub fn set_position(&mut self, x: f64, y: f64) -> DesignerResult<()> {
        let current = self.current_position()?;
        self.patch(ElementPatch::position(Position {
            x: x.max(0.0),
            y: y.max(0.0),
            ..current
        }))
    }

    fn current_position(&self) -> DesignerResult<Position> {
        self.engine
            .selected()
            .map(|(_, el)| el.position)
            .ok_or(DesignerError::NoSelection)
    }

    pub fn set_size(&mut self, width: f64, height: f64) -> DesignerResult<()> {
        if !(width >= 0.0 && height >= 0.0) {
            return Err(DesignerError::Validation(
                "Width and height must not be negative".to_string(),
            ));
        }
        let auto_height = self
            .engine
            .selected()
            .map(|(_, el)| el.size.auto_height)
            .ok_or(DesignerError::NoSelection)?;
        self.patch(ElementPatch::size(Size {
            width,
            height,
            auto_height,
        }))
    }

    /// Flip the lock flag; returns the new state
    pub fn toggle_lock(&mut self) -> DesignerResult<bool> {
        let (region, id) = self.target()?;
        let locked = self
            .engine
            .element(region, &id)
            .map(|el| !el.locked)
            .ok_or(DesignerError::NoSelection)?;
        self.engine.update_element(
            region,
            &id,
            ElementPatch {
                locked: Some(locked),
                ..Default::default()
            },
        );
        Ok(locked)
    }

    /// Duplicate the selected element; the copy becomes the selection
    pub fn duplicate(&mut self) -> DesignerResult<String> {
        let (region, id) = self.target()?;
        self.engine
            .duplicate_element(region, &id)
            .ok_or(DesignerError::NoSelection)
    }

    pub fn delete(&mut self) -> DesignerResult<()> {
        let (region, id) = self.editable_target()?;
        self.engine.delete_element(region, &id);
        Ok(())
    }

    pub fn set_background_color(&mut self, color: Option<String>) -> DesignerResult<()> {
        self.style_patch(|s| s.background_color = color)
    }

    pub fn set_border(&mut self, width: Option<f64>, color: Option<String>) -> DesignerResult<()> {
        if let Some(w) = width
            && !(w >= 0.0)
        {
            return Err(DesignerError::Validation(
                "Border width must not be negative".to_string(),
            ));
        }
        self.style_patch(|s| {
            s.border_width = width;
            s.border_color = color;
        })
    }

    pub fn set_visible(&mut self, visible: bool) -> DesignerResult<()> {
        self.patch(ElementPatch {
            visible: Some(visible),
            ..Default::default()
        })
    }

    pub fn set_z_index(&mut self, z_index: i32) -> DesignerResult<()> {
        self.patch(ElementPatch {
            z_index: Some(z_index),
            ..Default::default()
        })
    }

    // ========== Content ==========

    /// Rebuild the selected element's content with `f` and commit it.
    ///
    /// The result must keep the element's type.
    pub fn edit_content<R>(
        &mut self,
        f: impl FnOnce(&mut ElementContent) -> DesignerResult<R>,
    ) -> DesignerResult<R> {
        let (region, id) = self.editable_target()?;
        let mut content = self
            .engine
            .element(region, &id)
            .map(|el| el.content.clone())
            .ok_or(DesignerError::NoSelection)?;
        let expected = content.element_type();
        let out = f(&mut content)?;
        let found = content.element_type();
        if found != expected {
            return Err(DesignerError::ContentMismatch { expected, found });
        }
        self.engine.update_content(region, &id, content);
        Ok(out)
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> DesignerResult<()> {
        let text = text.into();
        self.edit_content(|c| match c {
            ElementContent::Text(t) => {
                t.text = text;
                Ok(())
            }
            other => Err(not_applicable("Text", other)),
        })
    }

    /// Font of text and dynamic field elements
    pub fn set_font(&mut self, font: FontConfig) -> DesignerResult<()> {
        self.edit_content(|c| match c {
            ElementContent::Text(t) => {
                t.font = font;
                Ok(())
            }
            ElementContent::DynamicField(d) => {
                d.font = font;
                Ok(())
            }
            other => Err(not_applicable("Font", other)),
        })
    }

    pub fn set_alignment(&mut self, align: HorizontalAlign) -> DesignerResult<()> {
        self.edit_content(|c| match c {
            ElementContent::Text(t) => {
                t.align = align;
                Ok(())
            }
            ElementContent::DynamicField(d) => {
                d.align = align;
                Ok(())
            }
            other => Err(not_applicable("Alignment", other)),
        })
    }

    // ----- table -----

    /// Append a column for `field` of the table's data source
    pub fn add_column(&mut self, field: &str) -> DesignerResult<()> {
        let catalog = self.catalog;
        self.edit_content(|c| {
            let ElementContent::Table(t) = c else {
                return Err(not_applicable("Columns", c));
            };
            if t.has_column(field) {
                return Err(DesignerError::DuplicateColumn(field.to_string()));
            }
            let descriptor =
                catalog
                    .field(&t.data_source, field)
                    .ok_or_else(|| DesignerError::UnknownField {
                        data_source: t.data_source.clone(),
                        field: field.to_string(),
                    })?;
            t.columns.push(TableColumn {
                field: descriptor.field.clone(),
                label: descriptor.label.clone(),
                width: DEFAULT_COLUMN_WIDTH_MM,
                width_unit: WidthUnit::Mm,
                align: HorizontalAlign::Left,
                format: None,
                style: None,
            });
            Ok(())
        })
    }

    pub fn remove_column(&mut self, index: usize) -> DesignerResult<TableColumn> {
        self.edit_content(|c| {
            let t = table_of(c)?;
            if index >= t.columns.len() {
                return Err(DesignerError::ColumnOutOfRange {
                    index,
                    len: t.columns.len(),
                });
            }
            Ok(t.columns.remove(index))
        })
    }

    pub fn set_column_alignment(
        &mut self,
        index: usize,
        align: HorizontalAlign,
    ) -> DesignerResult<()> {
        self.edit_content(|c| {
            let t = table_of(c)?;
            let len = t.columns.len();
            let column = t
                .columns
                .get_mut(index)
                .ok_or(DesignerError::ColumnOutOfRange { index, len })?;
            column.align = align;
            Ok(())
        })
    }

    // ----- image -----

    pub fn set_image_url(&mut self, url: impl Into<String>) -> DesignerResult<()> {
        let url = url.into();
        self.edit_image(|i| {
            i.src = url;
            i.source_kind = ImageSourceKind::Url;
        })
    }

    /// Switch the source input; a previous source of the other kind is dropped
    pub fn set_image_mode(&mut self, mode: ImageInputMode) -> DesignerResult<()> {
        self.edit_image(|i| {
            if ImageInputMode::of(i.source_kind) == mode {
                return;
            }
            i.src.clear();
            i.source_kind = match mode {
                ImageInputMode::Url => ImageSourceKind::Url,
                ImageInputMode::Upload => ImageSourceKind::Base64,
            };
        })
    }

    /// Inline an uploaded file as a base64 data URI
    pub fn apply_image_upload(&mut self, upload: &ImageUpload) -> DesignerResult<()> {
        let src = upload.data_uri();
        self.edit_image(|i| {
            i.src = src;
            i.source_kind = ImageSourceKind::Base64;
            if i.alt.is_none() {
                i.alt = Some(upload.file_name.clone());
            }
        })
    }

    fn edit_image(&mut self, f: impl FnOnce(&mut ImageContent)) -> DesignerResult<()> {
        self.edit_content(|c| match c {
            ElementContent::Image(i) => {
                f(i);
                Ok(())
            }
            other => Err(not_applicable("Image source", other)),
        })
    }

    // ----- dynamic field -----

    pub fn set_dynamic_kind(&mut self, kind: DynamicFieldKind) -> DesignerResult<()> {
        self.edit_dynamic("Field kind", |d| {
            d.field_kind = kind;
            if kind.uses_date_format() && d.date_format.is_none() {
                d.date_format = Some(DEFAULT_DATE_FORMAT.to_string());
            }
            Ok(())
        })
    }

    /// Only date and datetime fields take a format
    pub fn set_date_format(&mut self, format: impl Into<String>) -> DesignerResult<()> {
        let format = format.into();
        self.edit_dynamic("Date format", |d| {
            if !d.field_kind.uses_date_format() {
                return Err(DesignerError::NotApplicable(
                    "Date format only applies to date and datetime fields".to_string(),
                ));
            }
            d.date_format = Some(format);
            Ok(())
        })
    }

    /// Only custom fields take a literal value
    pub fn set_custom_value(&mut self, value: impl Into<String>) -> DesignerResult<()> {
        let value = value.into();
        self.edit_dynamic("Custom value", |d| {
            if !d.field_kind.uses_custom_value() {
                return Err(DesignerError::NotApplicable(
                    "Custom value only applies to custom fields".to_string(),
                ));
            }
            d.custom_value = Some(value);
            Ok(())
        })
    }

    fn edit_dynamic(
        &mut self,
        edit: &str,
        f: impl FnOnce(&mut DynamicFieldContent) -> DesignerResult<()>,
    ) -> DesignerResult<()> {
        self.edit_content(|c| match c {
            ElementContent::DynamicField(d) => f(d),
            other => Err(not_applicable(edit, other)),
        })
    }

    // ----- chart -----

    /// Bind chart axes (and optional grouping) to catalog fields
    pub fn set_chart_fields(
        &mut self,
        x_field: &str,
        y_field: &str,
        group_by: Option<&str>,
    ) -> DesignerResult<()> {
        let catalog = self.catalog;
        self.edit_content(|c| {
            let ElementContent::Chart(chart) = c else {
                return Err(not_applicable("Chart fields", c));
            };
            for field in [Some(x_field), Some(y_field), group_by].into_iter().flatten() {
                if catalog.field(&chart.data_source, field).is_none() {
                    return Err(DesignerError::UnknownField {
                        data_source: chart.data_source.clone(),
                        field: field.to_string(),
                    });
                }
            }
            chart.x_field = x_field.to_string();
            chart.y_field = y_field.to_string();
            chart.group_by = group_by.map(str::to_string);
            Ok(())
        })
    }
}

fn table_of(content: &mut ElementContent) -> DesignerResult<&mut TableContent> {
    match content {
        ElementContent::Table(t) => Ok(t),
        other => Err(not_applicable("Columns", other)),
    }
}
