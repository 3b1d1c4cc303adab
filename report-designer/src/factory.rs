//! Element factory
//!
//! Builds a complete, renderable element for each toolbox type.

use shared::models::{
    Aggregation, ChartContent, ChartKind, DynamicFieldContent, DynamicFieldKind, Element,
    ElementContent, ElementType, FontConfig, HorizontalAlign, ImageContent, LineContent,
    LineOrientation, LineStyle, Position, ShapeContent, ShapeKind, Size, SpacerContent, Style,
    TableContent, TextContent, VerticalAlign,
};
use shared::util::element_id;

pub const DEFAULT_TEXT: &str = "New text";
pub const DEFAULT_DATE_FORMAT: &str = "dd/MM/yyyy";

/// Default chart palette
pub const DEFAULT_CHART_COLORS: [&str; 6] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#06b6d4",
];

/// Create an element of `element_type` at (`x`, `y`) mm.
///
/// Tables and charts are bound to `data_source`. Tables ignore the point
/// and join the block flow.
pub fn create_element(element_type: ElementType, x: f64, y: f64, data_source: &str) -> Element {
    let (content, size, position) = match element_type {
        ElementType::Text => (
            ElementContent::Text(TextContent {
                text: DEFAULT_TEXT.to_string(),
                font: FontConfig::default(),
                align: HorizontalAlign::Left,
                vertical_align: VerticalAlign::Top,
                word_wrap: true,
                truncate: false,
                max_lines: None,
            }),
            Size::new(100.0, 20.0),
            Position::at(x, y),
        ),
        ElementType::Image => (
            ElementContent::Image(ImageContent::default()),
            Size::new(50.0, 50.0),
            Position::at(x, y),
        ),
        ElementType::Table => (
            ElementContent::Table(TableContent {
                data_source: data_source.to_string(),
                columns: Vec::new(),
                filters: Vec::new(),
                sort: Vec::new(),
                show_header: true,
                alternate_row_colors: true,
                show_row_numbers: false,
                header_style: None,
                row_style: None,
                alternate_row_style: None,
                max_rows: None,
                paginate: false,
            }),
            Size {
                width: 0.0,
                height: 0.0,
                auto_height: true,
            },
            Position {
                x,
                y,
                ..Position::flow()
            },
        ),
        ElementType::Shape => (
            ElementContent::Shape(ShapeContent {
                shape: ShapeKind::Rectangle,
                fill_color: "#ffffff".to_string(),
                stroke_color: "#000000".to_string(),
                stroke_width: 1.0,
            }),
            Size::new(50.0, 50.0),
            Position::at(x, y),
        ),
        ElementType::Line => (
            ElementContent::Line(LineContent {
                orientation: LineOrientation::Horizontal,
                x1: 0.0,
                y1: 0.0,
                x2: 100.0,
                y2: 0.0,
                stroke_color: "#000000".to_string(),
                stroke_width: 1.0,
                line_style: LineStyle::Solid,
            }),
            Size::new(100.0, 1.0),
            Position::at(x, y),
        ),
        ElementType::DynamicField => (
            ElementContent::DynamicField(DynamicFieldContent {
                field_kind: DynamicFieldKind::Date,
                date_format: Some(DEFAULT_DATE_FORMAT.to_string()),
                prefix: None,
                suffix: None,
                font: FontConfig::default(),
                align: HorizontalAlign::Left,
                custom_value: None,
            }),
            Size::new(60.0, 10.0),
            Position::at(x, y),
        ),
        ElementType::Chart => (
            ElementContent::Chart(ChartContent {
                chart_kind: ChartKind::Bar,
                data_source: data_source.to_string(),
                x_field: String::new(),
                y_field: String::new(),
                group_by: None,
                aggregation: Aggregation::Count,
                colors: DEFAULT_CHART_COLORS.iter().map(|c| c.to_string()).collect(),
                show_legend: true,
                show_labels: false,
                title: None,
                filters: Vec::new(),
            }),
            Size::new(150.0, 100.0),
            Position::at(x, y),
        ),
        ElementType::Spacer => (
            ElementContent::Spacer(SpacerContent {}),
            Size::new(100.0, 10.0),
            Position::at(x, y),
        ),
    };

    Element {
        id: element_id(element_type.as_str()),
        content,
        position,
        size,
        style: Style::default(),
        locked: false,
        visible: true,
        z_index: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_matches_its_content() {
        for ty in ElementType::ALL {
            let el = create_element(ty, 5.0, 5.0, "incidents");
            assert_eq!(el.element_type(), ty);
            assert!(el.id.starts_with(&format!("{}_", ty.as_str())));
            assert!(el.visible);
            assert!(!el.locked);
        }
    }

    #[test]
    fn test_text_defaults() {
        let el = create_element(ElementType::Text, 10.0, 10.0, "incidents");
        assert_eq!(el.position, Position::at(10.0, 10.0));
        assert_eq!(el.size, Size::new(100.0, 20.0));
        match el.content {
            ElementContent::Text(t) => {
                assert_eq!(t.text, DEFAULT_TEXT);
                assert_eq!(t.font.size, 12.0);
                assert!(t.word_wrap);
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_table_is_flow_and_auto_sized() {
        let el = create_element(ElementType::Table, 0.0, 40.0, "users");
        assert!(el.is_flow());
        assert!(el.size.auto_height);
        assert!(el.size.is_auto_width());
        match el.content {
            ElementContent::Table(t) => {
                assert_eq!(t.data_source, "users");
                assert!(t.columns.is_empty());
                assert!(t.show_header);
                assert!(t.alternate_row_colors);
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_chart_is_stamped_with_data_source() {
        let el = create_element(ElementType::Chart, 0.0, 0.0, "requests");
        assert_eq!(el.content.data_source(), Some("requests"));
        assert_eq!(el.size, Size::new(150.0, 100.0));
    }

    #[test]
    fn test_dynamic_field_defaults_to_date() {
        let el = create_element(ElementType::DynamicField, 0.0, 0.0, "incidents");
        match el.content {
            ElementContent::DynamicField(d) => {
                assert_eq!(d.field_kind, DynamicFieldKind::Date);
                assert_eq!(d.date_format.as_deref(), Some(DEFAULT_DATE_FORMAT));
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_ids_are_distinct() {
        let a = create_element(ElementType::Shape, 0.0, 0.0, "incidents");
        let b = create_element(ElementType::Shape, 0.0, 0.0, "incidents");
        assert_ne!(a.id, b.id);
    }
}
