//! Canvas editing engine
//!
//! Owns the three element collections (body, header, footer), the single
//! selection, the active panel tab and the drag session. Every structural
//! mutation of a template goes through [`CanvasEngine`]; unknown ids are
//! no-ops reported through the return value.

use shared::models::{
    Element, ElementContent, Footer, GlobalStyles, Header, PageSettings, Position, Size, Style,
    TemplateConfig,
};
use shared::util::element_id;

/// Offset applied to a duplicated element, in mm
pub const DUPLICATE_OFFSET_MM: f64 = 10.0;

/// Page area owning an element collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Body,
    Header,
    Footer,
}

/// At most one element is selected across all regions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Element { region: Region, id: String },
}

impl Selection {
    pub fn is_selected(&self, region: Region, id: &str) -> bool {
        matches!(self, Self::Element { region: r, id: i } if *r == region && i == id)
    }

    pub fn region(&self) -> Option<Region> {
        match self {
            Self::None => None,
            Self::Element { region, .. } => Some(*region),
        }
    }
}

/// Side panel tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelTab {
    #[default]
    Elements,
    Properties,
    Page,
}

/// Reorder direction within a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Shallow merge applied by [`CanvasEngine::update_element`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub style: Option<Style>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
    pub z_index: Option<i32>,
}

impl ElementPatch {
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    pub fn touches_geometry(&self) -> bool {
        self.position.is_some() || self.size.is_some()
    }
}

/// Pixel to millimeter conversion for the rendered canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    pub pixels_per_mm: f64,
}

impl CoordinateTransform {
    pub fn new(pixels_per_mm: f64) -> Self {
        Self { pixels_per_mm }
    }

    /// Scale of a page drawn `base_px_width` pixels wide at zoom 1.0, shown at `zoom`
    pub fn for_canvas(base_px_width: f64, page: &PageSettings, zoom: f64) -> Self {
        Self::new(base_px_width / page.page_width_mm() * zoom)
    }

    pub fn px_to_mm(&self, px: f64) -> f64 {
        if self.pixels_per_mm > 0.0 && self.pixels_per_mm.is_finite() {
            px / self.pixels_per_mm
        } else {
            0.0
        }
    }

    pub fn mm_to_px(&self, mm: f64) -> f64 {
        mm * self.pixels_per_mm
    }

    fn point_to_mm(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (self.px_to_mm(x), self.px_to_mm(y))
    }
}

#[derive(Debug, Clone)]
struct DragSession {
    region: Region,
    id: String,
    /// Pointer offset inside the element's box, mm
    grab_offset: (f64, f64),
    transform: CoordinateTransform,
}

/// In-memory editing model of one template
#[derive(Debug, Clone, Default)]
pub struct CanvasEngine {
    page: PageSettings,
    header: Header,
    footer: Footer,
    elements: Vec<Element>,
    global_styles: Option<GlobalStyles>,
    selection: Selection,
    active_tab: PanelTab,
    drag: Option<DragSession>,
}

impl CanvasEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: TemplateConfig) -> Self {
        let mut engine = Self::new();
        engine.load(config);
        engine
    }

    // ========== Page & regions ==========

    pub fn page(&self) -> &PageSettings {
        &self.page
    }

    pub fn set_page(&mut self, page: PageSettings) {
        self.page = page;
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Region settings (height, colors, enabled flag)
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    pub fn footer_mut(&mut self) -> &mut Footer {
        &mut self.footer
    }

    pub fn global_styles(&self) -> Option<&GlobalStyles> {
        self.global_styles.as_ref()
    }

    pub fn set_global_styles(&mut self, styles: Option<GlobalStyles>) {
        self.global_styles = styles;
    }

    // ========== Queries ==========

    pub fn elements(&self, region: Region) -> &[Element] {
        match region {
            Region::Body => &self.elements,
            Region::Header => &self.header.elements,
            Region::Footer => &self.footer.elements,
        }
    }

    fn elements_mut(&mut self, region: Region) -> &mut Vec<Element> {
        match region {
            Region::Body => &mut self.elements,
            Region::Header => &mut self.header.elements,
            Region::Footer => &mut self.footer.elements,
        }
    }

    pub fn element(&self, region: Region, id: &str) -> Option<&Element> {
        self.elements(region).iter().find(|el| el.id == id)
    }

    fn element_mut(&mut self, region: Region, id: &str) -> Option<&mut Element> {
        self.elements_mut(region).iter_mut().find(|el| el.id == id)
    }

    /// Elements drawn in `region`, bottom first: explicit `z_index`, then
    /// collection order. Hidden elements are skipped.
    pub fn render_order(&self, region: Region) -> Vec<&Element> {
        let mut visible: Vec<&Element> = self.elements(region).iter().filter(|el| el.visible).collect();
        // stable sort keeps collection order for equal z_index
        visible.sort_by_key(|el| el.z_index);
        visible
    }

    // ========== Selection ==========

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected element and its region
    pub fn selected(&self) -> Option<(Region, &Element)> {
        match &self.selection {
            Selection::None => None,
            Selection::Element { region, id } => self.element(*region, id).map(|el| (*region, el)),
        }
    }

    /// Select `id` in `region`, replacing any selection elsewhere
    pub fn select(&mut self, region: Region, id: &str) -> bool {
        if self.element(region, id).is_none() {
            return false;
        }
        self.selection = Selection::Element {
            region,
            id: id.to_string(),
        };
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    pub fn active_tab(&self) -> PanelTab {
        self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: PanelTab) {
        self.active_tab = tab;
    }

    // ========== Mutations ==========

    /// Append `element` to `region`, select it and open the properties tab
    pub fn add_element(&mut self, region: Region, element: Element) -> String {
        let id = element.id.clone();
        tracing::debug!(?region, id = %id, element_type = %element.element_type(), "Element added");
        self.elements_mut(region).push(element);
        self.selection = Selection::Element {
            region,
            id: id.clone(),
        };
        self.active_tab = PanelTab::Properties;
        id
    }

    /// Shallow-merge `patch` into the element.
    ///
    /// Position and size are dropped while the element is locked; the lock
    /// state is read before the patch applies.
    pub fn update_element(&mut self, region: Region, id: &str, patch: ElementPatch) -> bool {
        let Some(el) = self.element_mut(region, id) else {
            return false;
        };
        if el.locked && patch.touches_geometry() {
            tracing::debug!(id, "Geometry change ignored on locked element");
        } else {
            if let Some(position) = patch.position {
                el.position = position;
            }
            if let Some(size) = patch.size {
                el.size = size;
            }
        }
        if let Some(style) = patch.style {
            el.style = style;
        }
        if let Some(locked) = patch.locked {
            el.locked = locked;
        }
        if let Some(visible) = patch.visible {
            el.visible = visible;
        }
        if let Some(z_index) = patch.z_index {
            el.z_index = z_index;
        }
        true
    }

    /// Replace the content when `content` carries the element's own type
    pub fn update_content(&mut self, region: Region, id: &str, content: ElementContent) -> bool {
        let Some(el) = self.element_mut(region, id) else {
            return false;
        };
        if el.element_type() != content.element_type() {
            tracing::warn!(
                id,
                expected = %el.element_type(),
                found = %content.element_type(),
                "Content update rejected"
            );
            return false;
        }
        el.content = content;
        true
    }

    pub fn delete_element(&mut self, region: Region, id: &str) -> bool {
        let elements = self.elements_mut(region);
        let before = elements.len();
        elements.retain(|el| el.id != id);
        if elements.len() == before {
            return false;
        }
        if self.selection.is_selected(region, id) {
            self.selection = Selection::None;
        }
        if self
            .drag
            .as_ref()
            .is_some_and(|d| d.region == region && d.id == id)
        {
            self.drag = None;
        }
        tracing::debug!(?region, id, "Element deleted");
        true
    }

    /// Append a copy with a fresh id, offset by +10/+10 mm, and select it
    pub fn duplicate_element(&mut self, region: Region, id: &str) -> Option<String> {
        let source = self.element(region, id)?;
        let mut copy = source.clone();
        copy.id = element_id(source.element_type().as_str());
        copy.position.x += DUPLICATE_OFFSET_MM;
        copy.position.y += DUPLICATE_OFFSET_MM;
        let new_id = copy.id.clone();
        self.elements_mut(region).push(copy);
        self.selection = Selection::Element {
            region,
            id: new_id.clone(),
        };
        tracing::debug!(?region, source = id, id = %new_id, "Element duplicated");
        Some(new_id)
    }

    /// Swap with the neighbour in `direction`; no-op at the boundaries
    pub fn move_element(&mut self, region: Region, id: &str, direction: Direction) -> bool {
        let elements = self.elements_mut(region);
        let Some(index) = elements.iter().position(|el| el.id == id) else {
            return false;
        };
        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < elements.len() => index + 1,
            _ => return false,
        };
        elements.swap(index, target);
        true
    }

    // ========== Drag ==========

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Select the element under the pointer and start dragging it.
    ///
    /// `pointer_px` is relative to the region's origin. Returns whether a
    /// drag started: locked and flow elements are selected but never moved,
    /// and a second drag cannot start while one is active.
    pub fn pointer_down(
        &mut self,
        region: Region,
        id: &str,
        pointer_px: (f64, f64),
        transform: &CoordinateTransform,
    ) -> bool {
        if self.drag.is_some() || !self.select(region, id) {
            return false;
        }
        let Some(el) = self.element(region, id) else {
            return false;
        };
        if !el.is_movable() {
            return false;
        }
        let (px, py) = transform.point_to_mm(pointer_px);
        let grab_offset = (px - el.position.x, py - el.position.y);
        self.drag = Some(DragSession {
            region,
            id: id.to_string(),
            grab_offset,
            transform: *transform,
        });
        true
    }

    /// Move the dragged element so the grab point follows the pointer
    pub fn pointer_move(&mut self, pointer_px: (f64, f64)) -> bool {
        let Some(drag) = self.drag.clone() else {
            return false;
        };
        let (px, py) = drag.transform.point_to_mm(pointer_px);
        let Some(el) = self.element_mut(drag.region, &drag.id) else {
            self.drag = None;
            return false;
        };
        if !el.is_movable() {
            return false;
        }
        let dx = px - drag.grab_offset.0 - el.position.x;
        let dy = py - drag.grab_offset.1 - el.position.y;
        el.position = el.position.offset_clamped(dx, dy);
        true
    }

    pub fn pointer_up(&mut self) {
        if let Some(drag) = self.drag.take() {
            tracing::debug!(id = %drag.id, "Drag finished");
        }
    }

    /// Pointer left the canvas; ends any drag
    pub fn pointer_leave(&mut self) {
        self.drag = None;
    }

    // ========== Configuration ==========

    /// Replace every collection from `config`; absent regions become
    /// disabled defaults. Selection and drag are reset.
    pub fn load(&mut self, config: TemplateConfig) {
        self.page = config.page;
        self.header = config.header.unwrap_or_default();
        self.footer = config.footer.unwrap_or_default();
        self.elements = config.elements;
        self.global_styles = config.global_styles;
        self.selection = Selection::None;
        self.drag = None;
    }

    /// Fresh configuration of the current state; disabled regions are omitted
    pub fn snapshot(&self) -> TemplateConfig {
        TemplateConfig {
            page: self.page.clone(),
            header: self.header.enabled.then(|| self.header.clone()),
            footer: self.footer.enabled.then(|| self.footer.clone()),
            elements: self.elements.clone(),
            global_styles: self.global_styles.clone(),
        }
    }
}
