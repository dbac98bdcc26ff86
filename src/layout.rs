//! Page layout engine.
//!
//! Places headings, wrapped paragraphs, section titles, bordered boxes and
//! signature blocks top-to-bottom onto fixed-size pages. Every operation
//! measures the content first and then decides whether it still fits on the
//! current page. The result is a backend-neutral [`Document`] that the PDF
//! renderer draws; tests inspect it directly.
//!
//! Coordinates are PDF points measured from the top-left corner of a page.
//! Text `y` is the baseline.

use crate::metrics::{text_width, wrap_text, FontWeight};

// ============================================================================
// Geometry
// ============================================================================

/// A4 portrait in points.
pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;

/// Vertical room kept free for the date line and both signature slots.
pub const SIGNATURE_ALLOWANCE: f32 = 80.0;
/// Gap between the signature labels and the printed names.
pub const SIGNATURE_HEIGHT: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// Extra space above the bottom margin that no line may start in.
    pub bottom_buffer: f32,
    pub font_size: f32,
    pub line_height: f32,
    pub paragraph_gap: f32,
    pub box_font_size: f32,
    pub box_line_height: f32,
    pub box_padding: f32,
    pub box_gap: f32,
    pub box_radius: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry {
            width: A4_WIDTH_PT,
            height: A4_HEIGHT_PT,
            margin: 55.0,
            bottom_buffer: 20.0,
            font_size: 11.0,
            line_height: 14.0,
            paragraph_gap: 4.0,
            box_font_size: 10.5,
            box_line_height: 13.0,
            box_padding: 8.0,
            box_gap: 8.0,
            box_radius: 4.0,
        }
    }
}

impl PageGeometry {
    pub fn usable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin - self.bottom_buffer
    }

    pub fn box_inner_width(&self) -> f32 {
        self.usable_width() - 2.0 * self.box_padding
    }
}

// ============================================================================
// Output model
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        x: f32,
        y: f32,
        text: String,
        weight: FontWeight,
        size: f32,
    },
    RoundedRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    /// Text elements in drawing order as `(y, text)`.
    pub fn lines(&self) -> impl Iterator<Item = (f32, &str)> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { y, text, .. } => Some((*y, text.as_str())),
            _ => None,
        })
    }

    pub fn boxes(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(|e| matches!(e, Element::RoundedRect { .. }))
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.lines().any(|(_, text)| text.contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Index of the first page whose text contains `needle`.
    pub fn find_page(&self, needle: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.contains_text(needle))
    }
}

// ============================================================================
// Styles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub weight: FontWeight,
    pub align: Align,
    pub size: f32,
    pub line_height: f32,
}

impl TextStyle {
    pub fn body(geometry: &PageGeometry) -> Self {
        TextStyle {
            weight: FontWeight::Regular,
            align: Align::Left,
            size: geometry.font_size,
            line_height: geometry.line_height,
        }
    }

    pub fn bold(self) -> Self {
        TextStyle {
            weight: FontWeight::Bold,
            ..self
        }
    }

    pub fn aligned(self, align: Align) -> Self {
        TextStyle { align, ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureSlot {
    pub label: String,
    pub name: String,
}

impl SignatureSlot {
    pub fn new(label: impl Into<String>, name: impl Into<String>) -> Self {
        SignatureSlot {
            label: label.into(),
            name: name.into(),
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Single-use layout cursor over a growing list of pages.
#[derive(Debug)]
pub struct LayoutEngine {
    geometry: PageGeometry,
    pages: Vec<Page>,
    y: f32,
}

impl LayoutEngine {
    pub fn new(geometry: PageGeometry) -> Self {
        LayoutEngine {
            geometry,
            pages: vec![Page::default()],
            y: geometry.margin,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Current baseline position on the current page.
    pub fn cursor(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Space left before the bottom limit.
    pub fn remaining(&self) -> f32 {
        self.geometry.bottom_limit() - self.y
    }

    fn at_page_top(&self) -> bool {
        self.y <= self.geometry.margin
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.y = self.geometry.margin;
        log::debug!("page break -> page {}", self.pages.len());
    }

    /// Break to a new page unless `height` still fits. Returns whether a break happened.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.y + height > self.geometry.bottom_limit() && !self.at_page_top() {
            self.new_page();
            return true;
        }
        false
    }

    /// Move the cursor down without drawing.
    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    fn current_page(&mut self) -> &mut Page {
        // `pages` starts with one page and only ever grows.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn push_text(&mut self, text: &str, x: f32, y: f32, weight: FontWeight, size: f32) {
        if text.is_empty() {
            return;
        }
        self.current_page().elements.push(Element::Text {
            x,
            y,
            text: text.to_string(),
            weight,
            size,
        });
    }

    fn line_x(&self, text: &str, style: &TextStyle) -> f32 {
        let left = self.geometry.margin;
        let usable = self.geometry.usable_width();
        match style.align {
            Align::Left => left,
            Align::Center => left + (usable - text_width(text, style.weight, style.size)) / 2.0,
            Align::Right => left + usable - text_width(text, style.weight, style.size),
        }
    }

    /// One centred bold line followed by `advance` points of space.
    pub fn add_heading(&mut self, text: &str, size: f32, advance: f32) {
        let style = TextStyle {
            weight: FontWeight::Bold,
            align: Align::Center,
            size,
            line_height: advance,
        };
        self.ensure_space(self.geometry.line_height);
        let x = self.line_x(text, &style);
        let y = self.y;
        self.push_text(text, x, y, style.weight, style.size);
        self.y += advance;
    }

    /// Wrapped paragraph. A multi-line paragraph that would leave exactly one
    /// line at the bottom of the page moves to the next page as a whole.
    pub fn add_text_block(&mut self, text: &str, style: &TextStyle) {
        let lines = wrap_text(text, style.weight, style.size, self.geometry.usable_width());

        let fits = ((self.geometry.bottom_limit() - self.y) / style.line_height).floor();
        if lines.len() > 1 && fits == 1.0 {
            self.new_page();
        }

        for line in &lines {
            self.ensure_space(style.line_height);
            let x = self.line_x(line, style);
            let y = self.y;
            self.push_text(line, x, y, style.weight, style.size);
            self.y += style.line_height;
        }

        self.y += self.geometry.paragraph_gap;
    }

    pub fn add_section_title(&mut self, title: &str) {
        let style = TextStyle::body(&self.geometry).bold();
        self.ensure_space(style.line_height);
        let x = self.geometry.margin;
        let y = self.y;
        self.push_text(&title.to_uppercase(), x, y, style.weight, style.size);
        self.y += style.line_height;
    }

    /// Bordered box around `lines`. The box is kept on one page whenever its
    /// full height fits on a page; a taller box continues on the next page
    /// with its own border.
    pub fn add_box<S: AsRef<str>>(&mut self, lines: &[S]) {
        let g = self.geometry;
        let wrapped: Vec<String> = lines
            .iter()
            .flat_map(|l| wrap_text(l.as_ref(), FontWeight::Regular, g.box_font_size, g.box_inner_width()))
            .collect();

        let box_height = wrapped.len() as f32 * g.box_line_height + 2.0 * g.box_padding;
        self.ensure_space(box_height);

        let mut top = self.y;
        let mut segment_height = box_height;
        let mut rect_index = self.push_border(top, segment_height);
        let first_baseline = g.box_padding + g.box_line_height - 3.0;
        let mut inner_y = top + first_baseline;
        let mut drawn_in_segment = 0usize;

        for (i, line) in wrapped.iter().enumerate() {
            if inner_y > g.bottom_limit() && drawn_in_segment > 0 {
                log::debug!("box overflowed its page after {} lines", i);
                self.resize_border(rect_index, drawn_in_segment as f32 * g.box_line_height + 2.0 * g.box_padding);
                self.new_page();
                top = self.y;
                segment_height = (wrapped.len() - i) as f32 * g.box_line_height + 2.0 * g.box_padding;
                rect_index = self.push_border(top, segment_height);
                inner_y = top + first_baseline;
                drawn_in_segment = 0;
            }
            self.push_text(line, g.margin + g.box_padding, inner_y, FontWeight::Regular, g.box_font_size);
            inner_y += g.box_line_height;
            drawn_in_segment += 1;
        }

        self.y = top + segment_height + g.box_gap;
    }

    fn push_border(&mut self, top: f32, height: f32) -> usize {
        let g = self.geometry;
        let page = self.current_page();
        page.elements.push(Element::RoundedRect {
            x: g.margin,
            y: top,
            width: g.usable_width(),
            height,
            radius: g.box_radius,
        });
        page.elements.len() - 1
    }

    fn resize_border(&mut self, index: usize, new_height: f32) {
        if let Some(Element::RoundedRect { height, .. }) = self.current_page().elements.get_mut(index) {
            *height = new_height;
        }
    }

    /// Labels side by side, the names [`SIGNATURE_HEIGHT`] below them. The
    /// right slot starts 40 points right of the page centre.
    pub fn add_signature_block(&mut self, left: &SignatureSlot, right: Option<&SignatureSlot>) {
        let g = self.geometry;
        self.ensure_space(SIGNATURE_HEIGHT);

        let left_x = g.margin;
        let right_x = g.margin + g.usable_width() / 2.0 + 40.0;

        let label_y = self.y;
        self.push_text(&left.label, left_x, label_y, FontWeight::Regular, g.font_size);
        if let Some(slot) = right {
            self.push_text(&slot.label, right_x, label_y, FontWeight::Regular, g.font_size);
        }

        self.y += SIGNATURE_HEIGHT;
        let name_y = self.y;
        self.push_text(&left.name, left_x, name_y, FontWeight::Bold, g.font_size);
        if let Some(slot) = right {
            self.push_text(&slot.name, right_x, name_y, FontWeight::Bold, g.font_size);
        }
        self.y += g.line_height;
    }

    pub fn finish(self) -> Document {
        Document {
            geometry: self.geometry,
            pages: self.pages,
        }
    }
}
