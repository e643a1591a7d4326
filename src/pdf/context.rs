use pdf_writer::{Content, Name, Str};

use crate::fonts::{FontEntry, FontSet};
use crate::model::Language;
use crate::theme::FacultyTheme;

use super::cursor::PageCursor;
use super::metrics::visual_order;

pub(crate) const fn mm(v: f32) -> f32 {
    v * 72.0 / 25.4
}

pub(crate) const A4_WIDTH: f32 = 595.28;
pub(crate) const A4_HEIGHT: f32 = 841.89;

/// Fixed page frame for one text direction. All y values are measured from the page top.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PageGeometry {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) top_margin: f32,
    pub(crate) bottom_margin: f32,
    pub(crate) band_x: f32,
    pub(crate) band_width: f32,
    pub(crate) divider_x: f32,
    pub(crate) content_left: f32,
    pub(crate) content_right: f32,
    pub(crate) rtl: bool,
}

impl PageGeometry {
    pub(crate) fn a4(rtl: bool) -> Self {
        let band_width = mm(12.0);
        let (band_x, divider_x, content_left, content_right) = if rtl {
            (
                A4_WIDTH - band_width,
                A4_WIDTH - band_width - mm(4.0),
                mm(15.0),
                A4_WIDTH - band_width - mm(12.0),
            )
        } else {
            (0.0, band_width + mm(4.0), band_width + mm(12.0), A4_WIDTH - mm(15.0))
        };
        Self {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            top_margin: mm(18.0),
            bottom_margin: mm(20.0),
            band_x,
            band_width,
            divider_x,
            content_left,
            content_right,
            rtl,
        }
    }

    pub(crate) fn content_width(&self) -> f32 {
        self.content_right - self.content_left
    }
}

/// Which page edge carries the faculty band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Decorations drawn on a page before its content.
#[derive(Clone, Debug, PartialEq)]
pub struct ChromeTrace {
    pub band_side: Side,
    pub badge: String,
    pub logo: bool,
    pub faculty_graphic: bool,
}

/// One label/value pair of the info grid as laid out.
#[derive(Clone, Debug, PartialEq)]
pub struct GridCell {
    pub label: String,
    pub value_lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridRow {
    pub top: f32,
    pub height: f32,
    pub cells: Vec<GridCell>,
}

/// A run of wrapped section lines drawn together on one page.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionChunk {
    pub title: String,
    /// Only the first chunk of a block carries the title bar.
    pub first: bool,
    pub lines: Vec<String>,
    pub top: f32,
    pub bottom: f32,
    /// Horizontal extent the body lines were wrapped to.
    pub text_left: f32,
    pub text_right: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    pub index: usize,
    pub chrome: Option<ChromeTrace>,
    /// Directory banner lines; only the first page has them.
    pub banner: Vec<String>,
    pub title_lines: Vec<String>,
    pub rows: Vec<GridRow>,
    pub chunks: Vec<SectionChunk>,
}

impl PageLayout {
    fn new(index: usize) -> Self {
        Self {
            index,
            chrome: None,
            banner: Vec::new(),
            title_lines: Vec::new(),
            rows: Vec::new(),
            chunks: Vec::new(),
        }
    }
}

/// Structured trace of a composed sheet: what went on which page and where.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentLayout {
    pub page_height: f32,
    pub bottom_limit: f32,
    pub pages: Vec<PageLayout>,
}

/// An embedded image XObject available to the page chrome.
#[derive(Clone, Debug)]
pub(crate) struct PlacedImage {
    pub(crate) name: String,
    pub(crate) aspect: f32,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ChromeAssets {
    pub(crate) logo: Option<PlacedImage>,
    pub(crate) faculty_graphic: Option<PlacedImage>,
}

/// State for one export: geometry, cursor, theme, fonts and the pages built so far.
pub(crate) struct LayoutContext<'a> {
    pub(crate) geometry: PageGeometry,
    pub(crate) cursor: PageCursor,
    pub(crate) theme: &'static FacultyTheme,
    pub(crate) fonts: &'a FontSet,
    pub(crate) assets: &'a ChromeAssets,
    pub(crate) content: Content,
    pub(crate) page: PageLayout,
    finished: Vec<(Content, PageLayout)>,
}

impl<'a> LayoutContext<'a> {
    pub(crate) fn new(
        language: Language,
        theme: &'static FacultyTheme,
        fonts: &'a FontSet,
        assets: &'a ChromeAssets,
    ) -> Self {
        let geometry = PageGeometry::a4(language.is_rtl());
        let mut ctx = Self {
            geometry,
            cursor: PageCursor::new(geometry.height, geometry.top_margin, geometry.bottom_margin),
            theme,
            fonts,
            assets,
            content: Content::new(),
            page: PageLayout::new(0),
            finished: Vec::new(),
        };
        super::chrome::draw_chrome(&mut ctx, true);
        ctx
    }

    /// Break to a new page when `height` does not fit. Returns true on a break.
    pub(crate) fn ensure_space(&mut self, height: f32) -> bool {
        if self.cursor.ensure_space(height) {
            self.start_page();
            true
        } else {
            false
        }
    }

    pub(crate) fn new_page(&mut self) {
        self.cursor.break_page();
        self.start_page();
    }

    fn start_page(&mut self) {
        let content = std::mem::replace(&mut self.content, Content::new());
        let page = std::mem::replace(&mut self.page, PageLayout::new(self.cursor.page_index()));
        self.finished.push((content, page));
        log::debug!("Page break → page {}", self.cursor.page_index() + 1);
        super::chrome::draw_chrome(self, false);
    }

    pub(crate) fn finish(mut self) -> Vec<(Content, PageLayout)> {
        self.finished.push((self.content, self.page));
        self.finished
    }

    pub(crate) fn fill_rect(&mut self, x: f32, top: f32, w: f32, h: f32, rgb: [u8; 3]) {
        fill_rect(&mut self.content, self.geometry.height, x, top, w, h, rgb);
    }

    /// Draw one line inside `[left, right]`, start-aligned for the document direction.
    pub(crate) fn line_at_start(
        &mut self,
        text: &str,
        left: f32,
        right: f32,
        baseline: f32,
        size: f32,
        bold: bool,
        rgb: [u8; 3],
    ) {
        let font = self.fonts.get(bold);
        let x = if self.geometry.rtl {
            right - font.metrics.text_width(text, size)
        } else {
            left
        };
        show_text(&mut self.content, font, self.geometry.height, text, x, baseline, size, rgb);
    }
}

pub(crate) fn fill_rect(
    content: &mut Content,
    page_height: f32,
    x: f32,
    top: f32,
    w: f32,
    h: f32,
    [r, g, b]: [u8; 3],
) {
    content.save_state();
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    content.rect(x, page_height - top - h, w, h);
    content.fill_nonzero();
    content.restore_state();
}

/// Show `text` with its left edge at `x` and baseline at `baseline` (from page top).
pub(crate) fn show_text(
    content: &mut Content,
    font: &FontEntry,
    page_height: f32,
    text: &str,
    x: f32,
    baseline: f32,
    size: f32,
    [r, g, b]: [u8; 3],
) {
    if text.is_empty() {
        return;
    }
    let bytes = font.encode(&visual_order(text));
    content.save_state();
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    content
        .begin_text()
        .set_font(Name(font.pdf_name.as_bytes()), size)
        .next_line(x, page_height - baseline)
        .show(Str(&bytes))
        .end_text();
    content.restore_state();
}
