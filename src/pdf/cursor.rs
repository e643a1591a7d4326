/// Vertical write position on the current page, measured downward from the page top.
///
/// `ensure_space` is the only place that decides whether something fits.
#[derive(Clone, Debug)]
pub struct PageCursor {
    y: f32,
    page_index: usize,
    page_height: f32,
    top_margin: f32,
    bottom_margin: f32,
}

impl PageCursor {
    pub fn new(page_height: f32, top_margin: f32, bottom_margin: f32) -> Self {
        Self {
            y: top_margin,
            page_index: 0,
            page_height,
            top_margin,
            bottom_margin,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Lowest y any content may reach on a page.
    pub fn limit(&self) -> f32 {
        self.page_height - self.bottom_margin
    }

    /// Height left between the cursor and the bottom margin.
    pub fn available(&self) -> f32 {
        self.limit() - self.y
    }

    pub fn at_page_top(&self) -> bool {
        (self.y - self.top_margin).abs() < 0.01
    }

    /// Start a new page if `height` does not fit below the cursor.
    /// Returns true when a page break happened.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.y + height > self.limit() {
            self.break_page();
            true
        } else {
            false
        }
    }

    pub fn advance(&mut self, height: f32) {
        self.y += height;
    }

    pub fn break_page(&mut self) {
        self.page_index += 1;
        self.y = self.top_margin;
    }
}
