// scroll.rs

/// Viewport bookkeeping for the message list, measured in terminal lines.
///
/// While pinned, growth of the content drags the view along so the newest
/// line stays visible. Any upward scroll unpins; the view pins again only
/// once it is back on the last line or jumps there. `threshold` only decides
/// whether the view counts as "at bottom" for the jump indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    offset: u16,
    content_height: u16,
    viewport_height: u16,
    threshold: u16,
    pinned: bool,
}

impl ScrollState {
    pub fn new(threshold: u16) -> Self {
        Self {
            offset: 0,
            content_height: 0,
            viewport_height: 0,
            threshold: threshold.max(1),
            pinned: true,
        }
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Lines hidden below the viewport.
    pub fn distance_from_bottom(&self) -> u16 {
        self.max_offset().saturating_sub(self.offset)
    }

    pub fn is_at_bottom(&self) -> bool {
        self.distance_from_bottom() < self.threshold
    }

    /// Whether to draw the jump-to-bottom indicator.
    pub fn show_jump_indicator(&self, has_started: bool) -> bool {
        has_started && !self.is_at_bottom()
    }

    /// Records the latest measured sizes. Called on every draw.
    pub fn update_dimensions(&mut self, content_height: u16, viewport_height: u16) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        if self.pinned {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
            self.pinned = self.offset == self.max_offset();
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.offset = self.offset.saturating_sub(lines);
        self.pinned = self.offset == self.max_offset();
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.offset = self.offset.saturating_add(lines).min(self.max_offset());
        self.pinned = self.offset == self.max_offset();
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.page_size());
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page_size());
    }

    /// Jumps to the newest line and pins the view there.
    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.pinned = true;
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.threshold);
    }

    fn page_size(&self) -> u16 {
        self.viewport_height.saturating_sub(1).max(1)
    }
}
