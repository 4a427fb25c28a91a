//! Text scroller for character displays 📟
//!
//! Fits a multi-line string into a fixed `width` x `height` grid. Rows that
//! are too long scroll left one byte per tick, optionally keeping a fixed
//! prefix (cursor glyph, queue index) in place.

use unicode_normalization::UnicodeNormalization;

/// Appended to scrolling rows so the end of the text is visibly separated
/// from its wrapped-around start.
pub const SEPARATOR: &[u8] = b" | ";

#[derive(Debug, Clone, Default)]
struct ScrollerLine {
    raw: Option<String>,
    line: Vec<u8>,
    needs_scroll: bool,
    fixed_prefix: usize,
}

impl ScrollerLine {
    fn set(&mut self, input: &str, width: usize, fixed_prefix: usize) {
        // Unchanged rows keep their scroll position.
        if self.raw.as_deref() == Some(input) {
            return;
        }

        let mut line = to_grid_bytes(input);
        self.needs_scroll = line.len() > width;
        if self.needs_scroll {
            line.extend_from_slice(SEPARATOR);
        } else {
            line.resize(width, b' ');
        }

        self.line = line;
        self.fixed_prefix = fixed_prefix;
        self.raw = Some(input.to_string());
    }

    fn scroll(&mut self, width: usize) {
        if !self.needs_scroll {
            return;
        }
        let fixed = self.fixed_prefix;
        if fixed >= width || fixed >= self.line.len() {
            return;
        }
        self.line[fixed..].rotate_left(1);
    }

    fn visible(&self, width: usize) -> &[u8] {
        &self.line[..width.min(self.line.len())]
    }
}

/// Fold text to what a character LCD can draw: compatibility
/// decomposition, then printable ASCII only ("Björk Café" -> "Bjork Cafe").
pub fn lcd_text(text: &str) -> String {
    text.nfkd().filter(|c| (' '..='~').contains(c)).collect()
}

/// One byte per grid cell. Accents are folded like `lcd_text`; the LCD
/// glyph bytes below 0x20 pass through.
fn to_grid_bytes(input: &str) -> Vec<u8> {
    input
        .nfkd()
        .filter_map(|c| match c {
            '\t' | '\r' => Some(b' '),
            c if c.is_ascii() => Some(c as u8),
            _ => None,
        })
        .collect()
}

/// Per-row renderer for the display grid.
#[derive(Debug, Clone)]
pub struct TextScroller {
    width: usize,
    height: usize,
    lines: Vec<ScrollerLine>,
}

impl TextScroller {
    pub fn new(width: usize, height: usize) -> Self {
        let mut lines = vec![ScrollerLine::default(); height];
        for line in &mut lines {
            line.set("", width, 0);
        }
        Self {
            width,
            height,
            lines,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Put new content into the scroller. Lines beyond `height` are dropped,
    /// missing lines render blank.
    pub fn set(&mut self, text: &str, fixed_prefix: usize) {
        let mut parts = text.split('\n');
        for line in &mut self.lines {
            line.set(parts.next().unwrap_or(""), self.width, fixed_prefix);
        }
    }

    /// Advance every scrolling row by one position and return the block.
    pub fn tick(&mut self) -> String {
        let width = self.width;
        for line in &mut self.lines {
            line.scroll(width);
        }
        self.get()
    }

    /// Current block without advancing any scroll state.
    pub fn get(&self) -> String {
        let mut out = Vec::with_capacity((self.width + 1) * self.height);
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            out.extend_from_slice(line.visible(self.width));
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}
