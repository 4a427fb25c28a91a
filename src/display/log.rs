use super::{printable_glyphs, Display};

/// Writes each new frame to the log. Repeated frames are skipped.
#[derive(Debug, Default)]
pub struct LogDisplay {
    last: String,
    backlight: bool,
    closed: bool,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self {
            backlight: true,
            ..Default::default()
        }
    }
}

impl Display for LogDisplay {
    fn display(&mut self, text: &str) {
        if self.closed || !self.backlight || text == self.last {
            return;
        }
        self.last = text.to_string();
        for (row, line) in printable_glyphs(text).lines().enumerate() {
            tracing::info!(target: "display", row, "|{line}|");
        }
    }

    fn close(&mut self) {
        self.closed = true;
        tracing::info!(target: "display", "closed");
    }

    fn toggle_backlight(&mut self) {
        self.backlight = !self.backlight;
        // Force the next frame out once the light is back on.
        self.last.clear();
        tracing::info!(target: "display", backlight = self.backlight, "backlight toggled");
    }

    fn is_active(&self) -> bool {
        !self.closed
    }
}
