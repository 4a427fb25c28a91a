use super::{pad_rows, window, ActionCtx, ActionResult, Frame, Screen};
use crate::app::keys::Action;

/// Read-only lines, e.g. command output or a confirmation flash.
#[derive(Debug, Clone)]
pub struct TextScreen {
    lines: Vec<String>,
    offset: usize,
    /// Renders left before the screen expires. `None` never expires.
    remaining: Option<u32>,
}

impl TextScreen {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            offset: 0,
            remaining: None,
        }
    }

    /// A screen that is shown for `ticks` renders and then popped.
    pub fn flash(lines: Vec<String>, ticks: u32) -> Self {
        Self {
            remaining: Some(ticks),
            ..Self::new(lines)
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn scroll(&mut self, up: bool, step: usize, rows: usize) {
        let max = self.lines.len().saturating_sub(rows.max(1));
        self.offset = if up {
            self.offset.saturating_sub(step)
        } else {
            (self.offset + step).min(max)
        };
    }
}

impl Screen for TextScreen {
    fn show(&self, rows: usize) -> Frame {
        if self.lines.is_empty() {
            return Frame::new(pad_rows(vec!["No text".to_string()], rows), 0);
        }
        Frame::new(pad_rows(window(&self.lines, self.offset, rows), rows), 0)
    }

    fn action(&mut self, action: &Action, ctx: &mut ActionCtx) -> ActionResult {
        match action {
            Action::Up => self.scroll(true, 1, ctx.rows),
            Action::Down => self.scroll(false, 1, ctx.rows),
            Action::Up10 => self.scroll(true, 10, ctx.rows),
            Action::Down10 => self.scroll(false, 10, ctx.rows),
            Action::Select | Action::Back => return ActionResult::Back,
            _ => return ActionResult::Unhandled,
        }
        ActionResult::Ok
    }

    fn valid(&mut self) -> bool {
        match self.remaining {
            None => true,
            Some(0) => false,
            Some(n) => {
                self.remaining = Some(n - 1);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_show_windows_and_pads() {
        let screen = TextScreen::new(lines(&["one"]));
        assert_eq!(screen.show(2).lines, lines(&["one", ""]));
        assert_eq!(TextScreen::new(Vec::new()).show(2).lines, lines(&["No text", ""]));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut screen = TextScreen::new(lines(&["a", "b", "c"]));
        let mut ctx = ActionCtx::new(2);
        assert!(matches!(screen.action(&Action::Up, &mut ctx), ActionResult::Ok));
        assert_eq!(screen.offset(), 0);
        screen.action(&Action::Down10, &mut ctx);
        assert_eq!(screen.offset(), 1);
        assert_eq!(screen.show(2).lines, lines(&["b", "c"]));
    }

    #[test]
    fn test_select_closes() {
        let mut screen = TextScreen::new(lines(&["a"]));
        let mut ctx = ActionCtx::new(2);
        assert!(matches!(screen.action(&Action::Select, &mut ctx), ActionResult::Back));
        assert!(matches!(screen.action(&Action::Play, &mut ctx), ActionResult::Unhandled));
        assert!(ctx.into_effects().is_empty());
    }

    #[test]
    fn test_flash_expires_after_budget() {
        let mut screen = TextScreen::flash(lines(&["play"]), 2);
        assert!(screen.valid());
        assert!(screen.valid());
        assert!(!screen.valid());

        let mut sticky = TextScreen::new(lines(&["x"]));
        for _ in 0..10 {
            assert!(sticky.valid());
        }
    }
}
