//! Screens shown on the display and the protocol the dispatcher drives them with.

use crate::app::effects::Effect;
use crate::app::keys::Action;
use crate::scroller::lcd_text;

pub mod list;
pub mod menu;
pub mod status;
pub mod text;
pub mod urgent;

pub use list::{ListKind, ListScreen};
pub use menu::MenuScreen;
pub use status::StatusScreen;
pub use text::TextScreen;
pub use urgent::{UrgentMessage, UrgentScreen, UrgentText};

// HD44780 custom characters (CGRAM slots) and the ROM right arrow.
pub const CHAR_PLAY: char = '\x00';
pub const CHAR_PAUSE: char = '\x01';
pub const CHAR_STOP: char = '\x02';
pub const CHAR_CURSOR: char = '\x7e';

/// Rows produced by a screen plus the number of leading bytes per row that
/// must not scroll.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub lines: Vec<String>,
    pub fixed_prefix: usize,
}

impl Frame {
    pub fn new(lines: Vec<String>, fixed_prefix: usize) -> Self {
        Self {
            lines,
            fixed_prefix,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// What the dispatcher should do after a screen handled an action.
pub enum ActionResult {
    /// State changed in place.
    Ok,
    /// Navigate into a new screen.
    Push(Box<dyn Screen>),
    /// Pop the current screen.
    Back,
    /// Return to the root screen.
    Exit,
    /// The screen does not understand this action.
    Unhandled,
}

impl std::fmt::Debug for ActionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "Ok"),
            Self::Push(_) => write!(f, "Push(..)"),
            Self::Back => write!(f, "Back"),
            Self::Exit => write!(f, "Exit"),
            Self::Unhandled => write!(f, "Unhandled"),
        }
    }
}

/// Passed to `Screen::action`: display geometry plus a sink for side effects
/// the dispatcher runs outside of its control flow.
#[derive(Debug)]
pub struct ActionCtx {
    pub rows: usize,
    effects: Vec<Effect>,
}

impl ActionCtx {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            effects: Vec::new(),
        }
    }

    pub fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn into_effects(self) -> Vec<Effect> {
        self.effects
    }
}

/// A unit of the navigation stack 🧭
pub trait Screen: Send {
    /// Rows to display, padded to `rows`.
    fn show(&self, rows: usize) -> Frame;

    /// React to one input action.
    fn action(&mut self, action: &Action, ctx: &mut ActionCtx) -> ActionResult;

    /// Screens with a display budget count down here and report `false`
    /// once it is used up.
    fn valid(&mut self) -> bool {
        true
    }
}

/// Move the cursor up by `step`, wrapping to the last item.
/// Returns the new `(cursor, offset)`.
pub fn cursor_up(
    cursor: usize,
    offset: usize,
    count: usize,
    rows: usize,
    step: usize,
) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    match cursor.checked_sub(step) {
        Some(cursor) => (cursor, offset.min(cursor)),
        None => (count - 1, count.saturating_sub(rows)),
    }
}

/// Move the cursor down by `step`, wrapping to the first item.
/// Returns the new `(cursor, offset)`.
pub fn cursor_down(
    cursor: usize,
    offset: usize,
    count: usize,
    rows: usize,
    step: usize,
) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let cursor = cursor + step;
    if cursor >= count {
        return (0, 0);
    }
    let rows = rows.max(1);
    let offset = if cursor > offset + rows - 1 {
        cursor + 1 - rows
    } else {
        offset
    };
    (cursor, offset)
}

/// Visible slice `[offset, offset + rows)` of `labels`, cursor row marked.
pub(crate) fn cursor_rows(labels: &[String], cursor: usize, offset: usize, rows: usize) -> Vec<String> {
    labels
        .iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(i, label)| format!("{}{}", marker(i == cursor), lcd_text(label)))
        .collect()
}

pub(crate) fn marker(selected: bool) -> char {
    if selected {
        CHAR_CURSOR
    } else {
        ' '
    }
}

/// Visible slice of plain text lines.
pub(crate) fn window(lines: &[String], offset: usize, rows: usize) -> Vec<String> {
    lines.iter().skip(offset).take(rows).map(|l| lcd_text(l)).collect()
}

pub(crate) fn pad_rows(mut lines: Vec<String>, rows: usize) -> Vec<String> {
    while lines.len() < rows {
        lines.push(String::new());
    }
    lines
}
