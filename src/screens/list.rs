use super::{cursor_down, cursor_up, marker, pad_rows, ActionCtx, ActionResult, Frame, Screen};
use crate::app::effects::Effect;
use crate::app::keys::Action;
use crate::player::PlayerCommand;
use crate::scroller::lcd_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Playlists,
    Queue,
}

/// Stored playlists or the current queue. Selecting an entry plays it.
#[derive(Debug, Clone)]
pub struct ListScreen {
    kind: ListKind,
    labels: Vec<String>,
    cursor: usize,
    offset: usize,
}

impl ListScreen {
    pub fn playlists(labels: Vec<String>) -> Self {
        Self {
            kind: ListKind::Playlists,
            labels,
            cursor: 0,
            offset: 0,
        }
    }

    /// Queue list with the cursor on the current song.
    pub fn queue(labels: Vec<String>, current: Option<usize>, rows: usize) -> Self {
        let cursor = current.filter(|c| *c < labels.len()).unwrap_or(0);
        let offset = cursor.saturating_sub(rows.max(1) - 1);
        Self {
            kind: ListKind::Queue,
            labels,
            cursor,
            offset,
        }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor, self.offset)
    }

    fn index_width(&self) -> usize {
        match self.kind {
            ListKind::Playlists => 0,
            ListKind::Queue => self.labels.len().to_string().len() + 2,
        }
    }

    fn row(&self, i: usize) -> String {
        let label = lcd_text(&self.labels[i]);
        match self.kind {
            ListKind::Playlists => format!("{}{}", marker(i == self.cursor), label),
            ListKind::Queue => {
                let digits = self.index_width() - 2;
                format!("{}{:>digits$}. {}", marker(i == self.cursor), i + 1, label)
            }
        }
    }
}

impl Screen for ListScreen {
    fn show(&self, rows: usize) -> Frame {
        if self.labels.is_empty() {
            let text = match self.kind {
                ListKind::Playlists => "No playlists",
                ListKind::Queue => "Queue empty",
            };
            return Frame::new(pad_rows(vec![text.to_string()], rows), 0);
        }
        let lines = (self.offset..self.labels.len())
            .take(rows)
            .map(|i| self.row(i))
            .collect();
        Frame::new(pad_rows(lines, rows), 1 + self.index_width())
    }

    fn action(&mut self, action: &Action, ctx: &mut ActionCtx) -> ActionResult {
        let count = self.labels.len();
        let (cursor, offset) = match action {
            Action::Up => cursor_up(self.cursor, self.offset, count, ctx.rows, 1),
            Action::Down => cursor_down(self.cursor, self.offset, count, ctx.rows, 1),
            Action::Up10 => cursor_up(self.cursor, self.offset, count, ctx.rows, 10),
            Action::Down10 => cursor_down(self.cursor, self.offset, count, ctx.rows, 10),
            Action::Select => {
                if let Some(label) = self.labels.get(self.cursor) {
                    let cmd = match self.kind {
                        ListKind::Playlists => PlayerCommand::PlayPlaylist(label.clone()),
                        ListKind::Queue => PlayerCommand::Play(u32::try_from(self.cursor).ok()),
                    };
                    ctx.emit(Effect::Player(cmd));
                }
                return ActionResult::Ok;
            }
            Action::Back => return ActionResult::Back,
            _ => return ActionResult::Unhandled,
        };
        self.cursor = cursor;
        self.offset = offset;
        ActionResult::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("song {i}")).collect()
    }

    #[test]
    fn test_queue_rows_carry_index_in_prefix() {
        let list = ListScreen::queue(labels(12), Some(10), 2);
        assert_eq!(list.cursor(), (10, 9));
        let frame = list.show(2);
        assert_eq!(frame.lines, vec![" 10. song 10".to_string(), "\x7e11. song 11".to_string()]);
        assert_eq!(frame.fixed_prefix, 5);
    }

    #[test]
    fn test_playlist_rows() {
        let list = ListScreen::playlists(vec!["jazz".to_string()]);
        let frame = list.show(2);
        assert_eq!(frame.lines, vec!["\x7ejazz".to_string(), String::new()]);
        assert_eq!(frame.fixed_prefix, 1);
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(ListScreen::playlists(Vec::new()).show(2).lines[0], "No playlists");
        assert_eq!(ListScreen::queue(Vec::new(), None, 2).show(2).lines[0], "Queue empty");
    }

    #[test]
    fn test_select_plays_and_stays() {
        let mut list = ListScreen::queue(labels(5), None, 2);
        let mut ctx = ActionCtx::new(2);
        list.action(&Action::Down, &mut ctx);
        list.action(&Action::Down, &mut ctx);
        assert!(matches!(list.action(&Action::Select, &mut ctx), ActionResult::Ok));
        assert_eq!(
            ctx.into_effects(),
            vec![Effect::Player(PlayerCommand::Play(Some(2)))]
        );

        let mut playlists = ListScreen::playlists(vec!["a".to_string(), "b".to_string()]);
        let mut ctx = ActionCtx::new(2);
        playlists.action(&Action::Up, &mut ctx);
        playlists.action(&Action::Select, &mut ctx);
        assert_eq!(
            ctx.into_effects(),
            vec![Effect::Player(PlayerCommand::PlayPlaylist("b".to_string()))]
        );
    }
}
