use super::{cursor_down, cursor_rows, cursor_up, pad_rows, ActionCtx, ActionResult, Frame, Screen, TextScreen};
use crate::app::config::{MenuKind, MenuNode};
use crate::app::effects::Effect;
use crate::app::executor::CommandSpec;
use crate::app::keys::Action;

/// One level of the configured menu tree.
#[derive(Debug, Clone)]
pub struct MenuScreen {
    node: MenuNode,
    cursor: usize,
    offset: usize,
}

impl MenuScreen {
    pub fn new(node: MenuNode) -> Self {
        Self {
            node,
            cursor: 0,
            offset: 0,
        }
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor, self.offset)
    }

    pub fn label(&self) -> &str {
        &self.node.label
    }

    fn select(&mut self, ctx: &mut ActionCtx) -> ActionResult {
        let Some(item) = self.node.items.get(self.cursor) else {
            return ActionResult::Ok;
        };

        if !item.items.is_empty() {
            return ActionResult::Push(Box::new(MenuScreen::new(item.clone())));
        }

        match item.kind {
            MenuKind::Builtin => match item.cmd.as_str() {
                "playlists" => ctx.emit(Effect::LoadPlaylists),
                "queue" | "playlist" => ctx.emit(Effect::LoadQueue),
                "home" => return ActionResult::Exit,
                other => {
                    tracing::warn!(builtin = other, "unknown builtin menu command");
                    return ActionResult::Push(Box::new(TextScreen::new(vec![
                        "Err: unknown".to_string(),
                        other.to_string(),
                    ])));
                }
            },
            MenuKind::Cmd if !item.cmd.is_empty() => ctx.emit(Effect::Run(CommandSpec {
                cmd: item.cmd.clone(),
                args: item.args.clone(),
                run_in_background: item.run_in_background,
            })),
            MenuKind::Cmd => {}
        }
        ActionResult::Ok
    }
}

impl Screen for MenuScreen {
    fn show(&self, rows: usize) -> Frame {
        let labels: Vec<String> = self.node.items.iter().map(|i| i.label.clone()).collect();
        Frame::new(
            pad_rows(cursor_rows(&labels, self.cursor, self.offset, rows), rows),
            1,
        )
    }

    fn action(&mut self, action: &Action, ctx: &mut ActionCtx) -> ActionResult {
        let count = self.node.items.len();
        let (cursor, offset) = match action {
            Action::Up => cursor_up(self.cursor, self.offset, count, ctx.rows, 1),
            Action::Down => cursor_down(self.cursor, self.offset, count, ctx.rows, 1),
            Action::Up10 => cursor_up(self.cursor, self.offset, count, ctx.rows, 10),
            Action::Down10 => cursor_down(self.cursor, self.offset, count, ctx.rows, 10),
            Action::Select => return self.select(ctx),
            Action::Back => return ActionResult::Back,
            _ => return ActionResult::Unhandled,
        };
        self.cursor = cursor;
        self.offset = offset;
        ActionResult::Ok
    }
}
