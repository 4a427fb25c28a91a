//! Priority overlay for urgent messages 🚨
//!
//! Messages queue up in FIFO order and take over the display until they are
//! dismissed or their tick budget runs out.

use super::{pad_rows, window, ActionCtx, ActionResult, Frame, Screen};
use crate::app::keys::Action;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Message accepted on the network channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgentText {
    #[serde(rename = "Text")]
    pub text: String,
    /// Ticks to show the message; missing or `0` shows it for one tick.
    #[serde(rename = "Timeout")]
    pub timeout: u32,
    #[serde(rename = "PutOnTop")]
    pub put_on_top: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UrgentMessage {
    pub lines: Vec<String>,
    /// Ticks left; `0` means sticky.
    pub remaining: u32,
}

impl UrgentMessage {
    pub fn from_text(text: &str, timeout: u32) -> Self {
        Self {
            lines: text.lines().map(|l| l.trim().to_string()).collect(),
            remaining: timeout,
        }
    }
}

#[derive(Debug, Default)]
pub struct UrgentScreen {
    messages: VecDeque<UrgentMessage>,
    offset: usize,
}

impl UrgentScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn head(&self) -> Option<&UrgentMessage> {
        self.messages.front()
    }

    pub fn add_msg(&mut self, lines: Vec<String>, timeout: u32, put_on_top: bool) {
        let msg = UrgentMessage {
            lines,
            remaining: timeout,
        };
        tracing::debug!(?msg, put_on_top, "urgent message");
        if put_on_top {
            self.messages.push_front(msg);
            self.offset = 0;
        } else {
            self.messages.push_back(msg);
        }
    }

    /// Queue messages from a JSON object, a stream of objects or an array.
    /// Anything that does not parse is shown verbatim for `default_timeout`.
    pub fn add_json(&mut self, raw: &str, default_timeout: u32) {
        if raw.trim().is_empty() {
            return;
        }
        match parse_urgent(raw) {
            Ok(texts) => {
                for text in texts {
                    if text.text.trim().is_empty() {
                        tracing::debug!("urgent message without text dropped");
                        continue;
                    }
                    // Only unhandled tokens are sticky.
                    let msg = UrgentMessage::from_text(&text.text, text.timeout.max(1));
                    self.add_msg(msg.lines, msg.remaining, text.put_on_top);
                }
            }
            Err(e) => {
                tracing::warn!("urgent message is not JSON ({e}), showing raw text");
                let msg = UrgentMessage::from_text(raw, default_timeout);
                self.add_msg(msg.lines, msg.remaining, false);
            }
        }
    }

    /// Spend one tick of the head message's budget.
    pub fn tick(&mut self) {
        let Some(head) = self.messages.front_mut() else {
            return;
        };
        match head.remaining {
            0 => {}
            1 => self.dequeue(),
            _ => head.remaining -= 1,
        }
    }

    fn dequeue(&mut self) {
        self.messages.pop_front();
        self.offset = 0;
    }
}

fn parse_urgent(raw: &str) -> serde_json::Result<Vec<UrgentText>> {
    if raw.trim_start().starts_with('[') {
        return serde_json::from_str(raw);
    }
    serde_json::Deserializer::from_str(raw)
        .into_iter::<UrgentText>()
        .collect()
}

impl Screen for UrgentScreen {
    fn show(&self, rows: usize) -> Frame {
        let lines = match self.messages.front() {
            Some(msg) => window(&msg.lines, self.offset, rows),
            None => vec!["No messages".to_string()],
        };
        Frame::new(pad_rows(lines, rows), 0)
    }

    fn action(&mut self, action: &Action, ctx: &mut ActionCtx) -> ActionResult {
        let Some(head) = self.messages.front() else {
            return ActionResult::Unhandled;
        };
        match action {
            Action::Up => {
                self.offset = self.offset.saturating_sub(1);
                ActionResult::Ok
            }
            Action::Down => {
                if self.offset + ctx.rows < head.lines.len() {
                    self.offset += 1;
                }
                ActionResult::Ok
            }
            Action::Select | Action::Back => {
                self.dequeue();
                if self.messages.is_empty() {
                    ActionResult::Back
                } else {
                    ActionResult::Ok
                }
            }
            _ => ActionResult::Unhandled,
        }
    }
}
