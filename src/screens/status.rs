use super::{ActionCtx, ActionResult, Frame, Screen, TextScreen, CHAR_PAUSE, CHAR_PLAY, CHAR_STOP};
use crate::app::effects::Effect;
use crate::app::keys::Action;
use crate::player::{PlayerCommand, PlayerStatus};
use crate::scroller::lcd_text;

/// Renders of the confirmation shown after a player key.
const FLASH_TICKS: u32 = 2;

/// Root screen: player state, or load average and clock when idle.
#[derive(Debug, Clone, Default)]
pub struct StatusScreen {
    status: Option<PlayerStatus>,
    last: Vec<String>,
}

impl StatusScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<&PlayerStatus> {
        self.status.as_ref()
    }

    pub fn update(&mut self, status: PlayerStatus) {
        let glyph = state_glyph(&status.state_label);
        self.last = if !status.error.is_empty() {
            vec![
                format!("{} {} {}", load_avg(), glyph, status.volume),
                format!("Err:{}", lcd_text(&status.error)),
            ]
        } else if status.playing {
            vec![
                format!("{} {} {} {}", load_avg(), glyph, status.flags, status.volume),
                lcd_text(&status.current_track),
            ]
        } else {
            Vec::new()
        };
        self.status = Some(status);
    }

    fn player_key(&self, cmd: PlayerCommand, label: &str, ctx: &mut ActionCtx) -> ActionResult {
        ctx.emit(Effect::Player(cmd));
        ActionResult::Push(Box::new(TextScreen::flash(
            vec![label.to_string(), String::new()],
            FLASH_TICKS,
        )))
    }
}

impl Screen for StatusScreen {
    fn show(&self, rows: usize) -> Frame {
        let mut lines = if self.last.is_empty() {
            idle_rows()
        } else {
            self.last.clone()
        };
        lines.resize(rows, String::new());
        Frame::new(lines, 0)
    }

    fn action(&mut self, action: &Action, ctx: &mut ActionCtx) -> ActionResult {
        match action {
            Action::Play => self.player_key(PlayerCommand::Play(None), "play", ctx),
            Action::Stop => self.player_key(PlayerCommand::Stop, "stop", ctx),
            Action::Pause => self.player_key(PlayerCommand::Pause, "pause", ctx),
            Action::Next => self.player_key(PlayerCommand::Next, "next", ctx),
            Action::Prev => self.player_key(PlayerCommand::Prev, "previous", ctx),
            Action::VolMute => self.player_key(PlayerCommand::Mute, "mute", ctx),
            Action::VolUp => {
                ctx.emit(Effect::Player(PlayerCommand::VolumeUp));
                ActionResult::Ok
            }
            Action::VolDown => {
                ctx.emit(Effect::Player(PlayerCommand::VolumeDown));
                ActionResult::Ok
            }
            Action::Up
            | Action::Down
            | Action::Up10
            | Action::Down10
            | Action::Select
            | Action::Back => ActionResult::Ok,
            _ => ActionResult::Unhandled,
        }
    }
}

fn idle_rows() -> Vec<String> {
    vec![
        format!("{} {}", load_avg(), CHAR_STOP),
        chrono::Local::now().format("%m-%d %H:%M:%S").to_string(),
    ]
}

fn state_glyph(state: &str) -> char {
    match state {
        "play" => CHAR_PLAY,
        "pause" => CHAR_PAUSE,
        _ => CHAR_STOP,
    }
}

/// One-minute load average with one decimal, or empty if unavailable.
pub fn load_avg() -> String {
    match std::fs::read_to_string("/proc/loadavg") {
        Ok(data) => parse_load_avg(&data),
        Err(e) => {
            tracing::debug!("loadavg: {e}");
            String::new()
        }
    }
}

fn parse_load_avg(data: &str) -> String {
    match data.find('.') {
        Some(i) if i > 0 => data.chars().take(i + 2).collect(),
        _ => String::new(),
    }
}
