use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Player state snapshot delivered on every change 🎵
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub playing: bool,
    /// "play", "pause" or "stop".
    pub state_label: String,
    /// "S" (random), "R" (repeat) or empty.
    pub flags: String,
    pub volume: String,
    pub current_track: String,
    pub error: String,
}

/// The interface the display needs from a media player.
pub trait PlayerTrait: Send + Sync {
    fn status(&self) -> Result<PlayerStatus>;
    /// Start playback, optionally at a queue position.
    fn play(&self, pos: Option<u32>) -> Result<()>;
    fn stop(&self) -> Result<()>;
    /// Toggle pause.
    fn pause(&self) -> Result<()>;
    fn next(&self) -> Result<()>;
    fn prev(&self) -> Result<()>;
    fn volume_up(&self) -> Result<()>;
    fn volume_down(&self) -> Result<()>;
    /// Mute, or restore the volume from before the last mute.
    fn toggle_mute(&self) -> Result<()>;

    fn playlists(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
    /// Replace the queue with a stored playlist and start playing it.
    fn play_playlist(&self, _name: &str) -> Result<()> {
        Ok(())
    }
    /// Queue labels and the position of the current song.
    fn queue(&self) -> Result<(Vec<String>, Option<usize>)> {
        Ok((Vec::new(), None))
    }
}

/// A player request emitted by a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Play(Option<u32>),
    Stop,
    Pause,
    Next,
    Prev,
    VolumeUp,
    VolumeDown,
    Mute,
    PlayPlaylist(String),
}

impl PlayerCommand {
    pub fn run(&self, player: &dyn PlayerTrait) -> Result<()> {
        match self {
            Self::Play(pos) => player.play(*pos),
            Self::Stop => player.stop(),
            Self::Pause => player.pause(),
            Self::Next => player.next(),
            Self::Prev => player.prev(),
            Self::VolumeUp => player.volume_up(),
            Self::VolumeDown => player.volume_down(),
            Self::Mute => player.toggle_mute(),
            Self::PlayPlaylist(name) => player.play_playlist(name),
        }
    }
}

/// Volume after a mute toggle: mute when audible, otherwise restore the
/// remembered level (full volume when nothing was remembered).
pub fn mute_target(current: i8, remembered: Option<i8>) -> (i8, Option<i8>) {
    if current == 0 {
        (remembered.filter(|v| *v > 0).unwrap_or(100), None)
    } else {
        (0, Some(current))
    }
}
