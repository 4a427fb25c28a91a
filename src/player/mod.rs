pub mod mpd;
pub mod traits;

#[cfg(feature = "mpd")]
pub use self::mpd::MpdPlayer;
pub use traits::{PlayerCommand, PlayerStatus, PlayerTrait};

use anyhow::Result;

/// Stand-in used when the crate is built without MPD support.
pub struct DummyPlayer;

impl PlayerTrait for DummyPlayer {
    fn status(&self) -> Result<PlayerStatus> { Ok(PlayerStatus::default()) }
    fn play(&self, _pos: Option<u32>) -> Result<()> { Ok(()) }
    fn stop(&self) -> Result<()> { Ok(()) }
    fn pause(&self) -> Result<()> { Ok(()) }
    fn next(&self) -> Result<()> { Ok(()) }
    fn prev(&self) -> Result<()> { Ok(()) }
    fn volume_up(&self) -> Result<()> { Ok(()) }
    fn volume_down(&self) -> Result<()> { Ok(()) }
    fn toggle_mute(&self) -> Result<()> { Ok(()) }
}

/// Factory for the configured player backend.
pub fn get_player(_host: &str) -> Box<dyn PlayerTrait> {
    #[cfg(feature = "mpd")]
    {
        Box::new(MpdPlayer::new(_host.to_string()))
    }
    #[cfg(not(feature = "mpd"))]
    {
        Box::new(DummyPlayer)
    }
}
