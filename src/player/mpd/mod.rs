//! MPD player backend 🎵
//!
//! Implements `PlayerTrait` with the Music Player Daemon protocol and
//! provides the status watcher that feeds the display.

#[cfg(feature = "mpd")]
use super::traits::{mute_target, PlayerStatus, PlayerTrait};
#[cfg(feature = "mpd")]
use ::mpd::{Client, Song, State, Status};
#[cfg(feature = "mpd")]
use anyhow::{Context, Result};
#[cfg(feature = "mpd")]
use std::sync::Mutex;

#[cfg(feature = "mpd")]
pub mod watcher;

/// MPD Player implementation
#[cfg(feature = "mpd")]
pub struct MpdPlayer {
    addr: String,
    client: Mutex<Option<Client>>,
    pre_mute_volume: Mutex<Option<i8>>,
}

#[cfg(feature = "mpd")]
impl MpdPlayer {
    pub fn new(addr: String) -> Self {
        Self {
            addr,
            client: Mutex::new(None),
            pre_mute_volume: Mutex::new(None),
        }
    }

    /// Run `f` with a live client, reconnecting if necessary.
    fn with_client<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Client) -> Result<T>,
    {
        let mut client_guard = self
            .client
            .lock()
            .map_err(|_| anyhow::anyhow!("MPD client mutex poisoned"))?;

        let needs_connect = match client_guard.as_mut() {
            Some(client) => client.status().is_err(),
            None => true,
        };

        if needs_connect {
            match Client::connect(self.addr.as_str()) {
                Ok(c) => {
                    tracing::debug!(addr = %self.addr, "connected to MPD");
                    *client_guard = Some(c);
                }
                Err(e) => {
                    *client_guard = None;
                    return Err(anyhow::anyhow!(
                        "Failed to connect to MPD at {}: {}",
                        self.addr,
                        e
                    ));
                }
            }
        }

        match client_guard.as_mut() {
            Some(client) => f(client),
            None => Err(anyhow::anyhow!("No MPD connection")),
        }
    }
}

#[cfg(feature = "mpd")]
impl PlayerTrait for MpdPlayer {
    fn status(&self) -> Result<PlayerStatus> {
        self.with_client(read_status)
    }

    fn play(&self, pos: Option<u32>) -> Result<()> {
        self.with_client(|client| match pos {
            Some(pos) => client.switch(pos).context("Failed to switch to position"),
            None => client.play().context("Failed to start playback"),
        })
    }

    fn stop(&self) -> Result<()> {
        self.with_client(|client| client.stop().context("Failed to stop"))
    }

    fn pause(&self) -> Result<()> {
        self.with_client(|client| {
            let status = client.status()?;
            client
                .pause(status.state != State::Pause)
                .context("Failed to toggle pause")
        })
    }

    fn next(&self) -> Result<()> {
        self.with_client(|client| client.next().context("Failed to skip to next track"))
    }

    fn prev(&self) -> Result<()> {
        self.with_client(|client| client.prev().context("Failed to skip to previous track"))
    }

    fn volume_up(&self) -> Result<()> {
        self.with_client(|client| {
            let vol = client.status()?.volume;
            if vol >= 0 {
                client.volume(vol.saturating_add(5).min(100))?;
            }
            Ok(())
        })
    }

    fn volume_down(&self) -> Result<()> {
        self.with_client(|client| {
            let vol = client.status()?.volume;
            if vol >= 0 {
                client.volume(vol.saturating_sub(5).max(0))?;
            }
            Ok(())
        })
    }

    fn toggle_mute(&self) -> Result<()> {
        self.with_client(|client| {
            let vol = client.status()?.volume;
            if vol < 0 {
                // No mixer.
                return Ok(());
            }
            let mut saved = self
                .pre_mute_volume
                .lock()
                .map_err(|_| anyhow::anyhow!("mute state mutex poisoned"))?;
            let (target, remember) = mute_target(vol, *saved);
            client.volume(target).context("Failed to set volume")?;
            *saved = remember;
            Ok(())
        })
    }

    fn playlists(&self) -> Result<Vec<String>> {
        self.with_client(|client| {
            let playlists = client.playlists()?;
            Ok(playlists.into_iter().map(|p| p.name).collect())
        })
    }

    fn play_playlist(&self, name: &str) -> Result<()> {
        self.with_client(|client| {
            client.clear()?;
            client.load(name, ..).context("Failed to load playlist")?;
            client.play().context("Failed to start playback")
        })
    }

    fn queue(&self) -> Result<(Vec<String>, Option<usize>)> {
        self.with_client(|client| {
            let current = client.status()?.song.map(|place| place.pos as usize);
            let labels = client
                .queue()?
                .iter()
                .map(|song| {
                    song.title
                        .clone()
                        .or_else(|| song.name.clone())
                        .unwrap_or_else(|| song.file.clone())
                })
                .collect();
            Ok((labels, current))
        })
    }
}

/// Query status and current song and build the display snapshot.
#[cfg(feature = "mpd")]
pub(crate) fn read_status(client: &mut Client) -> Result<PlayerStatus> {
    let status = client.status().context("Failed to read MPD status")?;
    let song = client.currentsong().context("Failed to read current song")?;
    Ok(build_status(&status, song.as_ref()))
}

#[cfg(feature = "mpd")]
fn build_status(status: &Status, song: Option<&Song>) -> PlayerStatus {
    let state_label = match status.state {
        State::Play => "play",
        State::Pause => "pause",
        State::Stop => "stop",
    };

    let find_tag = |song: &Song, key: &str| -> Option<String> {
        song.tags
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.clone())
    };

    let current_track = song
        .map(|song| {
            track_label(&TrackFields {
                pos: status.song.map(|place| place.pos),
                queue_len: status.queue_len,
                name: song.name.clone(),
                artist: song.artist.clone().or_else(|| find_tag(song, "Artist")),
                title: song.title.clone(),
                track: find_tag(song, "Track"),
                album: find_tag(song, "Album"),
                file: song.file.clone(),
            })
        })
        .unwrap_or_default();

    PlayerStatus {
        playing: status.state != State::Stop,
        state_label: state_label.to_string(),
        flags: flags(status.random, status.repeat).to_string(),
        volume: status.volume.to_string(),
        current_track,
        error: status.error.clone().unwrap_or_default(),
    }
}

/// Tag values that make up the current track label.
#[derive(Debug, Clone, Default)]
pub struct TrackFields {
    pub pos: Option<u32>,
    pub queue_len: u32,
    pub name: Option<String>,
    pub artist: Option<String>,
    pub title: Option<String>,
    pub track: Option<String>,
    pub album: Option<String>,
    pub file: String,
}

/// "pos/len; Name; Artist; Title; Track; Album", falling back to the file
/// name when neither name, artist nor title is tagged.
pub fn track_label(fields: &TrackFields) -> String {
    let position = format!(
        "{}/{}",
        fields.pos.map(|p| (p + 1).to_string()).unwrap_or_default(),
        fields.queue_len
    );

    let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
    let identity: Vec<String> = [&fields.name, &fields.artist, &fields.title]
        .into_iter()
        .filter_map(present)
        .collect();
    let has_identity = !identity.is_empty();

    let mut parts = vec![position];
    parts.extend(identity);
    parts.extend(present(&fields.track));
    parts.extend(present(&fields.album));
    if !has_identity && !fields.file.is_empty() {
        parts.push(fields.file.clone());
    }
    parts.join("; ")
}

pub fn flags(random: bool, repeat: bool) -> &'static str {
    if random {
        "S"
    } else if repeat {
        "R"
    } else {
        ""
    }
}
