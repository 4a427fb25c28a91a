//! Pushes a fresh `PlayerStatus` on connect and on every MPD idle event.

use super::read_status;
use crate::player::PlayerStatus;
use ::mpd::idle::{Idle, Subsystem};
use ::mpd::Client;
use anyhow::{Context, Result};
use std::thread;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

const SUBSYSTEMS: [Subsystem; 4] = [
    Subsystem::Player,
    Subsystem::Mixer,
    Subsystem::Options,
    Subsystem::Queue,
];

/// Start the watcher on its own thread. MPD's idle command blocks, so this
/// stays off the async runtime; the thread exits once the shutdown flag is
/// seen or the dispatcher has gone away.
pub fn spawn_watcher(
    addr: String,
    tx: mpsc::Sender<PlayerStatus>,
    shutdown: watch::Receiver<bool>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("mpd-watcher".to_string())
        .spawn(move || {
            while !*shutdown.borrow() {
                match watch_once(&addr, &tx, &shutdown) {
                    Ok(()) => return,
                    Err(e) => tracing::warn!("mpd watch: {e:#}; retrying in {:?}", RECONNECT_DELAY),
                }
                thread::sleep(RECONNECT_DELAY);
            }
            tracing::info!("mpd watch: closing");
        })
}

/// One connection's worth of watching. `Ok` means stop for good.
fn watch_once(
    addr: &str,
    tx: &mpsc::Sender<PlayerStatus>,
    shutdown: &watch::Receiver<bool>,
) -> Result<()> {
    let mut client = Client::connect(addr).with_context(|| format!("connect to {addr}"))?;
    tracing::info!(%addr, "mpd watch: connected");

    loop {
        let status = read_status(&mut client)?;
        tracing::debug!(?status, "mpd status");
        if tx.blocking_send(status).is_err() || *shutdown.borrow() {
            return Ok(());
        }
        let events = client.wait(&SUBSYSTEMS).context("idle")?;
        tracing::debug!(?events, "mpd watch: event");
    }
}
