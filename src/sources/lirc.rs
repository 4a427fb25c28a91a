//! Remote control buttons from the lircd socket.

use crate::app::events::shutdown_requested;
use super::{is_shutdown, sleep_or_shutdown, RETRY_DELAY};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixStream;
use tokio::sync::{mpsc, watch};

/// One broadcast line: `<code> <repeat> <button> <remote>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LircEvent {
    pub code: String,
    pub repeat: u32,
    pub button: String,
    pub remote: String,
}

pub fn parse_lirc_line(line: &str) -> Option<LircEvent> {
    let mut fields = line.split_whitespace();
    let code = fields.next()?;
    let repeat = u32::from_str_radix(fields.next()?, 16).ok()?;
    let button = fields.next()?;
    let remote = fields.next()?;
    if fields.next().is_some() {
        return None;
    }
    Some(LircEvent {
        code: code.to_string(),
        repeat,
        button: button.to_string(),
        remote: remote.to_string(),
    })
}

/// `*` or an empty filter accepts every remote.
pub fn remote_matches(filter: &str, remote: &str) -> bool {
    filter.is_empty() || filter == "*" || filter == remote
}

pub async fn run(
    socket: PathBuf,
    remote: String,
    tx: mpsc::Sender<String>,
    mut shutdown: watch::Receiver<bool>,
) {
    while !is_shutdown(&shutdown) {
        match read_socket(&socket, &remote, &tx, &mut shutdown).await {
            Ok(true) => break,
            Ok(false) => tracing::warn!(socket = %socket.display(), "lirc: socket closed"),
            Err(e) => tracing::warn!("lirc: {e:#}"),
        }
        if sleep_or_shutdown(RETRY_DELAY, &mut shutdown).await {
            break;
        }
    }
    tracing::info!("lirc: closing");
}

/// Forward buttons until the socket closes. `Ok(true)` means stop for good.
async fn read_socket(
    socket: &PathBuf,
    remote: &str,
    tx: &mpsc::Sender<String>,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<bool> {
    let stream = UnixStream::connect(socket)
        .await
        .with_context(|| format!("connect to {}", socket.display()))?;
    tracing::info!(socket = %socket.display(), "lirc: connected");

    let mut lines = BufReader::new(stream).lines();
    loop {
        let line = tokio::select! {
            _ = shutdown_requested(shutdown) => return Ok(true),
            line = lines.next_line() => line.context("read from lircd")?,
        };
        let Some(line) = line else {
            return Ok(false);
        };
        match parse_lirc_line(&line) {
            Some(event) if remote_matches(remote, &event.remote) => {
                tracing::debug!(?event, "lirc event");
                if tx.send(event.button).await.is_err() {
                    return Ok(true);
                }
            }
            Some(event) => tracing::debug!(remote = %event.remote, "lirc: other remote"),
            None => tracing::debug!(%line, "lirc: ignored line"),
        }
    }
}
