//! Line-based command listener. Each line is one token or an urgent
//! message in JSON.

use crate::app::events::shutdown_requested;
use super::{is_shutdown, sleep_or_shutdown, RETRY_DELAY};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};

/// Send every non-empty line of `reader`. Returns the number forwarded.
pub async fn forward_lines<R>(reader: R, tx: &mpsc::Sender<String>) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut sent = 0;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if tx.send(line.to_string()).await.is_err() {
            break;
        }
        sent += 1;
    }
    Ok(sent)
}

pub async fn run(addr: String, tx: mpsc::Sender<String>, mut shutdown: watch::Receiver<bool>) {
    let listener = loop {
        match TcpListener::bind(&addr).await {
            Ok(listener) => break listener,
            Err(e) => tracing::warn!(%addr, "tcp: bind failed: {e}"),
        }
        if sleep_or_shutdown(RETRY_DELAY, &mut shutdown).await {
            return;
        }
    };
    tracing::info!(%addr, "tcp: listening");

    while !is_shutdown(&shutdown) {
        let accepted = tokio::select! {
            _ = shutdown_requested(&mut shutdown) => break,
            accepted = listener.accept() => accepted,
        };
        match accepted {
            Ok((stream, peer)) => {
                tracing::debug!(%peer, "tcp: connection");
                let tx = tx.clone();
                tokio::spawn(async move {
                    match forward_lines(stream, &tx).await {
                        Ok(n) => tracing::debug!(%peer, lines = n, "tcp: connection closed"),
                        Err(e) => tracing::warn!(%peer, "tcp: read error: {e}"),
                    }
                });
            }
            Err(e) => {
                tracing::warn!("tcp: accept failed: {e}");
                if sleep_or_shutdown(RETRY_DELAY, &mut shutdown).await {
                    break;
                }
            }
        }
    }
    tracing::info!("tcp: closing");
}
