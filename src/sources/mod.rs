//! Producers that feed the dispatcher's queues.

use crate::app::events::shutdown_requested;
use std::time::Duration;
use tokio::sync::watch;

pub mod keyboard;
pub mod lirc;
pub mod net;
pub mod signals;

/// Delay between reconnect attempts of the I/O collaborators.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Sleep for `delay` unless shutdown is requested first.
/// Returns `true` when the caller should stop.
pub(crate) async fn sleep_or_shutdown(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = shutdown_requested(shutdown) => true,
        _ = tokio::time::sleep(delay) => false,
    }
}

pub(crate) fn is_shutdown(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}
