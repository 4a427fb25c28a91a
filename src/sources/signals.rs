use crate::app::config::Config;
use crate::app::events::{shutdown_requested, Senders};
use anyhow::{Context, Result};
use tokio::signal::unix::{signal, SignalKind};

/// SIGINT and SIGTERM stop the process; SIGHUP reloads the configuration
/// through `reload` and hands the new snapshot to the dispatcher.
pub async fn run<F>(senders: Senders, reload: F) -> Result<()>
where
    F: Fn() -> Result<Config> + Send + 'static,
{
    let mut interrupt = signal(SignalKind::interrupt()).context("install SIGINT handler")?;
    let mut terminate = signal(SignalKind::terminate()).context("install SIGTERM handler")?;
    let mut hangup = signal(SignalKind::hangup()).context("install SIGHUP handler")?;
    let mut shutdown = senders.shutdown_signal();

    loop {
        tokio::select! {
            _ = shutdown_requested(&mut shutdown) => break,
            _ = interrupt.recv() => {
                tracing::info!("SIGINT received");
                senders.shutdown();
                break;
            }
            _ = terminate.recv() => {
                tracing::info!("SIGTERM received");
                senders.shutdown();
                break;
            }
            _ = hangup.recv() => {
                tracing::info!("SIGHUP received, reloading configuration");
                match reload() {
                    Ok(config) => {
                        if senders.reload.send(Box::new(config)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::error!("reload failed, keeping current configuration: {e:#}"),
                }
            }
        }
    }
    Ok(())
}
