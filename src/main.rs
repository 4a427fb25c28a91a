use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use mpd_lcd::app::cli::Args;
use mpd_lcd::app::config::{AppConfig, Config, DisplayKind};
use mpd_lcd::app::effects::EffectRunner;
use mpd_lcd::app::events;
use mpd_lcd::app::Dispatcher;
use mpd_lcd::display::{ConsoleDisplay, Display, DisplayHandle, LogDisplay};
use mpd_lcd::player::{self, PlayerTrait};
use mpd_lcd::sources;

const LOG_FILE: &str = "mpd-lcd.log";

/// File logging when asked for, or when the terminal is the display;
/// stderr otherwise. `RUST_LOG` overrides the `info` default.
fn init_logging(log_file: Option<&Path>, console: bool) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let target = match log_file {
        Some(path) => Some(path.to_path_buf()),
        None if console => Some(AppConfig::get_config_dir().join(LOG_FILE)),
        None => None,
    };

    let Some(path) = target else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to init logging: {e}"))?;
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| LOG_FILE.to_string());

    let file_appender = tracing_appender::rolling::never(&dir, &name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to init logging: {e}"))?;
    tracing::info!("logging to {}", path.display());
    Ok(Some(guard))
}

fn load_config(path: &Path, args: &Args) -> Result<Config> {
    let mut config = Config::load(path)?;
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();
    let args = Args::parse();

    if args.generate_config {
        println!("{}", Config::default().to_toml()?);
        return Ok(());
    }

    let config_path = args.config_path();
    let config = load_config(&config_path, &args)
        .with_context(|| format!("load configuration from {}", config_path.display()))?;
    let console = config.display.kind == DisplayKind::Console;
    let _log_guard = init_logging(args.log_file.as_deref(), console)?;
    tracing::info!(config = %config_path.display(), mpd = %config.mpd.host, "mpd-lcd starting");

    let config = Arc::new(config);
    let (senders, inbox) = events::channels(config.display.refresh());

    // 1. Player and effect runner
    let backend: Arc<dyn PlayerTrait> = Arc::from(player::get_player(&config.mpd.host));
    let runner = EffectRunner::new(backend, senders.completions.clone());

    // 2. Display sink on its own thread
    let sink: Box<dyn Display> = match config.display.kind {
        DisplayKind::Console => Box::new(
            ConsoleDisplay::new(config.display.width, config.display.height)
                .context("open console display")?,
        ),
        DisplayKind::Log => Box::new(LogDisplay::new()),
    };
    let display = DisplayHandle::spawn(sink).context("start display worker")?;

    // 3. Producers
    #[cfg(feature = "mpd")]
    let _watcher = player::mpd::watcher::spawn_watcher(
        config.mpd.host.clone(),
        senders.status.clone(),
        senders.shutdown_signal(),
    )
    .context("start MPD watcher")?;

    if !config.lirc.socket.is_empty() {
        tokio::spawn(sources::lirc::run(
            PathBuf::from(&config.lirc.socket),
            config.lirc.remote.clone(),
            senders.remote.clone(),
            senders.shutdown_signal(),
        ));
    }

    if !config.services.tcp_server_addr.is_empty() {
        tokio::spawn(sources::net::run(
            config.services.tcp_server_addr.clone(),
            senders.network.clone(),
            senders.shutdown_signal(),
        ));
    }

    if console {
        tokio::spawn(sources::keyboard::run(senders.clone()));
    }

    let signal_senders = senders.clone();
    let reload_args = args.clone();
    tokio::spawn(async move {
        let reload = move || load_config(&config_path, &reload_args);
        if let Err(e) = sources::signals::run(signal_senders, reload).await {
            tracing::error!("signal handling: {e:#}");
        }
    });

    // 4. Dispatcher loop until shutdown
    let dispatcher = Dispatcher::new(config, Box::new(display));
    dispatcher.run(inbox, runner, senders).await;

    tracing::info!("mpd-lcd exiting");
    Ok(())
}
