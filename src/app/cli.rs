use clap::Parser;
use std::path::PathBuf;

/// Fastest refresh accepted from the command line.
pub const MIN_INTERVAL_MS: u64 = 50;

/// mpd-lcd - MPD on a two-line character display 📟
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mpd-lcd", version, about)]
pub struct Args {
    /// Configuration file (default: ~/.config/mpd-lcd/config.toml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Draw the display in this terminal and read keys from it
    #[arg(long)]
    pub console: bool,

    /// Refresh interval in milliseconds (overrides the config file)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// MPD address as host:port (overrides the config file)
    #[arg(long)]
    pub mpd_host: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Generate default config.toml to stdout
    #[arg(long)]
    pub generate_config: bool,
}

impl Args {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::app::config::AppConfig::get_config_path)
    }

    /// Apply command line overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut crate::app::config::Config) {
        if let Some(interval) = self.interval {
            config.display.refresh_interval = interval.max(MIN_INTERVAL_MS);
        }
        if let Some(host) = &self.mpd_host {
            config.mpd.host = host.clone();
        }
        if self.console {
            config.display.kind = crate::app::config::DisplayKind::Console;
        }
    }
}
