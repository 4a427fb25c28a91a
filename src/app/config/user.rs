use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `[mpd]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpdConfig {
    /// "host:port" of the MPD server.
    pub host: String,
}

impl Default for MpdConfig {
    fn default() -> Self {
        Self {
            host: "localhost:6600".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    /// Box drawn in the terminal.
    Console,
    /// Every new frame goes to the log.
    #[default]
    Log,
}

/// `[display]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Milliseconds between renders.
    pub refresh_interval: u64,
    pub kind: DisplayKind,
    pub width: usize,
    pub height: usize,
    /// Milliseconds two accepted command tokens must be apart.
    pub min_command_interval: u64,
    /// How long raw or failed-to-parse urgent messages stay up.
    pub urgent_timeout_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval: 500,
            kind: DisplayKind::default(),
            width: 16,
            height: 2,
            min_command_interval: 500,
            urgent_timeout_ms: 5000,
        }
    }
}

impl DisplayConfig {
    pub fn refresh(&self) -> Duration {
        Duration::from_millis(self.refresh_interval)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.min_command_interval)
    }

    /// `urgent_timeout_ms` in renders, at least one.
    pub fn urgent_ticks(&self) -> u32 {
        let ticks = self.urgent_timeout_ms / self.refresh_interval.max(1);
        u32::try_from(ticks).unwrap_or(u32::MAX).max(1)
    }
}

/// `[services]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Line-based command listener. Empty disables it.
    pub tcp_server_addr: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            tcp_server_addr: "127.0.0.1:8681".to_string(),
        }
    }
}

/// `[lirc]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LircConfig {
    /// lircd socket. Empty disables the remote.
    pub socket: String,
    /// Only buttons from this remote are used; `*` or empty accepts all.
    pub remote: String,
}

impl Default for LircConfig {
    fn default() -> Self {
        Self {
            socket: "/var/run/lirc/lircd".to_string(),
            remote: "*".to_string(),
        }
    }
}
