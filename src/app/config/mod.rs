//! Configuration stored in `config.toml` ⚙️
//!
//! Every field has a default, so a partial file (or none at all) is fine.
//! A loaded `Config` is an immutable snapshot; reloading builds a new one.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod menu;
pub mod user;

pub use menu::{MenuKind, MenuNode};
pub use user::{DisplayConfig, DisplayKind, LircConfig, MpdConfig, ServicesConfig};

use crate::app::keys::KeyConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keys: KeyConfig,
    pub mpd: MpdConfig,
    pub display: DisplayConfig,
    pub services: ServicesConfig,
    pub lirc: LircConfig,
    pub menu: MenuNode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keys: KeyConfig::default(),
            mpd: MpdConfig::default(),
            display: DisplayConfig::default(),
            services: ServicesConfig::default(),
            lirc: LircConfig::default(),
            menu: MenuNode::sample(),
        }
    }
}

impl Config {
    /// Load from `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.display;
        if d.width == 0 || d.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "display size {}x{} must be non-zero",
                d.width, d.height
            )));
        }
        if d.refresh_interval == 0 {
            return Err(ConfigError::Invalid(
                "display.refresh_interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct AppConfig; // Namespace only

impl AppConfig {
    pub fn get_config_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mpd-lcd")
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [display]
            width = 20
            [keys.menu]
            up = "KEY_CHANNELUP"
            "#,
        )
        .unwrap();
        assert_eq!(config.display.width, 20);
        assert_eq!(config.display.height, 2);
        assert_eq!(config.keys.menu.up, "KEY_CHANNELUP");
        assert_eq!(config.keys.menu.down, "KEY_DOWN");
        assert_eq!(config.services.tcp_server_addr, "127.0.0.1:8681");
        assert_eq!(config.menu, MenuNode::sample());
    }

    #[test]
    fn test_menu_tree() {
        let config = Config::from_toml(
            r#"
            [menu]
            label = "Main"

            [[menu.items]]
            label = "Playlists"
            kind = "mpd"
            cmd = "playlists"

            [[menu.items]]
            label = "Tools"

            [[menu.items.items]]
            label = "Restart mpd"
            cmd = "systemctl"
            args = ["restart", "mpd"]
            run_in_background = true
            "#,
        )
        .unwrap();
        let items = &config.menu.items;
        assert_eq!(items[0].kind, MenuKind::Builtin);
        assert_eq!(items[1].items[0].args, vec!["restart", "mpd"]);
        assert!(items[1].items[0].run_in_background);
        assert_eq!(items[1].items[0].kind, MenuKind::Cmd);
    }

    #[test]
    fn test_rejects_zero_geometry() {
        let err = Config::from_toml("[display]\nheight = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = Config::from_toml("[display]\nrefresh_interval = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml("[display\nwidth = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_generated_config_loads_back() {
        let text = Config::default().to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load(Path::new("/nonexistent/mpd-lcd.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_urgent_ticks() {
        let display = DisplayConfig::default();
        assert_eq!(display.urgent_ticks(), 10);
        let slow = DisplayConfig {
            refresh_interval: 10_000,
            ..DisplayConfig::default()
        };
        assert_eq!(slow.urgent_ticks(), 1);
    }
}
