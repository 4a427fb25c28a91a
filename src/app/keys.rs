use serde::{Deserialize, Serialize};

/// Logical action a raw remote/network/keyboard token maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Global
    MenuShow,
    ToggleBacklight,

    // Navigation
    Up,
    Down,
    Up10,
    Down10,
    Select,
    Back,

    // Player
    Play,
    Stop,
    Pause,
    Next,
    Prev,
    VolUp,
    VolDown,
    VolMute,

    /// Token with no configured meaning.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuKeys {
    pub show: String,
    pub back: String,
    pub up: String,
    pub down: String,
    pub select: String,
    pub up10: String,
    pub down10: String,
}

impl Default for MenuKeys {
    fn default() -> Self {
        Self {
            show: "KEY_MENU".to_string(),
            back: "KEY_BACK".to_string(),
            up: "KEY_UP".to_string(),
            down: "KEY_DOWN".to_string(),
            select: "KEY_OK".to_string(),
            up10: "KEY_PAGEUP".to_string(),
            down10: "KEY_PAGEDOWN".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpdKeys {
    pub play: String,
    pub stop: String,
    pub pause: String,
    pub next: String,
    pub prev: String,
    pub vol_up: String,
    pub vol_down: String,
    pub vol_mute: String,
}

impl Default for MpdKeys {
    fn default() -> Self {
        Self {
            play: "KEY_PLAY".to_string(),
            stop: "KEY_STOP".to_string(),
            pause: "KEY_PAUSE".to_string(),
            next: "KEY_NEXT".to_string(),
            prev: "KEY_PREVIOUS".to_string(),
            vol_up: "KEY_VOLUMEUP".to_string(),
            vol_down: "KEY_VOLUMEDOWN".to_string(),
            vol_mute: "KEY_MUTE".to_string(),
        }
    }
}

/// Mapping between raw input tokens (LIRC button names, network lines) and
/// actions. Stored under `[keys]` in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub toggle_lcd: String,
    pub menu: MenuKeys,
    pub mpd: MpdKeys,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            toggle_lcd: "KEY_SCREEN".to_string(),
            menu: MenuKeys::default(),
            mpd: MpdKeys::default(),
        }
    }
}

impl KeyConfig {
    pub fn matches(&self, token: &str, key_str: &str) -> bool {
        // An empty binding disables the action.
        !key_str.is_empty() && token == key_str
    }

    /// Map a trimmed token to its action.
    pub fn action(&self, token: &str) -> Action {
        let bindings = [
            (&self.menu.show, Action::MenuShow),
            (&self.toggle_lcd, Action::ToggleBacklight),
            (&self.menu.up, Action::Up),
            (&self.menu.down, Action::Down),
            (&self.menu.up10, Action::Up10),
            (&self.menu.down10, Action::Down10),
            (&self.menu.select, Action::Select),
            (&self.menu.back, Action::Back),
            (&self.mpd.play, Action::Play),
            (&self.mpd.stop, Action::Stop),
            (&self.mpd.pause, Action::Pause),
            (&self.mpd.next, Action::Next),
            (&self.mpd.prev, Action::Prev),
            (&self.mpd.vol_up, Action::VolUp),
            (&self.mpd.vol_down, Action::VolDown),
            (&self.mpd.vol_mute, Action::VolMute),
        ];

        bindings
            .into_iter()
            .find(|(key, _)| self.matches(token, key))
            .map(|(_, action)| action)
            .unwrap_or_else(|| Action::Unknown(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keys = KeyConfig::default();
        assert_eq!(keys.action("KEY_MENU"), Action::MenuShow);
        assert_eq!(keys.action("KEY_OK"), Action::Select);
        assert_eq!(keys.action("KEY_PAGEDOWN"), Action::Down10);
        assert_eq!(keys.action("KEY_MUTE"), Action::VolMute);
        assert_eq!(keys.action("hello"), Action::Unknown("hello".to_string()));
    }

    #[test]
    fn test_empty_binding_never_matches() {
        let mut keys = KeyConfig::default();
        keys.mpd.stop = String::new();
        assert_eq!(keys.action(""), Action::Unknown(String::new()));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let keys: KeyConfig = toml::from_str("[menu]\nup = \"UP\"\n").unwrap();
        assert_eq!(keys.action("UP"), Action::Up);
        assert_eq!(keys.action("KEY_DOWN"), Action::Down);
        assert_eq!(keys.action("KEY_SCREEN"), Action::ToggleBacklight);
    }
}
