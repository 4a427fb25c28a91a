use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuKind {
    /// External program.
    #[default]
    Cmd,
    /// Built-in: `playlists`, `queue`, or `home` (back to the status screen).
    #[serde(alias = "mpd")]
    Builtin,
}

/// A menu entry; entries with `items` are submenus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuNode {
    pub label: String,
    pub kind: MenuKind,
    pub cmd: String,
    pub args: Vec<String>,
    pub run_in_background: bool,
    pub items: Vec<MenuNode>,
}

impl MenuNode {
    fn builtin(label: &str, cmd: &str) -> Self {
        Self {
            label: label.to_string(),
            kind: MenuKind::Builtin,
            cmd: cmd.to_string(),
            ..Default::default()
        }
    }

    fn command(label: &str, cmd: &str, args: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            cmd: cmd.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    fn submenu(label: &str, items: Vec<MenuNode>) -> Self {
        Self {
            label: label.to_string(),
            items,
            ..Default::default()
        }
    }

    /// Menu used when the config file has none.
    pub fn sample() -> Self {
        Self::submenu(
            "Menu",
            vec![
                Self::builtin("Playlists", "playlists"),
                Self::builtin("Queue", "queue"),
                Self::submenu(
                    "System",
                    vec![
                        Self::command("Uptime", "uptime", &[]),
                        Self::command("Disk", "df", &["-h", "/"]),
                        Self::command("Network", "hostname", &["-I"]),
                        Self::builtin("Home", "home"),
                    ],
                ),
            ],
        )
    }
}
