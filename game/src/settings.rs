use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameplaySettings {
    pub show_placement_preview: bool,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            show_placement_preview: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoSettings {
    pub vsync: bool,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self { vsync: true }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub gameplay: GameplaySettings,
    #[serde(default)]
    pub video: VideoSettings,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            gameplay: GameplaySettings::default(),
            video: VideoSettings::default(),
        }
    }
}

impl PlayerSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("LOVEBLOCKS_SETTINGS_PATH") {
            return Self::new(PathBuf::from(explicit));
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("love-blocks");
        path.push("settings.json");
        Self::new(path)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Missing or malformed files fall back to defaults; settings are never a
    /// reason to refuse to start.
    pub fn load(&self) -> PlayerSettings {
        let Ok(bytes) = fs::read(&self.path) else {
            return PlayerSettings::default();
        };
        serde_json::from_slice::<PlayerSettings>(&bytes)
            .map(PlayerSettings::sanitized)
            .unwrap_or_else(|_| PlayerSettings::default())
    }

    pub fn save(&self, settings: &PlayerSettings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: PlayerSettings =
            serde_json::from_str(r#"{"version":1}"#).expect("settings JSON should parse");
        assert_eq!(parsed.gameplay, GameplaySettings::default());
        assert_eq!(parsed.video, VideoSettings::default());
    }

    #[test]
    fn sanitized_resets_the_version() {
        let settings = PlayerSettings {
            version: 99,
            ..PlayerSettings::default()
        }
        .sanitized();
        assert_eq!(settings.version, 1);
    }

    #[test]
    fn store_round_trips_through_disk() {
        let mut path = std::env::temp_dir();
        path.push(format!("love-blocks-settings-{}.json", std::process::id()));
        let store = SettingsStore::new(path.clone());

        let settings = PlayerSettings {
            gameplay: GameplaySettings {
                show_placement_preview: false,
            },
            video: VideoSettings { vsync: false },
            ..PlayerSettings::default()
        };
        store.save(&settings).expect("save settings");
        assert_eq!(store.load(), settings);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_falls_back_to_defaults_for_missing_file() {
        let store = SettingsStore::new(PathBuf::from("/nonexistent/love-blocks/settings.json"));
        assert_eq!(store.load(), PlayerSettings::default());
    }
}
