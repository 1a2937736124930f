use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use gtk4::glib;
use serde::Deserialize;
use tracing::{info, warn};

const SETTINGS_DIR_NAME: &str = "concentration";
const SETTINGS_FILE_NAME: &str = "settings.json";

pub const IMAGES_ENV: &str = "CONCENTRATION_IMAGES";
pub const SOUNDS_ENV: &str = "CONCENTRATION_SOUNDS";
pub const MUTE_ENV: &str = "CONCENTRATION_MUTE";

const CARD_SIZE_RANGE: (i32, i32) = (48, 512);
const REVEAL_DELAY_RANGE_MS: (u64, u64) = (100, 5000);

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub image_dir: PathBuf,
    pub sound_dir: PathBuf,
    pub back_image: String,
    pub card_size: i32,
    pub corner_radius: i32,
    pub reveal_delay_ms: u64,
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            image_dir: PathBuf::from("Images"),
            sound_dir: PathBuf::from("Sounds"),
            back_image: "back.jpg".to_string(),
            card_size: 150,
            corner_radius: 20,
            reveal_delay_ms: 800,
            sound_enabled: true,
        }
    }
}

pub fn settings_path() -> PathBuf {
    glib::user_config_dir()
        .join(SETTINGS_DIR_NAME)
        .join(SETTINGS_FILE_NAME)
}

pub fn is_truthy(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    matches!(v.as_str(), "1" | "true" | "yes" | "on")
}

impl Settings {
    /// Settings file, then environment overrides. A broken file is reported
    /// and ignored.
    pub fn load() -> Self {
        let path = settings_path();
        let mut settings = match fs::read_to_string(&path) {
            Ok(raw) => match Self::from_json(&raw) {
                Ok(settings) => {
                    info!(path = %path.display(), "loaded settings");
                    settings
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "ignoring unreadable settings file");
                    Settings::default()
                }
            },
            Err(_) => Settings::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        settings.sanitized()
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(IMAGES_ENV).filter(|v| !v.trim().is_empty()) {
            self.image_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(SOUNDS_ENV).filter(|v| !v.trim().is_empty()) {
            self.sound_dir = PathBuf::from(dir);
        }
        if lookup(MUTE_ENV).is_some_and(|v| is_truthy(&v)) {
            self.sound_enabled = false;
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.card_size = self.card_size.clamp(CARD_SIZE_RANGE.0, CARD_SIZE_RANGE.1);
        self.corner_radius = self.corner_radius.clamp(0, self.card_size / 2);
        self.reveal_delay_ms = self
            .reveal_delay_ms
            .clamp(REVEAL_DELAY_RANGE_MS.0, REVEAL_DELAY_RANGE_MS.1);
        self
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}
