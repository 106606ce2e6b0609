//! User settings and preferences
//!
//! Persisted in LocalStorage on the web, or read from a JSON file natively.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_MAX_BODIES;
use crate::tuning::Tuning;

/// About page settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Physics constants
    pub tuning: Tuning,
    /// Live body cap; the oldest body is evicted past it (0 = unbounded)
    pub max_bodies: usize,
    /// Draw the custom pointer indicator over the container
    pub custom_cursor: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            max_bodies: DEFAULT_MAX_BODIES,
            custom_cursor: true,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "headshot_bounce_settings";

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.tuning = settings.tuning.sanitized();
        Ok(settings)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Resolve settings from a stored JSON blob
    ///
    /// Returns the settings and whether they should be written back. Only a
    /// missing blob is written back; an unreadable one is left for the user
    /// to fix.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    pub(crate) fn from_stored(stored: Option<&str>) -> (Self, bool) {
        match stored {
            Some(json) => match Self::from_json(json) {
                Ok(settings) => (settings, false),
                Err(e) => {
                    log::warn!("Ignoring stored settings: {}", e);
                    (Self::default(), false)
                }
            },
            None => (Self::default(), true),
        }
    }

    /// Load settings from LocalStorage (WASM only)
    ///
    /// Defaults are stored on first run; existing entries are never
    /// rewritten here.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::info!("LocalStorage unavailable, using default settings");
            return Self::default();
        };

        let stored = storage.get_item(Self::STORAGE_KEY).ok().flatten();
        let (settings, first_run) = Self::from_stored(stored.as_deref());
        if first_run {
            log::info!("Using default settings");
            settings.save();
        } else {
            log::info!("Loaded settings from LocalStorage");
        }
        settings
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Failed to serialize settings: {}", e),
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Cannot read settings {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_json() {
        let settings =
            Settings::from_json(r#"{ "max_bodies": 0, "tuning": { "restitution": 0.9 } }"#)
                .unwrap();
        assert_eq!(settings.max_bodies, 0);
        assert!(settings.custom_cursor);
        assert_eq!(settings.tuning.restitution, 0.9);
        assert_eq!(settings.tuning.gravity, crate::consts::GRAVITY);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Settings::from_json("{ max_bodies: ").is_err());
    }

    #[test]
    fn test_first_run_stores_defaults() {
        let (settings, write_back) = Settings::from_stored(None);
        assert_eq!(settings, Settings::default());
        assert!(write_back);
    }

    #[test]
    fn test_stored_settings_are_not_rewritten() {
        // Unknown keys and non-default formatting must survive a page load
        let stored = r#"{"max_bodies":3,"theme":"dark"}"#;
        let (settings, write_back) = Settings::from_stored(Some(stored));
        assert_eq!(settings.max_bodies, 3);
        assert!(!write_back);
    }

    #[test]
    fn test_unreadable_stored_settings_are_kept() {
        let (settings, write_back) = Settings::from_stored(Some("{ max_bodies: "));
        assert_eq!(settings, Settings::default());
        assert!(!write_back);
    }

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_from_path(std::path::Path::new("/nonexistent/settings.json"));
        assert_eq!(settings, Settings::default());
    }
}
