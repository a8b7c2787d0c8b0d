//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Duration presets offered next to the input fields
//! - Sound and notification preferences
//! - Terminal display options
//!
//! Configuration is stored at `~/.config/studytimer/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::effects::Permission;
use crate::error::{ConfigError, Result};
use crate::format::{format_duration, DurationInput};

/// A named duration that pre-fills the input fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub label: String,
    #[serde(default)]
    pub hours: u64,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

impl Preset {
    pub fn new(label: impl Into<String>, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            label: label.into(),
            hours,
            minutes,
            seconds,
        }
    }

    pub fn input(&self) -> DurationInput {
        DurationInput::new(self.hours, self.minutes, self.seconds)
    }

    pub fn formatted(&self) -> String {
        format_duration(self.input().total_secs())
    }
}

/// Sound configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Answer stored for the notification permission prompt.
    #[serde(default = "default_permission")]
    pub permission: Permission,
}

/// Terminal display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Use ANSI styling for bounced digits and status tones.
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default = "default_bar_width")]
    pub bar_width: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studytimer/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default = "default_presets")]
    pub presets: Vec<Preset>,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_permission() -> Permission {
    Permission::Default
}
fn default_bar_width() -> u32 {
    20
}
fn default_presets() -> Vec<Preset> {
    vec![
        Preset::new("Pomodoro", 0, 25, 0),
        Preset::new("Short Break", 0, 5, 0),
        Preset::new("Long Break", 0, 15, 0),
        Preset::new("Deep Work", 1, 0, 0),
    ]
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            permission: default_permission(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            bar_width: default_bar_width(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sound: SoundConfig::default(),
            notifications: NotificationsConfig::default(),
            display: DisplayConfig::default(),
            presets: default_presets(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("using default configuration: {e}");
                Self::default()
            }
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Look a preset up by 1-based position or case-insensitive label.
    pub fn find_preset(&self, key: &str) -> Option<&Preset> {
        if let Ok(n) = key.trim().parse::<usize>() {
            return n.checked_sub(1).and_then(|i| self.presets.get(i));
        }
        self.presets
            .iter()
            .find(|p| p.label.eq_ignore_ascii_case(key.trim()))
    }

    /// Effective permission, folding in the master switch.
    pub fn notification_permission(&self) -> Permission {
        if self.notifications.enabled {
            self.notifications.permission
        } else {
            Permission::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.sound.enabled);
        assert_eq!(parsed.notifications.permission, Permission::Default);
        assert_eq!(parsed.presets, cfg.presets);
    }

    #[test]
    fn empty_file_gets_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.presets.len(), 4);
        assert_eq!(parsed.display.bar_width, 20);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("sound.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("notifications.permission").as_deref(), Some("default"));
        assert_eq!(cfg.get("display.bar_width").as_deref(), Some("20"));
        assert!(cfg.get("display.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("sound.enabled", "false").unwrap();
        cfg.set("display.bar_width", "30").unwrap();
        cfg.set("notifications.permission", "granted").unwrap();
        assert!(!cfg.sound.enabled);
        assert_eq!(cfg.display.bar_width, 30);
        assert_eq!(cfg.notifications.permission, Permission::Granted);
    }

    #[test]
    fn set_replaces_presets_from_json() {
        let mut cfg = Config::default();
        cfg.set("presets", r#"[{"label":"Exam","hours":3}]"#).unwrap();
        assert_eq!(cfg.presets, vec![Preset::new("Exam", 3, 0, 0)]);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("sound.volume", "3"),
            Err(crate::error::CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set("", "3").is_err());
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("sound.enabled", "loud").is_err());
        assert!(cfg.set("notifications.permission", "maybe").is_err());
        assert!(cfg.sound.enabled);
    }

    #[test]
    fn find_preset_by_index_or_label() {
        let cfg = Config::default();
        assert_eq!(cfg.find_preset("1").unwrap().label, "Pomodoro");
        assert_eq!(cfg.find_preset("short break").unwrap().minutes, 5);
        assert!(cfg.find_preset("0").is_none());
        assert!(cfg.find_preset("9").is_none());
        assert!(cfg.find_preset("nap").is_none());
    }

    #[test]
    fn disabled_notifications_are_denied() {
        let mut cfg = Config::default();
        cfg.notifications.permission = Permission::Granted;
        cfg.notifications.enabled = false;
        assert_eq!(cfg.notification_permission(), Permission::Denied);
    }

    #[test]
    fn preset_formatting() {
        assert_eq!(Preset::new("Deep Work", 1, 0, 0).formatted(), "1:00:00");
        assert_eq!(Preset::new("Pomodoro", 0, 25, 0).formatted(), "25:00");
    }
}
