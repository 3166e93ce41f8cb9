//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Default mode and goal for new sessions
//! - Whether immersion auto-start is armed by default
//! - Rotary adjustment range and haptic threshold
//! - Log level
//!
//! Configuration is stored at `~/.config/plunge-timer/config.toml`, or under
//! `$PLUNGE_TIMER_HOME` when that is set.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::session::{GoalDuration, SessionMode};
use crate::timer::{RotaryRange, DEFAULT_HAPTIC_THRESHOLD_SECS};

/// Defaults for the goal picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default)]
    pub default_mode: SessionMode,
    #[serde(default = "default_minutes")]
    pub default_minutes: u64,
    #[serde(default)]
    pub default_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoStartConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Rotary adjustment while paused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentConfig {
    #[serde(default = "default_haptic_threshold")]
    pub haptic_threshold_secs: u64,
    #[serde(default = "default_rotary_max")]
    pub rotary_max_secs: u64,
    #[serde(default = "default_rotary_step")]
    pub rotary_step_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub auto_start: AutoStartConfig,
    #[serde(default)]
    pub adjustment: AdjustmentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_minutes() -> u64 {
    2
}
fn default_true() -> bool {
    true
}
fn default_haptic_threshold() -> u64 {
    DEFAULT_HAPTIC_THRESHOLD_SECS
}
fn default_rotary_max() -> u64 {
    600
}
fn default_rotary_step() -> u64 {
    5
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_mode: SessionMode::default(),
            default_minutes: default_minutes(),
            default_seconds: 0,
        }
    }
}

impl Default for AutoStartConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            haptic_threshold_secs: default_haptic_threshold(),
            rotary_max_secs: default_rotary_max(),
            rotary_step_secs: default_rotary_step(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Returns the config directory, creating it if needed.
///
/// `$PLUNGE_TIMER_HOME` wins; otherwise `~/.config/plunge-timer[-dev]/`
/// depending on `PLUNGE_TIMER_ENV=dev`.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("PLUNGE_TIMER_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PLUNGE_TIMER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("plunge-timer-dev")
            } else {
                base_dir.join("plunge-timer")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DirectoryUnavailable {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
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

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?;
                serde_json::Value::Number(n.into())
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("cannot overwrite a whole section".to_string()));
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
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

    /// Set a config value by key in memory. Unknown keys and values of the
    /// wrong type are rejected; the config is left untouched on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        GoalDuration::new(self.timer.default_minutes, self.timer.default_seconds).map_err(|e| {
            ConfigError::InvalidValue {
                key: "timer".to_string(),
                message: e.to_string(),
            }
        })?;
        if self.adjustment.rotary_step_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "adjustment.rotary_step_secs".to_string(),
                message: "step must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Goal preselected on the picker. Falls back to 2:00 if the file holds
    /// values the picker can't show.
    pub fn default_goal(&self) -> GoalDuration {
        GoalDuration::new(self.timer.default_minutes, self.timer.default_seconds)
            .unwrap_or_default()
    }

    pub fn rotary_range(&self) -> RotaryRange {
        RotaryRange {
            min_secs: 0,
            max_secs: self.adjustment.rotary_max_secs,
            step_secs: self.adjustment.rotary_step_secs.max(1),
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
        assert_eq!(parsed.timer.default_mode, SessionMode::ColdPlunge);
        assert_eq!(parsed.adjustment.haptic_threshold_secs, 5);
        assert!(parsed.auto_start.enabled);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[timer]\ndefault_mode = \"sauna\"\n").unwrap();
        assert_eq!(parsed.timer.default_mode, SessionMode::Sauna);
        assert_eq!(parsed.timer.default_minutes, 2);
        assert_eq!(parsed.adjustment.rotary_max_secs, 600);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("auto_start.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("timer.default_minutes").as_deref(), Some("2"));
        assert_eq!(cfg.get("timer.default_mode").as_deref(), Some("cold_plunge"));
        assert!(cfg.get("timer.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("auto_start.enabled", "false").unwrap();
        cfg.set("adjustment.haptic_threshold_secs", "10").unwrap();
        cfg.set("timer.default_mode", "sauna").unwrap();
        assert!(!cfg.auto_start.enabled);
        assert_eq!(cfg.adjustment.haptic_threshold_secs, 10);
        assert_eq!(cfg.timer.default_mode, SessionMode::Sauna);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("timer.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("auto_start.enabled", "maybe").is_err());
        assert!(cfg.set("timer.default_minutes", "-1").is_err());
        assert!(cfg.set("timer.default_mode", "steam_room").is_err());
        assert!(cfg.auto_start.enabled);
    }

    #[test]
    fn set_rejects_goal_outside_picker() {
        let mut cfg = Config::default();
        assert!(cfg.set("timer.default_minutes", "11").is_err());
        assert_eq!(cfg.timer.default_minutes, 2);
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.timer.default_minutes, 2);

        let mut cfg = cfg;
        cfg.set("timer.default_seconds", "30").unwrap();
        cfg.save_to(&path).unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.default_goal().total_secs(), 150);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer\nbroken").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn rotary_range_follows_adjustment_section() {
        let mut cfg = Config::default();
        cfg.set("adjustment.rotary_max_secs", "300").unwrap();
        let range = cfg.rotary_range();
        assert_eq!(range.max_secs, 300);
        assert_eq!(range.step_secs, 5);
    }
}
