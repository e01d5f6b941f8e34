// Configuration for vouch reports

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use vouch_diagnostics::{PathMode, DEFAULT_FOLD_THRESHOLD};

/// File searched for by [`Config::from_dir`]
pub const CONFIG_FILE: &str = "vouch.json";

pub const ENV_COLOR: &str = "VOUCH_COLOR";
pub const ENV_WIDTH: &str = "VOUCH_WIDTH";
pub const ENV_ACTION: &str = "VOUCH_ACTION";
pub const ENV_STACK_TRACE: &str = "VOUCH_STACK_TRACE";
pub const ENV_CONFIG: &str = "VOUCH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Report configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// When to emit ANSI colors
    #[serde(default)]
    pub color: ColorChoice,

    /// Report width; unset means the terminal width
    #[serde(default)]
    pub width: Option<usize>,

    /// What the built-in handler does after reporting
    #[serde(default)]
    pub action: Action,

    /// Capture and print stack traces
    #[serde(default = "default_true")]
    pub stack_trace: bool,

    /// Fold runs of at least this many identical frames (0 disables)
    #[serde(default = "default_fold_threshold")]
    pub fold_threshold: usize,

    /// How stack trace file paths are shortened
    #[serde(default)]
    pub path_mode: PathStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorChoice {
    /// Color when writing to a color-capable terminal
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Print the report and abort the process
    #[default]
    Abort,
    /// Panic with the report as message
    Panic,
    /// Log the report and carry on
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStyle {
    Full,
    #[default]
    Unique,
    Basename,
}

impl From<PathStyle> for PathMode {
    fn from(style: PathStyle) -> Self {
        match style {
            PathStyle::Full => PathMode::Full,
            PathStyle::Unique => PathMode::Unique,
            PathStyle::Basename => PathMode::Basename,
        }
    }
}

impl ColorChoice {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(ColorChoice::Auto),
            "always" => Some(ColorChoice::Always),
            "never" => Some(ColorChoice::Never),
            _ => None,
        }
    }

    /// Resolve against what the terminal supports
    pub fn enabled(self, terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl Action {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "abort" => Some(Action::Abort),
            "panic" => Some(Action::Panic),
            "continue" => Some(Action::Continue),
            _ => None,
        }
    }
}

// Default values
fn default_true() -> bool {
    true
}
fn default_fold_threshold() -> usize {
    DEFAULT_FOLD_THRESHOLD
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: ColorChoice::Auto,
            width: None,
            action: Action::Abort,
            stack_trace: true,
            fold_threshold: default_fold_threshold(),
            path_mode: PathStyle::Unique,
        }
    }
}

impl Config {
    /// Load configuration from a vouch.json file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from directory (searches for vouch.json)
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ConfigError> {
        for current in dir.as_ref().ancestors() {
            let config_path = current.join(CONFIG_FILE);
            if config_path.exists() {
                return Self::from_file(config_path);
            }
        }

        // No config found, use defaults
        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Create example configuration file
    pub fn example() -> String {
        serde_json::to_string_pretty(&Self::default()).unwrap_or_default()
    }

    /// Apply `VOUCH_*` overrides read through `var`. Invalid values are left
    /// out and returned.
    pub fn override_from<F>(&mut self, var: F) -> Vec<ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = Vec::new();
        let invalid = |name: &'static str, value: String| ConfigError::InvalidEnv { name, value };

        if let Some(value) = var(ENV_COLOR) {
            match ColorChoice::parse(value.trim()) {
                Some(color) => self.color = color,
                None => errors.push(invalid(ENV_COLOR, value)),
            }
        }
        if let Some(value) = var(ENV_WIDTH) {
            match value.trim().parse::<usize>() {
                Ok(width) => self.width = Some(width),
                Err(_) => errors.push(invalid(ENV_WIDTH, value)),
            }
        }
        if let Some(value) = var(ENV_ACTION) {
            match Action::parse(value.trim()) {
                Some(action) => self.action = action,
                None => errors.push(invalid(ENV_ACTION, value)),
            }
        }
        if let Some(value) = var(ENV_STACK_TRACE) {
            match value.trim() {
                "1" => self.stack_trace = true,
                "0" => self.stack_trace = false,
                _ => errors.push(invalid(ENV_STACK_TRACE, value)),
            }
        }

        errors
    }

    /// Apply overrides from the process environment, warning about bad values
    pub fn with_env(mut self) -> Self {
        for error in self.override_from(|name| std::env::var(name).ok()) {
            log::warn!("ignoring {}", error);
        }
        self
    }

    /// Configuration for the current process: the file named by
    /// `VOUCH_CONFIG`, else the nearest vouch.json, then environment overrides.
    pub fn load() -> Self {
        let loaded = match std::env::var_os(ENV_CONFIG) {
            Some(path) => Self::from_file(path),
            None => match std::env::current_dir() {
                Ok(dir) => Self::from_dir(dir),
                Err(_) => Ok(Self::default()),
            },
        };
        let config = loaded.unwrap_or_else(|error| {
            log::warn!("using default configuration: {}", error);
            Self::default()
        });
        config.with_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.color, ColorChoice::Auto);
        assert_eq!(config.action, Action::Abort);
        assert_eq!(config.fold_threshold, 4);
        assert!(config.stack_trace);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            width: Some(72),
            action: Action::Continue,
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "path_mode": "basename" }"#).unwrap();
        assert_eq!(config.path_mode, PathStyle::Basename);
        assert_eq!(config.fold_threshold, DEFAULT_FOLD_THRESHOLD);
        assert_eq!(PathMode::from(config.path_mode), PathMode::Basename);
    }

    #[test]
    fn test_example_config() {
        let example = Config::example();
        assert!(example.contains("\"color\": \"auto\""));
        assert!(example.contains("fold_threshold"));
        assert!(example.contains("\"action\": \"abort\""));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_COLOR, "never"),
            (ENV_WIDTH, "100"),
            (ENV_ACTION, "panic"),
            (ENV_STACK_TRACE, "0"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        let errors = config.override_from(|name| vars.get(name).map(|v| v.to_string()));
        assert!(errors.is_empty());
        assert_eq!(config.color, ColorChoice::Never);
        assert_eq!(config.width, Some(100));
        assert_eq!(config.action, Action::Panic);
        assert!(!config.stack_trace);
    }

    #[test]
    fn test_invalid_env_values_are_reported() {
        let mut config = Config::default();
        let errors = config.override_from(|name| match name {
            ENV_WIDTH => Some("wide".to_string()),
            ENV_ACTION => Some("explode".to_string()),
            _ => None,
        });
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].to_string(), "invalid value \"wide\" for VOUCH_WIDTH");
        assert_eq!(config, Config::default());
    }
}
