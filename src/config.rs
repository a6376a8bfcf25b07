//! Editor configuration
//!
//! Stored as TOML under the user's config directory. A default file is
//! written the first time the editor starts; values that are out of range
//! are clamped with a warning instead of failing the load.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{Level, info, warn};

use crate::templates::TemplateSpec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// trace, debug, info, warn or error; `LOG_LEVEL` overrides it
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// TOML file replacing the built-in object templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_path: Option<PathBuf>,

    #[serde(default = "default_window_width")]
    pub window_width: u16,

    #[serde(default = "default_window_height")]
    pub window_height: u16,

    /// Indent the serialized schema
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_window_width() -> u16 {
    1280
}

fn default_window_height() -> u16 {
    800
}

fn default_pretty_json() -> bool {
    true
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            templates_path: None,
            window_width: default_window_width(),
            window_height: default_window_height(),
            pretty_json: default_pretty_json(),
        }
    }
}

/// Map a level name to a tracing level; unknown names fall back to info
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

impl EditorConfig {
    pub fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    /// Load from the default location, writing a default file when missing
    pub fn load() -> Result<Self> {
        Self::load_or_create(&Self::config_path())
    }

    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        info!(path = %path.display(), "No config file found, generating default");
        let config = Self::default();
        if let Err(e) = config.save_to(path) {
            warn!(path = %path.display(), error = %e, "Failed to write default config");
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: EditorConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate_and_clamp();
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file to {}", path.display()))?;
        Ok(())
    }

    /// Clamp values to safe ranges
    pub fn validate_and_clamp(&mut self) {
        use crate::constants::validation::*;

        for (name, value) in [
            ("window_width", &mut self.window_width),
            ("window_height", &mut self.window_height),
        ] {
            if *value < MIN_WINDOW_DIMENSION {
                warn!(field = name, value = *value, min = MIN_WINDOW_DIMENSION, "window dimension below minimum, clamping");
                *value = MIN_WINDOW_DIMENSION;
            } else if *value > MAX_WINDOW_DIMENSION {
                warn!(field = name, value = *value, max = MAX_WINDOW_DIMENSION, "window dimension exceeds maximum, clamping");
                *value = MAX_WINDOW_DIMENSION;
            }
        }

        let known = ["trace", "debug", "info", "warn", "error"];
        if !known.contains(&self.log_level.trim().to_lowercase().as_str()) {
            warn!(log_level = %self.log_level, "unknown log_level, using info");
            self.log_level = default_log_level();
        }
    }

    /// Level from `LOG_LEVEL` when set, otherwise from the config
    pub fn effective_log_level(&self) -> Level {
        match env::var("LOG_LEVEL") {
            Ok(level) => parse_level(&level),
            Err(_) => parse_level(&self.log_level),
        }
    }

    /// Object templates: `override_path`, then `templates_path`, then the built-in set
    pub fn templates(&self, override_path: Option<&Path>) -> Result<TemplateSpec> {
        match override_path.or(self.templates_path.as_deref()) {
            Some(path) => TemplateSpec::load(path),
            None => Ok(TemplateSpec::default()),
        }
    }
}
