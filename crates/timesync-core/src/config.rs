//! Layered configuration
//!
//! Settings are merged from these sources, later ones overriding earlier:
//!
//! 1. **Global defaults** - `<config_dir>/timesync/config.toml`
//! 2. **Explicit file** - the path passed with `--config`
//!
//! Command-line flags and environment variables sit above both and are
//! applied by the CLI.
//!
//! ```toml
//! shift = -5
//! match_policy = "longest"
//! time_display = "utc"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::matcher::MatchPolicy;
use crate::{Error, Result};

/// How timestamps are rendered in reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeDisplay {
    /// The machine's local time zone
    #[default]
    Local,
    Utc,
}

/// Settings from one configuration file, or several merged together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Default hour shift; validated where it is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_policy: Option<MatchPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_display: Option<TimeDisplay>,
}

impl Settings {
    /// Parse settings from TOML text read from `path`.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Overlay `other` onto `self`; values set in `other` win.
    pub fn merge(&mut self, other: &Settings) {
        if other.shift.is_some() {
            self.shift = other.shift;
        }
        if other.match_policy.is_some() {
            self.match_policy = other.match_policy;
        }
        if other.time_display.is_some() {
            self.time_display = other.time_display;
        }
    }
}

/// Resolves [`Settings`] by merging the configuration layers.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    /// File given on the command line
    explicit: Option<PathBuf>,

    /// Override for the global config directory (used for testing).
    /// When `None`, the platform-appropriate directory is used via `dirs::config_dir()`.
    global_config_dir_override: Option<PathBuf>,
}

impl ConfigResolver {
    /// Create a resolver using the platform config directory:
    /// - Linux: `~/.config/timesync/`
    /// - macOS: `~/Library/Application Support/timesync/`
    /// - Windows: `%APPDATA%\timesync\`
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicit configuration file as the top layer.
    ///
    /// Unlike the global layer, this file must exist.
    pub fn with_explicit(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// Use a custom global config directory.
    ///
    /// Useful for tests, which must not read the real user config.
    pub fn with_global_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_config_dir_override = Some(dir.into());
        self
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join("timesync"))
    }

    /// Merge all layers into one [`Settings`].
    ///
    /// A missing global file is skipped; a missing explicit file is an
    /// error. Invalid TOML in any layer is an error.
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(global_dir) = self.global_config_dir() {
            let global_config_path = global_dir.join("config.toml");
            if global_config_path.is_file() {
                tracing::debug!(?global_config_path, "Loading global config");
                settings.merge(&load(&global_config_path)?);
            } else {
                tracing::debug!(?global_config_path, "No global config found, skipping");
            }
        }

        if let Some(ref explicit) = self.explicit {
            if !explicit.is_file() {
                return Err(Error::ConfigNotFound {
                    path: explicit.clone(),
                });
            }
            tracing::debug!(?explicit, "Loading explicit config");
            settings.merge(&load(explicit)?);
        }

        Ok(settings)
    }
}

fn load(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)?;
    Settings::parse(&content, path)
}
