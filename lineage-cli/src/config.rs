//! Lineage configuration loading from `.lineagerc.toml`.
//!
//! Configuration is optional. Every setting has a built-in default, and
//! command-line flags override whatever the file says.
//!
//! # Example Configuration
//!
//! ```toml
//! [input]
//! path = "exports/openlineage_events.json"
//! latest_only = true
//!
//! [graph]
//! show_jobs = false
//!
//! [output]
//! format = "table"
//! color = true
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = ".lineagerc.toml";

/// Event file read when neither `--input` nor `[input].path` is given.
pub const DEFAULT_INPUT: &str = "openlineage_events.json";

/// Root configuration structure loaded from `.lineagerc.toml`.
///
/// All sections are optional and will use defaults if not specified.
#[derive(Debug, Deserialize, Default)]
pub struct LineageConfig {
    /// Where events come from and which ones are kept.
    #[serde(default)]
    pub input: InputSettings,

    /// Graph view defaults.
    #[serde(default)]
    pub graph: GraphSettings,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Event source settings.
#[derive(Debug, Deserialize, Default)]
pub struct InputSettings {
    /// Event file: a JSON envelope `{"events": [...]}`, a JSON array, or JSON Lines.
    #[serde(default)]
    pub path: Option<String>,

    /// Keep only the most recent `COMPLETE` event per job.
    ///
    /// Default: `true`. `--all-events` turns it off for one run.
    #[serde(default)]
    pub latest_only: Option<bool>,
}

/// Graph view settings.
#[derive(Debug, Deserialize, Default)]
pub struct GraphSettings {
    /// Whether job nodes are drawn. When `false`, datasets are linked directly.
    ///
    /// Default: `true`. `--hide-jobs` turns it off for one run.
    #[serde(default)]
    pub show_jobs: Option<bool>,
}

/// Output formatting preferences.
///
/// Note: This is distinct from the runtime `OutputConfig` in the output module,
/// which handles actual rendering.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default output format: `table`, `json`, `csv` or `tree`.
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output. Unset means auto-detect.
    #[serde(default)]
    pub color: Option<bool>,
}

impl LineageConfig {
    /// Load configuration from `.lineagerc.toml` in the given directory.
    ///
    /// If the config file doesn't exist or can't be parsed, returns defaults.
    /// Parse errors are logged as warnings but don't cause failures.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    /// Event file to read, falling back to [`DEFAULT_INPUT`].
    pub fn input_path(&self) -> PathBuf {
        PathBuf::from(self.input.path.as_deref().unwrap_or(DEFAULT_INPUT))
    }

    pub fn latest_only(&self) -> bool {
        self.input.latest_only.unwrap_or(true)
    }

    pub fn show_jobs(&self) -> bool {
        self.graph.show_jobs.unwrap_or(true)
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}
