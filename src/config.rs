//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treehandler/treehandler.toml`
//! 3. Local config: `--config <file>`, or `./.treehandler.toml`
//! 4. Environment variables: `TREEHANDLER_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{AccessSpec, MatchOptions};

/// How output trees are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree, one branch per path
    #[default]
    Tree,
    /// Tree document JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Tree => f.write_str("tree"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

/// Unified configuration for treehandler.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Access used for arguments when an operation declares none
    pub default_access: AccessSpec,
    /// Path fallback switches
    pub matching: MatchOptions,
    /// Output formatting
    pub output: OutputSettings,
}

/// Raw matching config for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawMatchOptions {
    pub ancestor_fallback: Option<bool>,
    pub broadcast_single_branch: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputSettings {
    pub format: Option<OutputFormat>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_access: Option<AccessSpec>,
    pub matching: RawMatchOptions,
    pub output: RawOutputSettings,
}

/// Get the XDG config directory for treehandler.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treehandler").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treehandler.toml"))
}

/// Local config file looked up in the working directory.
pub fn local_config_path() -> PathBuf {
    PathBuf::from(".treehandler.toml")
}

/// Expand `~`, `$VAR` and `${VAR}` in a user supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_access: overlay.default_access.unwrap_or(self.default_access),
            matching: MatchOptions {
                ancestor_fallback: overlay
                    .matching
                    .ancestor_fallback
                    .unwrap_or(self.matching.ancestor_fallback),
                broadcast_single_branch: overlay
                    .matching
                    .broadcast_single_branch
                    .unwrap_or(self.matching.broadcast_single_branch),
            },
            output: OutputSettings {
                format: overlay.output.format.unwrap_or(self.output.format),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit local config file; must exist when given.
    ///   Without it, `./.treehandler.toml` is used if present.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Local config
        match local {
            Some(path) => {
                let path = expand_path(path);
                debug!("load: local config {}", path.display());
                current = current.merge_with(&load_raw_settings(&path)?);
            }
            None => {
                let path = local_config_path();
                if path.exists() {
                    debug!("load: local config {}", path.display());
                    current = current.merge_with(&load_raw_settings(&path)?);
                }
            }
        }

        // 4. Environment variables
        Self::apply_env_overrides(current)
    }

    /// Apply TREEHANDLER_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`: `TREEHANDLER_MATCHING__ANCESTOR_FALLBACK=false`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREEHANDLER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("default_access") {
            settings.default_access = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("TREEHANDLER_DEFAULT_ACCESS: {e}"),
            })?;
        }
        if let Ok(val) = config.get_bool("matching.ancestor_fallback") {
            settings.matching.ancestor_fallback = val;
        }
        if let Ok(val) = config.get_bool("matching.broadcast_single_branch") {
            settings.matching.broadcast_single_branch = val;
        }
        if let Ok(val) = config.get_string("output.format") {
            settings.output.format =
                OutputFormat::from_str(&val, true).map_err(|e| ApplicationError::Config {
                    message: format!("TREEHANDLER_OUTPUT__FORMAT: {e}"),
                })?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treehandler configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treehandler/treehandler.toml
#   Local:  ./.treehandler.toml, or the file given with --config
#   Env:    TREEHANDLER_* environment variables (nested keys use "__")

# Access for arguments of operations that declare none ("item" or "list")
# default_access = "item"

[matching]
# Use the nearest ancestor branch when an argument lacks the exact path
# ancestor_fallback = true

# Let a tree with a single branch answer for every path
# broadcast_single_branch = true

[output]
# "tree" or "json"
# format = "tree"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
