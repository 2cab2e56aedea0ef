//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sizetree/sizetree.toml`
//! 3. Local config: `<dir>/.sizetree.toml`
//! 4. Environment variables: `SIZETREE_*` prefix, `__` between nested keys
//!    (e.g. `SIZETREE_RENDER__UNIT=GB`)

use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::{SettingsError, SettingsResult};

/// Which view `NodeTree::display` produces.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// `+ [dir] (Total: n MB)` / `- file (n MB)` lines, indented per level
    #[default]
    Indented,
    /// Box-drawing tree via termtree
    Tree,
}

impl FromStr for RenderStyle {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indented" => Ok(Self::Indented),
            "tree" => Ok(Self::Tree),
            _ => Err(SettingsError::InvalidValue {
                key: "render.style".into(),
                value: s.to_string(),
            }),
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    /// Spaces added per nesting level
    pub indent_width: usize,
    /// Unit label printed after every size
    pub unit: String,
    pub style: RenderStyle,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            indent_width: 2,
            unit: "MB".into(),
            style: RenderStyle::Indented,
        }
    }
}

/// Raw render config for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub indent_width: Option<usize>,
    pub unit: Option<String>,
    pub style: Option<RenderStyle>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub render: RawRenderSettings,
}

impl RenderSettings {
    /// Overlay wins for every field it specifies.
    pub fn merge(&self, overlay: &RawRenderSettings) -> Self {
        Self {
            indent_width: overlay.indent_width.unwrap_or(self.indent_width),
            unit: overlay.unit.clone().unwrap_or_else(|| self.unit.clone()),
            style: overlay.style.unwrap_or(self.style),
        }
    }

    fn validate(&self) -> SettingsResult<()> {
        if self.indent_width == 0 {
            return Err(SettingsError::InvalidValue {
                key: "render.indent_width".into(),
                value: self.indent_width.to_string(),
            });
        }
        if self.unit.trim().is_empty() {
            return Err(SettingsError::InvalidValue {
                key: "render.unit".into(),
                value: self.unit.clone(),
            });
        }
        Ok(())
    }
}

/// Unified configuration for sizetree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub render: RenderSettings,
}

/// Get the XDG config directory for sizetree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sizetree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("sizetree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".sizetree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> SettingsResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.sizetree.toml`
    pub fn load(local_dir: Option<&Path>) -> SettingsResult<Self> {
        Self::load_layers(global_config_path().as_deref(), local_dir)
    }

    /// Load with an explicit global config path instead of the XDG location.
    #[instrument(level = "debug")]
    pub fn load_layers(global: Option<&Path>, local_dir: Option<&Path>) -> SettingsResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.render.validate()?;

        Ok(current)
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            render: self.render.merge(&overlay.render),
        }
    }

    /// Apply SIZETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> SettingsResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("SIZETREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        if let Ok(val) = config.get_string("render.indent_width") {
            settings.render.indent_width = val.trim().parse().map_err(|_| {
                SettingsError::InvalidValue {
                    key: "render.indent_width".into(),
                    value: val.clone(),
                }
            })?;
        }
        if let Ok(val) = config.get_string("render.unit") {
            settings.render.unit = val;
        }
        if let Ok(val) = config.get_string("render.style") {
            settings.render.style = val.parse()?;
        }

        Ok(settings)
    }
}
