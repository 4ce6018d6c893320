//! TOML run configuration for the command-line tool, with presets.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::error::ResourceError;
use crate::resources::ResourceRegistry;
use crate::smoothing::SmoothingParameters;

/// Top-level run configuration parsed from TOML.
///
/// Every section has defaults, so an empty file is a valid configuration.
/// Load with [`RunConfig::from_toml_file`] or start from a preset with
/// [`RunConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Power-curve smoothing parameters.
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    /// Where turbine and panel descriptions live.
    #[serde(default)]
    pub resources: ResourcesConfig,
    /// CSV output formatting.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Power-curve smoothing parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothingConfig {
    /// Apply the kernel at all; `false` passes curves through unchanged.
    pub enabled: bool,
    /// Fleet availability (0.0, 1.0].
    pub eta: f64,
    /// Kernel mean offset (m/s).
    pub delta_v: f64,
    /// Kernel standard deviation (m/s, at least `SmoothingParameters::MIN_SIGMA`).
    pub sigma: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            eta: SmoothingParameters::DEFAULT_ETA,
            delta_v: SmoothingParameters::DEFAULT_DELTA_V,
            sigma: SmoothingParameters::DEFAULT_SIGMA,
        }
    }
}

/// Directories holding `<name>.yaml` resource descriptions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourcesConfig {
    pub turbine_dir: PathBuf,
    pub panel_dir: PathBuf,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            turbine_dir: PathBuf::from("resources/windturbine"),
            panel_dir: PathBuf::from("resources/solarpanel"),
        }
    }
}

/// CSV output formatting.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Decimal places written for each value.
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { precision: 4 }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field} — {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"smoothing.sigma"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl RunConfig {
    /// Andresen et al. (2015) smoothing, the default.
    pub fn andresen2015() -> Self {
        Self::default()
    }

    /// Nameplate curves, no smoothing.
    pub fn none() -> Self {
        Self {
            smoothing: SmoothingConfig {
                enabled: false,
                ..SmoothingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Narrow kernel, no offset, no derating: close to the nameplate curve
    /// but resampled onto the smoothed output grid.
    pub fn sharp() -> Self {
        Self {
            smoothing: SmoothingConfig {
                enabled: true,
                eta: 1.0,
                delta_v: 0.0,
                sigma: 0.1,
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["andresen2015", "none", "sharp"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "andresen2015" => Ok(Self::andresen2015()),
            "none" => Ok(Self::none()),
            "sharp" => Ok(Self::sharp()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.smoothing;
        if !(s.eta > 0.0 && s.eta <= 1.0) {
            errors.push(ConfigError::new("smoothing.eta", "must be in (0.0, 1.0]"));
        }
        if !s.delta_v.is_finite() {
            errors.push(ConfigError::new("smoothing.delta_v", "must be finite"));
        }
        if !(s.sigma.is_finite() && s.sigma >= SmoothingParameters::MIN_SIGMA) {
            errors.push(ConfigError::new(
                "smoothing.sigma",
                format!("must be >= {}", SmoothingParameters::MIN_SIGMA),
            ));
        }

        if self.output.precision > 12 {
            errors.push(ConfigError::new("output.precision", "must be <= 12"));
        }

        errors
    }

    /// Smoothing parameters for this run, or `None` when smoothing is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidConfigSchema`] for out-of-range values.
    pub fn smoothing_parameters(&self) -> Result<Option<SmoothingParameters>, ResourceError> {
        let s = &self.smoothing;
        if !s.enabled {
            return Ok(None);
        }
        SmoothingParameters::new(s.eta, s.delta_v, s.sigma).map(Some)
    }

    /// Builds the resource registry from the configured directories.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Io`] if a directory cannot be listed.
    pub fn registry(&self) -> Result<ResourceRegistry, ResourceError> {
        ResourceRegistry::from_dirs(&self.resources.turbine_dir, &self.resources.panel_dir)
    }
}
