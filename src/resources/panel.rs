use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, Result};

/// Tag reported when a panel description has no `model` key.
pub const MISSING_MODEL: &str = "<missing>";

/// Panel description as handed over by a loader, before validation.
///
/// Only the keys used by the capacity models are captured. Temperature and
/// inverter coefficients that some panel files carry are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawPanelConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
    #[serde(rename = "A", default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    #[serde(rename = "B", default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    #[serde(rename = "C", default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
}

/// Validated solar panel capacity model.
///
/// Each variant carries exactly the fields its model needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelConfig {
    /// Huld et al. model: the efficiency is the rated capacity per unit.
    Huld { efficiency: f64 },
    /// Bofinger regression with empirical coefficients `A`, `B`, `C`.
    Bofinger { a: f64, b: f64, c: f64 },
}

impl PanelConfig {
    /// Tag of this variant as written in panel files.
    pub fn model(&self) -> &'static str {
        match self {
            Self::Huld { .. } => "huld",
            Self::Bofinger { .. } => "bofinger",
        }
    }

    /// Validates a loader-provided description.
    ///
    /// # Errors
    ///
    /// * [`ResourceError::UnsupportedModel`] if `model` is missing or unknown
    /// * [`ResourceError::InvalidConfigSchema`] if a field of the selected model
    ///   is missing or non-finite, or a field of the other model is present
    pub fn from_raw(raw: RawPanelConfig) -> Result<Self> {
        let model = raw
            .model
            .as_deref()
            .ok_or_else(|| ResourceError::UnsupportedModel(MISSING_MODEL.to_string()))?;

        match model {
            "huld" => {
                reject_foreign(&[("A", raw.a), ("B", raw.b), ("C", raw.c)], model)?;
                let efficiency = required("efficiency", raw.efficiency)?;
                Ok(Self::Huld { efficiency })
            }
            "bofinger" => {
                reject_foreign(&[("efficiency", raw.efficiency)], model)?;
                Ok(Self::Bofinger {
                    a: required("A", raw.a)?,
                    b: required("B", raw.b)?,
                    c: required("C", raw.c)?,
                })
            }
            other => Err(ResourceError::UnsupportedModel(other.to_string())),
        }
    }

    /// Like [`PanelConfig::from_raw`], but fills a missing `model` with
    /// `default_model` before validating.
    ///
    /// # Errors
    ///
    /// As [`PanelConfig::from_raw`].
    pub fn from_raw_with_default(mut raw: RawPanelConfig, default_model: &str) -> Result<Self> {
        if raw.model.is_none() {
            tracing::warn!(default_model, "panel description has no model, assuming default");
            raw.model = Some(default_model.to_string());
        }
        Self::from_raw(raw)
    }

    /// Parses and validates a panel from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidConfigSchema`] for malformed YAML,
    /// otherwise as [`PanelConfig::from_raw`].
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Self::from_raw(parse_raw(s)?)
    }

    /// Parses a panel, assuming `default_model` when the document has no `model`.
    ///
    /// # Errors
    ///
    /// As [`PanelConfig::from_yaml_str`].
    pub fn from_yaml_str_with_default(s: &str, default_model: &str) -> Result<Self> {
        Self::from_raw_with_default(parse_raw(s)?, default_model)
    }

    /// Reads a panel YAML file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Io`] if the file cannot be read, otherwise as
    /// [`PanelConfig::from_yaml_str`].
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ResourceError::io(path, e))?;
        Self::from_yaml_str(&content)
    }

    pub fn to_raw(&self) -> RawPanelConfig {
        match *self {
            Self::Huld { efficiency } => RawPanelConfig {
                model: Some("huld".to_string()),
                efficiency: Some(efficiency),
                ..RawPanelConfig::default()
            },
            Self::Bofinger { a, b, c } => RawPanelConfig {
                model: Some("bofinger".to_string()),
                a: Some(a),
                b: Some(b),
                c: Some(c),
                ..RawPanelConfig::default()
            },
        }
    }
}

impl TryFrom<RawPanelConfig> for PanelConfig {
    type Error = ResourceError;

    fn try_from(raw: RawPanelConfig) -> Result<Self> {
        Self::from_raw(raw)
    }
}

impl fmt::Display for PanelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Huld { efficiency } => write!(f, "huld(efficiency={efficiency})"),
            Self::Bofinger { a, b, c } => write!(f, "bofinger(A={a}, B={b}, C={c})"),
        }
    }
}

fn parse_raw(s: &str) -> Result<RawPanelConfig> {
    serde_yaml::from_str(s).map_err(|e| ResourceError::invalid("yaml", e.to_string()))
}

fn required(field: &str, value: Option<f64>) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(ResourceError::invalid(
            field,
            format!("must be a finite number, got {v}"),
        )),
        None => Err(ResourceError::invalid(field, "missing field")),
    }
}

fn reject_foreign(fields: &[(&str, Option<f64>)], model: &str) -> Result<()> {
    match fields.iter().find(|(_, v)| v.is_some()) {
        Some((name, _)) => Err(ResourceError::invalid(
            *name,
            format!("not a parameter of the \"{model}\" model"),
        )),
        None => Ok(()),
    }
}
