use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, Result};

/// Turbine description as handed over by a loader, before validation.
///
/// Field names follow the on-disk schema (`V`, `POW`, `HUB_HEIGHT`). Extra keys
/// such as `name` or `manufacturer` are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawTurbineConfig {
    /// Wind speeds (m/s).
    #[serde(rename = "V", default, skip_serializing_if = "Option::is_none")]
    pub velocities: Option<Vec<f64>>,
    /// Electrical output at each wind speed (kW).
    #[serde(rename = "POW", default, skip_serializing_if = "Option::is_none")]
    pub power: Option<Vec<f64>>,
    /// Hub height (m).
    #[serde(rename = "HUB_HEIGHT", default, skip_serializing_if = "Option::is_none")]
    pub hub_height: Option<f64>,
}

/// Validated wind turbine power curve.
///
/// Velocities are strictly increasing, `power` has one non-negative value per
/// velocity and the hub height is positive. The rated power is always derived
/// from the curve, so it cannot drift from it.
///
/// # Examples
///
/// ```
/// use atlas_resource::resources::TurbineConfig;
///
/// let turbine = TurbineConfig::new(vec![0.0, 5.0, 10.0], vec![0.0, 50.0, 200.0], 80.0)?;
/// assert_eq!(turbine.rated_power(), 200.0);
/// # Ok::<(), atlas_resource::error::ResourceError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TurbineConfig {
    velocities: Vec<f64>,
    power: Vec<f64>,
    hub_height: f64,
}

impl TurbineConfig {
    /// Builds a turbine from its power curve and hub height.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::EmptyCurve`] for an empty `power` and
    /// [`ResourceError::InvalidConfigSchema`] for every other violation:
    /// length mismatch, fewer than two points, non-finite values, velocities
    /// that are not strictly increasing, negative power or a non-positive hub
    /// height.
    pub fn new(velocities: Vec<f64>, power: Vec<f64>, hub_height: f64) -> Result<Self> {
        if power.is_empty() {
            return Err(ResourceError::EmptyCurve);
        }
        if velocities.len() != power.len() {
            return Err(ResourceError::invalid(
                "POW",
                format!(
                    "length {} does not match V length {}",
                    power.len(),
                    velocities.len()
                ),
            ));
        }
        if velocities.len() < 2 {
            return Err(ResourceError::invalid("V", "needs at least 2 points"));
        }
        if let Some(i) = velocities.iter().position(|v| !v.is_finite()) {
            return Err(ResourceError::invalid(
                format!("V[{i}]"),
                "must be a finite number",
            ));
        }
        if let Some(i) = velocities.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ResourceError::invalid(
                format!("V[{}]", i + 1),
                format!(
                    "velocities must be strictly increasing ({} follows {})",
                    velocities[i + 1],
                    velocities[i]
                ),
            ));
        }
        if let Some(i) = power.iter().position(|p| !p.is_finite() || *p < 0.0) {
            return Err(ResourceError::invalid(
                format!("POW[{i}]"),
                format!("must be finite and >= 0, got {}", power[i]),
            ));
        }
        if !hub_height.is_finite() || hub_height <= 0.0 {
            return Err(ResourceError::invalid(
                "HUB_HEIGHT",
                format!("must be > 0, got {hub_height}"),
            ));
        }

        Ok(Self {
            velocities,
            power,
            hub_height,
        })
    }

    /// Assembles a curve the smoother produced on its own output grid.
    ///
    /// The grid is strictly increasing and the smoothed power non-negative by
    /// construction, so the checks in [`TurbineConfig::new`] are skipped.
    pub(crate) fn from_smoothed(velocities: Vec<f64>, power: Vec<f64>, hub_height: f64) -> Self {
        debug_assert_eq!(velocities.len(), power.len());
        debug_assert!(power.iter().all(|p| *p >= 0.0));
        Self {
            velocities,
            power,
            hub_height,
        }
    }

    /// Validates a loader-provided description.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidConfigSchema`] naming the first missing
    /// field, or any error from [`TurbineConfig::new`].
    pub fn from_raw(raw: RawTurbineConfig) -> Result<Self> {
        let velocities = raw
            .velocities
            .ok_or_else(|| ResourceError::invalid("V", "missing field"))?;
        let power = raw
            .power
            .ok_or_else(|| ResourceError::invalid("POW", "missing field"))?;
        let hub_height = raw
            .hub_height
            .ok_or_else(|| ResourceError::invalid("HUB_HEIGHT", "missing field"))?;
        Self::new(velocities, power, hub_height)
    }

    /// Parses and validates a turbine from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidConfigSchema`] if the YAML is malformed
    /// or fails validation.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let raw: RawTurbineConfig =
            serde_yaml::from_str(s).map_err(|e| ResourceError::invalid("yaml", e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Reads a turbine YAML file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Io`] if the file cannot be read, otherwise as
    /// [`TurbineConfig::from_yaml_str`].
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ResourceError::io(path, e))?;
        Self::from_yaml_str(&content)
    }

    /// Converts back into the on-disk schema.
    pub fn to_raw(&self) -> RawTurbineConfig {
        RawTurbineConfig {
            velocities: Some(self.velocities.clone()),
            power: Some(self.power.clone()),
            hub_height: Some(self.hub_height),
        }
    }

    /// Wind speeds of the curve (m/s), strictly increasing.
    pub fn velocities(&self) -> &[f64] {
        &self.velocities
    }

    /// Power at each wind speed (kW).
    pub fn power(&self) -> &[f64] {
        &self.power
    }

    pub fn hub_height(&self) -> f64 {
        self.hub_height
    }

    /// Number of points on the curve.
    pub fn len(&self) -> usize {
        self.power.len()
    }

    /// Always `false` for a validated curve.
    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    /// Peak of the power curve (kW).
    pub fn rated_power(&self) -> f64 {
        self.power.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Iterates over `(velocity, power)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.velocities
            .iter()
            .copied()
            .zip(self.power.iter().copied())
    }
}

impl TryFrom<RawTurbineConfig> for TurbineConfig {
    type Error = ResourceError;

    fn try_from(raw: RawTurbineConfig) -> Result<Self> {
        Self::from_raw(raw)
    }
}
