//! Rated capacity per unit for turbines and panels.

use crate::error::{ResourceError, Result};
use crate::resources::{
    PanelConfig, RawPanelConfig, RawTurbineConfig, ResourceConfig, TurbineConfig,
};

/// Reference irradiance of the Bofinger regression (W/m²).
pub const BOFINGER_REFERENCE_IRRADIANCE: f64 = 1000.0;

/// Anything that has a rated capacity per installed unit.
///
/// Turbines report the peak of their power curve (kW). Panels report the
/// output coefficient of their model per unit of layout capacity.
pub trait RatedCapacity {
    /// Returns the rated capacity of one unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the description cannot yield a capacity, e.g. an
    /// empty power curve or an unsupported panel model.
    fn rated_capacity_per_unit(&self) -> Result<f64>;
}

/// Rated capacity of one unit of `config`.
///
/// # Errors
///
/// As [`RatedCapacity::rated_capacity_per_unit`].
pub fn rated_capacity_per_unit<C: RatedCapacity + ?Sized>(config: &C) -> Result<f64> {
    config.rated_capacity_per_unit()
}

/// Peak of a power curve.
///
/// # Errors
///
/// Returns [`ResourceError::EmptyCurve`] for an empty slice.
pub fn curve_peak(power: &[f64]) -> Result<f64> {
    power
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or(ResourceError::EmptyCurve)
}

/// Bofinger rated capacity: `(A + 1000·B + ln(1000)·C) · 1000`.
///
/// One layout unit is one panel of capacity
/// `(A + 1000·B + ln(1000)·C) · 1000 W/m² · (k / 1000)`.
pub fn bofinger_capacity(a: f64, b: f64, c: f64) -> f64 {
    let g = BOFINGER_REFERENCE_IRRADIANCE;
    (a + b * g + c * g.ln()) * 1e3
}

impl RatedCapacity for TurbineConfig {
    fn rated_capacity_per_unit(&self) -> Result<f64> {
        curve_peak(self.power())
    }
}

impl RatedCapacity for PanelConfig {
    fn rated_capacity_per_unit(&self) -> Result<f64> {
        Ok(match *self {
            Self::Huld { efficiency } => efficiency,
            Self::Bofinger { a, b, c } => bofinger_capacity(a, b, c),
        })
    }
}

impl RatedCapacity for ResourceConfig {
    fn rated_capacity_per_unit(&self) -> Result<f64> {
        match self {
            Self::Turbine(t) => t.rated_capacity_per_unit(),
            Self::Panel(p) => p.rated_capacity_per_unit(),
        }
    }
}

/// Validates first, so schema errors surface before any computation.
impl RatedCapacity for RawTurbineConfig {
    fn rated_capacity_per_unit(&self) -> Result<f64> {
        TurbineConfig::from_raw(self.clone())?.rated_capacity_per_unit()
    }
}

/// Resolves the `model` tag first, so an unknown tag is reported as
/// [`ResourceError::UnsupportedModel`].
impl RatedCapacity for RawPanelConfig {
    fn rated_capacity_per_unit(&self) -> Result<f64> {
        PanelConfig::from_raw(self.clone())?.rated_capacity_per_unit()
    }
}
