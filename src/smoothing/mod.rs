//! Turbulence smoothing of turbine power curves.
//!
//! The nameplate curve is convolved with a Gaussian kernel over wind speed to
//! approximate turbulence and fleet heterogeneity, following G. B. Andresen,
//! A. A. Søndergaard, M. Greiner, "Validation of Danish wind time series from
//! a new global renewable energy atlas for energy system analysis",
//! Energy 93 (2015) 1074–1088.

/// Parallel smoothing of many turbines.
pub mod batch;
pub mod grid;
/// Gaussian kernel and convolution.
pub mod kernel;

use std::fmt;

use crate::error::{ResourceError, Result};
use crate::resources::TurbineConfig;

use self::grid::{interp, interp_all, linspace};
use self::kernel::{GaussianKernel, convolve_same};

pub use batch::smooth_fleet;

/// Lower end of the regular convolution grid (m/s).
pub const REGULAR_GRID_MIN: f64 = -50.0;
/// Upper end of the regular convolution grid (m/s).
pub const REGULAR_GRID_MAX: f64 = 50.0;
/// Points on the regular convolution grid (0.1 m/s spacing).
pub const REGULAR_GRID_POINTS: usize = 1001;
/// Spacing of the regular grid (m/s); scales the discrete sum to an integral.
pub const REGULAR_GRID_STEP: f64 = 0.1;

/// Upper end of the smoothed output curve (m/s); the lower end is 0.
pub const OUTPUT_GRID_MAX: f64 = 35.0;
/// Points on the smoothed output curve.
pub const OUTPUT_GRID_POINTS: usize = 72;

/// Power at 0 m/s above which a smoothed curve is flagged (kW).
pub const OVERSMOOTHING_THRESHOLD_KW: f64 = 1e-2;

/// Fleet availability, kernel offset and kernel width for one smoothing run.
///
/// Defaults are the values fitted by Andresen et al.: η = 0.95,
/// Δv = 1.27 m/s, σ = 2.29 m/s.
///
/// The kernel is sampled on the 0.1 m/s regular grid without renormalising,
/// so for σ well below the grid step the smoothed curve grows roughly as
/// 1/σ instead of approaching the input curve. σ of about one grid step is
/// the narrowest kernel that still integrates to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParameters {
    eta: f64,
    delta_v: f64,
    sigma: f64,
}

impl SmoothingParameters {
    pub const DEFAULT_ETA: f64 = 0.95;
    pub const DEFAULT_DELTA_V: f64 = 1.27;
    pub const DEFAULT_SIGMA: f64 = 2.29;
    /// Narrowest accepted kernel (m/s). Keeps every sampled kernel value
    /// finite, so the convolution cannot produce NaN.
    pub const MIN_SIGMA: f64 = 1e-6;

    /// Creates a validated parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidConfigSchema`] unless `eta` is in
    /// (0, 1], `delta_v` is finite and `sigma` is finite and at least
    /// [`SmoothingParameters::MIN_SIGMA`].
    pub fn new(eta: f64, delta_v: f64, sigma: f64) -> Result<Self> {
        if !(eta > 0.0 && eta <= 1.0) {
            return Err(ResourceError::invalid(
                "eta",
                format!("must be in (0, 1], got {eta}"),
            ));
        }
        if !delta_v.is_finite() {
            return Err(ResourceError::invalid(
                "delta_v",
                format!("must be finite, got {delta_v}"),
            ));
        }
        if !(sigma.is_finite() && sigma >= Self::MIN_SIGMA) {
            return Err(ResourceError::invalid(
                "sigma",
                format!("must be >= {}, got {sigma}", Self::MIN_SIGMA),
            ));
        }
        Ok(Self {
            eta,
            delta_v,
            sigma,
        })
    }

    /// Fleet availability derating factor.
    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// Kernel mean offset (m/s).
    pub fn delta_v(&self) -> f64 {
        self.delta_v
    }

    /// Kernel standard deviation (m/s).
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Default for SmoothingParameters {
    fn default() -> Self {
        Self {
            eta: Self::DEFAULT_ETA,
            delta_v: Self::DEFAULT_DELTA_V,
            sigma: Self::DEFAULT_SIGMA,
        }
    }
}

impl fmt::Display for SmoothingParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "eta={}, delta_v={} m/s, sigma={} m/s",
            self.eta, self.delta_v, self.sigma
        )
    }
}

/// Non-fatal findings attached to a smoothed curve.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The smoothed turbine produces power at 0 m/s: the kernel is too wide
    /// for the low-speed slope of the curve.
    Oversmoothing {
        power_at_zero_kw: f64,
        params: SmoothingParameters,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oversmoothing {
                power_at_zero_kw,
                params,
            } => write!(
                f,
                "oversmoothing detected with parameters {params}: \
                 turbine generates {power_at_zero_kw:.4} kW at 0 m/s"
            ),
        }
    }
}

/// Smoothed turbine together with any diagnostics raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedTurbine {
    pub turbine: TurbineConfig,
    pub diagnostics: Vec<Diagnostic>,
}

impl SmoothedTurbine {
    pub fn is_oversmoothed(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::Oversmoothing { .. }))
    }

    /// Drops the diagnostics and keeps the curve.
    pub fn into_turbine(self) -> TurbineConfig {
        self.turbine
    }
}

/// Smoother with the grids and kernel for one parameter set precomputed.
///
/// Immutable once built, so one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct PowerCurveSmoother {
    params: SmoothingParameters,
    regular_grid: Vec<f64>,
    kernel: Vec<f64>,
    output_grid: Vec<f64>,
}

impl PowerCurveSmoother {
    pub fn new(params: SmoothingParameters) -> Self {
        let regular_grid = linspace(REGULAR_GRID_MIN, REGULAR_GRID_MAX, REGULAR_GRID_POINTS);
        let kernel = GaussianKernel::new(params.delta_v, params.sigma).sample(&regular_grid);
        let output_grid = linspace(0.0, OUTPUT_GRID_MAX, OUTPUT_GRID_POINTS);
        Self {
            params,
            regular_grid,
            kernel,
            output_grid,
        }
    }

    pub fn params(&self) -> SmoothingParameters {
        self.params
    }

    /// Smooths one turbine curve.
    ///
    /// The input is resampled onto the regular grid (flat beyond its
    /// endpoints), convolved with the kernel, resampled onto the 72-point
    /// output grid over [0, 35] m/s and derated by η. The hub height is kept.
    ///
    /// Curves reaching outside [-50, 50] m/s are not supported: the part
    /// beyond the regular grid is ignored.
    pub fn smooth(&self, turbine: &TurbineConfig) -> SmoothedTurbine {
        let power_reg = interp_all(&self.regular_grid, turbine.velocities(), turbine.power());

        let convolution: Vec<f64> = convolve_same(&power_reg, &self.kernel)
            .into_iter()
            .map(|p| p * REGULAR_GRID_STEP)
            .collect();

        let eta = self.params.eta;
        let power: Vec<f64> = self
            .output_grid
            .iter()
            .map(|&v| eta * interp(v, &self.regular_grid, &convolution))
            .collect();

        let smoothed =
            TurbineConfig::from_smoothed(self.output_grid.clone(), power, turbine.hub_height());

        let mut diagnostics = Vec::new();
        let power_at_zero_kw = smoothed
            .points()
            .find(|(v, _)| *v == 0.0)
            .map_or(0.0, |(_, p)| p);
        if power_at_zero_kw > OVERSMOOTHING_THRESHOLD_KW {
            diagnostics.push(Diagnostic::Oversmoothing {
                power_at_zero_kw,
                params: self.params,
            });
        }

        tracing::debug!(
            input_points = turbine.len(),
            input_rated_kw = turbine.rated_power(),
            rated_kw = smoothed.rated_power(),
            power_at_zero_kw,
            diagnostics = diagnostics.len(),
            "power curve smoothed"
        );

        SmoothedTurbine {
            turbine: smoothed,
            diagnostics,
        }
    }
}

/// Smooths `turbine` with `params`.
///
/// Returns a new turbine with a 72-point curve over [0, 35] m/s and its
/// rated power recomputed from that curve. An oversmoothing finding is
/// reported in [`SmoothedTurbine::diagnostics`] rather than as an error.
///
/// The kernel is not renormalised on the sampling grid: σ far below
/// 0.1 m/s inflates the curve rather than reproducing it.
///
/// # Examples
///
/// ```
/// use atlas_resource::resources::TurbineConfig;
/// use atlas_resource::smoothing::{SmoothingParameters, smooth};
///
/// let turbine = TurbineConfig::new(
///     vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0],
///     vec![0.0, 0.0, 100.0, 400.0, 800.0, 800.0],
///     100.0,
/// )?;
/// let smoothed = smooth(&turbine, SmoothingParameters::default());
/// assert_eq!(smoothed.turbine.len(), 72);
/// assert!((smoothed.turbine.rated_power() - 760.0).abs() < 1.0);
/// # Ok::<(), atlas_resource::error::ResourceError>(())
/// ```
pub fn smooth(turbine: &TurbineConfig, params: SmoothingParameters) -> SmoothedTurbine {
    PowerCurveSmoother::new(params).smooth(turbine)
}
