//! Gaussian wind-speed kernel and linear convolution.

use std::f64::consts::PI;

/// Normal probability density over wind speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianKernel {
    /// Mean offset Δv (m/s).
    pub mean: f64,
    /// Standard deviation σ (m/s).
    pub std_dev: f64,
}

impl GaussianKernel {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    /// `1/√(2πσ²) · exp(−(v−Δv)²/(2σ²))`
    ///
    /// Written in terms of `(v−Δv)/σ` so σ² is never formed and cannot
    /// underflow.
    pub fn density(&self, v: f64) -> f64 {
        let z = (v - self.mean) / self.std_dev;
        (-0.5 * z * z).exp() / (self.std_dev * (2.0 * PI).sqrt())
    }

    /// Density evaluated at every grid point.
    pub fn sample(&self, grid: &[f64]) -> Vec<f64> {
        grid.iter().map(|&v| self.density(v)).collect()
    }
}

/// Linear convolution trimmed to the length of `signal`.
///
/// Output `i` is element `i + (kernel.len() - 1) / 2` of the full convolution,
/// i.e. the centred part, matching the `same` mode of common signal-processing
/// libraries. The sum is computed directly, without wrap-around.
pub fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let m = kernel.len();
    if n == 0 || m == 0 {
        return vec![0.0; n];
    }

    let offset = (m - 1) / 2;
    (0..n)
        .map(|i| {
            let k = i + offset;
            let lo = k.saturating_sub(m - 1);
            let hi = k.min(n - 1);
            (lo..=hi).map(|j| signal[j] * kernel[k - j]).sum()
        })
        .collect()
}
