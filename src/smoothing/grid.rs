//! Evenly spaced velocity grids and clamped linear interpolation.

/// `num` evenly spaced values from `start` to `stop`, both inclusive.
///
/// The last value is exactly `stop`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut grid: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            grid[num - 1] = stop;
            grid
        }
    }
}

/// Linearly interpolates `(xp, fp)` at `x`.
///
/// Outside `[xp[0], xp[last]]` the nearest endpoint value is returned, so the
/// curve is extended flat rather than extrapolated.
///
/// `xp` must be strictly increasing, non-empty and as long as `fp`.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert!(!xp.is_empty() && xp.len() == fp.len());

    let upper = xp.partition_point(|&v| v <= x);
    if upper == 0 {
        return fp[0];
    }
    if upper == xp.len() {
        return fp[xp.len() - 1];
    }

    let (x0, x1) = (xp[upper - 1], xp[upper]);
    let (y0, y1) = (fp[upper - 1], fp[upper]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// [`interp`] at every point of `xs`.
pub fn interp_all(xs: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    xs.iter().map(|&x| interp(x, xp, fp)).collect()
}
