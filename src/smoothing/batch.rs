use std::panic;
use std::thread;

use crate::resources::TurbineConfig;

use super::{PowerCurveSmoother, SmoothedTurbine, SmoothingParameters};

/// Smooths every turbine in `turbines`, splitting the work over up to
/// `workers` scoped threads.
///
/// Results come back in input order. `workers` of 0 or 1 runs on the calling
/// thread.
pub fn smooth_fleet(
    turbines: &[TurbineConfig],
    params: SmoothingParameters,
    workers: usize,
) -> Vec<SmoothedTurbine> {
    let smoother = PowerCurveSmoother::new(params);
    let workers = workers.clamp(1, turbines.len().max(1));

    if workers == 1 {
        return turbines.iter().map(|t| smoother.smooth(t)).collect();
    }

    let chunk_size = turbines.len().div_ceil(workers);
    tracing::debug!(turbines = turbines.len(), workers, chunk_size, "smoothing fleet");

    thread::scope(|scope| {
        let smoother = &smoother;
        let handles: Vec<_> = turbines
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || chunk.iter().map(|t| smoother.smooth(t)).collect::<Vec<_>>())
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|e| panic::resume_unwind(e)))
            .collect()
    })
}
