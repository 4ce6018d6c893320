//! Integration tests for power-curve smoothing.

mod common;

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use atlas_resource::capacity::rated_capacity_per_unit;
use atlas_resource::resources::TurbineConfig;
use atlas_resource::smoothing::grid::interp;
use atlas_resource::smoothing::{
    OUTPUT_GRID_MAX, OUTPUT_GRID_POINTS, OVERSMOOTHING_THRESHOLD_KW, SmoothingParameters, smooth,
    smooth_fleet,
};

#[test]
fn reference_curve_with_default_parameters() {
    let input = common::reference_turbine();
    let result = smooth(&input, SmoothingParameters::default());
    let out = &result.turbine;

    assert_eq!(out.len(), OUTPUT_GRID_POINTS);
    assert_eq!(out.velocities().first().copied(), Some(0.0));
    assert_eq!(out.velocities().last().copied(), Some(OUTPUT_GRID_MAX));
    assert_abs_diff_eq!(out.rated_power(), 800.0 * 0.95, epsilon = 1e-3);
    assert_eq!(out.hub_height(), input.hub_height());

    // Power at 0 m/s stays small: only the far kernel tail reaches the 5 m/s cut-in.
    let p0 = out.power()[0];
    assert!(p0 > 0.0 && p0 < 0.05, "power at 0 m/s was {p0}");
    assert_eq!(
        result.is_oversmoothed(),
        p0 > OVERSMOOTHING_THRESHOLD_KW,
        "diagnostic must follow the threshold"
    );
}

#[test]
fn reference_curve_has_no_jumps() {
    let out = smooth(&common::reference_turbine(), SmoothingParameters::default()).turbine;
    let dv = 35.0 / 71.0;
    // Steepest smoothed slope stays below the steepest nameplate slope (80 kW per m/s).
    for w in out.power().windows(2) {
        assert!((w[1] - w[0]).abs() <= 80.0 * dv, "jump in smoothed curve: {w:?}");
    }
}

#[test]
fn smoothed_power_is_never_negative() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..20 {
        let n = rng.random_range(2..12);
        let mut v = 0.0;
        let mut velocities = Vec::with_capacity(n);
        let mut power = Vec::with_capacity(n);
        for _ in 0..n {
            v += rng.random_range(0.5..4.0);
            velocities.push(v);
            power.push(rng.random_range(0.0..3000.0));
        }
        let turbine = TurbineConfig::new(velocities, power, 100.0)
            .unwrap_or_else(|e| panic!("random turbine should be valid: {e}"));

        let params = SmoothingParameters::new(
            rng.random_range(0.05..=1.0),
            rng.random_range(-3.0..3.0),
            rng.random_range(0.1..5.0),
        )
        .unwrap_or_else(|e| panic!("random parameters should be valid: {e}"));

        let out = smooth(&turbine, params).turbine;
        assert!(
            out.power().iter().all(|p| *p >= 0.0),
            "negative power with {params}: {:?}",
            out.power()
        );
    }
}

#[test]
fn narrow_kernel_reproduces_linear_curve() {
    let input = common::linear_turbine();
    let out = smooth(&input, common::near_identity_params()).turbine;

    for (v, p) in out.points() {
        let expected = interp(v, input.velocities(), input.power());
        assert_abs_diff_eq!(p, expected, epsilon = 1e-4);
    }
}

#[test]
fn narrow_kernel_reproduces_reference_curve_away_from_knots() {
    let input = common::reference_turbine();
    let out = smooth(&input, common::near_identity_params()).turbine;

    let mut checked = 0;
    for (v, p) in out.points() {
        let overlaps = v <= 25.0;
        let clear_of_knots = input.velocities().iter().all(|k| (v - k).abs() > 0.35);
        if !(overlaps && clear_of_knots) {
            continue;
        }
        let expected = interp(v, input.velocities(), input.power());
        assert_abs_diff_eq!(p, expected, epsilon = 1e-2);
        checked += 1;
    }
    assert!(checked > 30, "too few points compared: {checked}");
}

#[test]
fn smoothed_output_feeds_back_into_capacity_model() {
    let out = smooth(&common::reference_turbine(), SmoothingParameters::default()).turbine;
    let cap = rated_capacity_per_unit(&out).unwrap_or(f64::NAN);
    let peak = out.power().iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(cap, peak);
    assert_eq!(cap, out.rated_power());

    // and can be smoothed again
    let again = smooth(&out, SmoothingParameters::default()).turbine;
    assert_eq!(again.len(), OUTPUT_GRID_POINTS);
}

#[test]
fn bundled_turbines_smooth_in_parallel() {
    let turbines: Vec<TurbineConfig> = ["generic_2mw_80m", "generic_3mw_120m"]
        .iter()
        .map(|name| {
            let path = std::path::Path::new(common::TURBINE_DIR).join(format!("{name}.yaml"));
            TurbineConfig::from_yaml_file(&path)
                .unwrap_or_else(|e| panic!("bundled turbine {name} should load: {e}"))
        })
        .collect();

    let results = smooth_fleet(&turbines, SmoothingParameters::default(), 2);
    assert_eq!(results.len(), 2);
    for (input, result) in turbines.iter().zip(&results) {
        assert!(result.turbine.rated_power() < input.rated_power());
        // 3 m/s cut-in is within two kernel widths of 0 m/s
        assert!(result.is_oversmoothed());
        assert!(result.turbine.power()[0] < 5.0);
    }
}
