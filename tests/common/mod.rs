//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use atlas_resource::resources::TurbineConfig;
use atlas_resource::smoothing::SmoothingParameters;

/// Six-point reference curve: cut-in at 5 m/s, 800 kW plateau from 20 m/s.
pub fn reference_turbine() -> TurbineConfig {
    TurbineConfig::new(
        vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0],
        vec![0.0, 0.0, 100.0, 400.0, 800.0, 800.0],
        100.0,
    )
    .unwrap_or_else(|e| panic!("reference turbine should be valid: {e}"))
}

/// Curve that is linear over the whole regular grid.
pub fn linear_turbine() -> TurbineConfig {
    TurbineConfig::new(vec![-50.0, 50.0], vec![0.0, 1000.0], 100.0)
        .unwrap_or_else(|e| panic!("linear turbine should be valid: {e}"))
}

/// Kernel one grid step wide, centred, no derating.
pub fn near_identity_params() -> SmoothingParameters {
    SmoothingParameters::new(1.0, 0.0, 0.1)
        .unwrap_or_else(|e| panic!("near-identity parameters should be valid: {e}"))
}

/// Directory with the bundled turbine descriptions.
pub const TURBINE_DIR: &str = "resources/windturbine";
/// Directory with the bundled panel descriptions.
pub const PANEL_DIR: &str = "resources/solarpanel";
