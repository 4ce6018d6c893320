//! Renewable-resource models: turbine power-curve smoothing and rated
//! capacities of turbines and solar panels.

pub mod capacity;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
/// Turbine and panel descriptions, validation and the local registry.
pub mod resources;
pub mod smoothing;

pub use capacity::{RatedCapacity, rated_capacity_per_unit};
pub use error::{ResourceError, Result};
pub use resources::{PanelConfig, ResourceConfig, TurbineConfig};
pub use smoothing::{Diagnostic, SmoothedTurbine, SmoothingParameters, smooth};
