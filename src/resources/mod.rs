//! Validated turbine and panel descriptions, and the registry that loads them.

/// Solar panel capacity models.
pub mod panel;
pub mod registry;
/// Wind turbine power curves.
pub mod turbine;

pub use panel::{PanelConfig, RawPanelConfig};
pub use registry::ResourceRegistry;
pub use turbine::{RawTurbineConfig, TurbineConfig};

/// Either kind of renewable resource unit.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceConfig {
    Turbine(TurbineConfig),
    Panel(PanelConfig),
}

impl From<TurbineConfig> for ResourceConfig {
    fn from(t: TurbineConfig) -> Self {
        Self::Turbine(t)
    }
}

impl From<PanelConfig> for ResourceConfig {
    fn from(p: PanelConfig) -> Self {
        Self::Panel(p)
    }
}
