//! Explicit name registry over local turbine and panel directories.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ResourceError, Result};

use super::{PanelConfig, TurbineConfig};

/// File extensions recognised as resource descriptions.
const EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Read-only index of the turbine and panel files available on disk.
///
/// The registry is built once by the caller with [`ResourceRegistry::from_dirs`]
/// and maps each file stem to its path. Nothing is scanned implicitly.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    turbines: BTreeMap<String, PathBuf>,
    panels: BTreeMap<String, PathBuf>,
}

impl ResourceRegistry {
    /// Indexes `*.yaml` / `*.yml` files in the two directories.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Io`] if either directory cannot be listed.
    pub fn from_dirs(turbine_dir: &Path, panel_dir: &Path) -> Result<Self> {
        let registry = Self {
            turbines: scan_dir(turbine_dir)?,
            panels: scan_dir(panel_dir)?,
        };
        tracing::info!(
            turbines = registry.turbines.len(),
            panels = registry.panels.len(),
            "resource registry built"
        );
        Ok(registry)
    }

    /// Registers a turbine file under `name`, replacing any previous entry.
    pub fn insert_turbine(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.turbines.insert(name.into(), path.into());
    }

    /// Registers a panel file under `name`, replacing any previous entry.
    pub fn insert_panel(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.panels.insert(name.into(), path.into());
    }

    /// Sorted turbine names.
    pub fn turbines(&self) -> impl Iterator<Item = &str> {
        self.turbines.keys().map(String::as_str)
    }

    /// Sorted panel names.
    pub fn panels(&self) -> impl Iterator<Item = &str> {
        self.panels.keys().map(String::as_str)
    }

    pub fn turbine_path(&self, name: &str) -> Option<&Path> {
        self.turbines.get(name).map(PathBuf::as_path)
    }

    pub fn panel_path(&self, name: &str) -> Option<&Path> {
        self.panels.get(name).map(PathBuf::as_path)
    }

    /// Loads and validates the turbine registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownResource`] for an unregistered name,
    /// otherwise as [`TurbineConfig::from_yaml_file`].
    pub fn load_turbine(&self, name: &str) -> Result<TurbineConfig> {
        let path = self
            .turbine_path(name)
            .ok_or_else(|| ResourceError::UnknownResource {
                kind: "turbine",
                name: name.to_string(),
            })?;
        TurbineConfig::from_yaml_file(path)
    }

    /// Loads and validates the panel registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownResource`] for an unregistered name,
    /// otherwise as [`PanelConfig::from_yaml_file`].
    pub fn load_panel(&self, name: &str) -> Result<PanelConfig> {
        let path = self
            .panel_path(name)
            .ok_or_else(|| ResourceError::UnknownResource {
                kind: "panel",
                name: name.to_string(),
            })?;
        PanelConfig::from_yaml_file(path)
    }
}

fn scan_dir(dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| ResourceError::io(dir, e))?;
    let mut found = BTreeMap::new();

    for entry in entries {
        let path = entry.map_err(|e| ResourceError::io(dir, e))?.path();
        let is_resource = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext));
        if !is_resource || !path.is_file() {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            found.insert(stem.to_string(), path.clone());
        }
    }

    Ok(found)
}
