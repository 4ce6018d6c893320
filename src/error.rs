//! Error types for resource loading, validation and capacity models.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised where a malformed resource description first becomes observable.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A required field is missing or malformed.
    #[error("invalid config schema at `{field}`: {message}")]
    InvalidConfigSchema { field: String, message: String },

    /// Panel `model` tag is not one of the supported variants.
    #[error("unsupported panel model \"{0}\", expected \"huld\" or \"bofinger\"")]
    UnsupportedModel(String),

    /// Turbine power curve has no points.
    #[error("power curve is empty")]
    EmptyCurve,

    #[error("cannot read \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registry lookup for a name that was never registered.
    #[error("unknown {kind} \"{name}\"")]
    UnknownResource { kind: &'static str, name: String },
}

impl ResourceError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigSchema {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResourceError>;
