//! Error types
//!
//! Only configuration can fail. Everything else in the core is an invariant.

use thiserror::Error;

/// Rejected run configuration. A run never begins when this is returned.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("bodies_per_kind must be positive")]
    InvalidBodiesPerKind,
    #[error("arena dimensions must be positive and finite (got {width} x {height})")]
    InvalidArena { width: f32, height: f32 },
    #[error("arena {width} x {height} cannot hold a body of radius {radius}")]
    ArenaTooSmall { width: f32, height: f32, radius: f32 },
    #[error("invalid tunable: {0}")]
    InvalidTunable(&'static str),
}

/// Errors raised while loading settings from disk or JSON.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}
