//! Error types for the resolution engine.
//!
//! Every error here is terminal by design: producing a wrong or partial
//! build matrix silently is strictly worse than stopping, so there is no
//! retry or skip path anywhere in the engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// No target package was selected. Resolution cannot start without one.
    #[error("no target package selected (set TARGET or pass --target)")]
    MissingTarget,

    /// A requested format name has no output mapping. The whole run aborts
    /// rather than skipping the offending descriptor.
    #[error("unknown build format: {0:?}")]
    UnknownFormat(String),
}
