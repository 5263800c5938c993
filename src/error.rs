//! Error types for the data edges of the engine.
//!
//! Composition itself never fails: unregistered modifiers and missing stat
//! groups are skipped. Errors only surface where external data enters the
//! crate, i.e. when parsing attribute paths, loading registries from JSON or
//! deriving speed bounds from a ship catalog.

use crate::modifier_name::ModifierName;
use thiserror::Error;

/// Errors raised while loading engine configuration or catalog data.
///
/// # Examples
///
/// ```rust
/// use shipstat::ShipStatError;
///
/// let err = ShipStatError::InvalidPath("a.b.c".to_string());
/// assert_eq!(err.to_string(), "Invalid attribute path: a.b.c");
/// ```
#[derive(Debug, Error)]
pub enum ShipStatError {
    /// An attribute path was empty, had an empty segment or nested deeper
    /// than `group.field`.
    #[error("Invalid attribute path: {0}")]
    InvalidPath(String),

    /// A cap entry names a modifier the modifier registry does not know.
    #[error("Cap registered for unknown modifier: {0}")]
    UnknownCapModifier(ModifierName),

    /// Speed bounds were requested from a catalog without any ship.
    #[error("Cannot derive speed bounds from an empty ship catalog")]
    EmptyCatalog,

    /// The lower speed bound lies above the upper one.
    #[error("Invalid speed bounds: min {min} is greater than max {max}")]
    InvalidSpeedBounds { min: f64, max: f64 },

    /// Registry or catalog JSON could not be parsed.
    #[error("Error deserializing json: {0}")]
    Json(#[from] serde_json::Error),
}
