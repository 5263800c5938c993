//! # shipstat - Ship Stat Composition & Capping Engine
//!
//! Computes a sailing ship's effective attributes from its unmodified base
//! attributes and the modifiers granted by equipped module upgrades and
//! frame/trim woods:
//! - **Deterministic** composition (same input → bit-identical output)
//! - **Order-independent** stacking of same-named modifiers
//! - **Capped** results, with the list of modifiers that hit their cap
//! - **Speed profile** rescaling for "Max speed" modifiers
//!
//! ## Pipeline
//!
//! ```text
//! [ModifierSource]* → accumulate → adjust (copy of base) → enforce caps → rescale speed
//! ```
//!
//! 1. **Accumulation** sums absolute and percentage deltas per modifier name;
//!    names without a registry entry are skipped
//! 2. **Adjustment** applies each net delta to the modifier's target
//!    attributes and rounds the result
//! 3. **Capping** clamps capped attributes against the *unmodified* base
//! 4. **Speed rescaling** scales the 24-heading polar diagram when
//!    "Max speed" is active
//!
//! ## Example
//!
//! ```rust
//! use shipstat::*;
//!
//! let composer = ShipComposer::new(Registries::global(), SpeedBounds::new(-3.0, 15.5).unwrap());
//! let base = ShipAttributes::new()
//!     .with_nested("sides", "thickness", 50.0)
//!     .with_nested("crew", "max", 250.0);
//!
//! let sources = vec![
//!     ModifierSource::percent("Armor thickness", 30.0),
//!     ModifierSource::percent("Armor thickness", 30.0),
//!     ModifierSource::flat("Crew", 10.0),
//!     ModifierSource::flat("Crew", 5.0),
//! ];
//! let composition = composer.compose(&base, &sources);
//!
//! // 50 × 1.6 = 80, capped at round(50 × 1.49) = 74
//! assert_eq!(composition.effective.read(&AttributePath::nested("sides", "thickness")), 74.0);
//! assert_eq!(composition.effective.read(&AttributePath::nested("crew", "max")), 265.0);
//! assert_eq!(composition.capped.to_string(), "Armor thickness capped");
//! ```
//!
//! ## Modules
//!
//! - [`modifier_name`] - Modifier name type
//! - [`source`] - Modifier sources, modules, woods and loadouts
//! - [`attributes`] - Ship attribute tree and attribute paths
//! - [`registry`] - Modifier and cap registries
//! - [`accumulator`] - Per-name summing of modifier sources
//! - [`adjust`] - Value adjustment and rounding policy
//! - [`cap`] - Cap enforcement
//! - [`speed`] - Speed profile recalculation
//! - [`composer`] - Composition entry point
//! - [`error`] - Error types

pub mod accumulator;
pub mod adjust;
pub mod attributes;
pub mod cap;
pub mod composer;
pub mod error;
pub mod modifier_name;
pub mod registry;
pub mod source;
pub mod speed;

// Re-export main types for convenience
pub use accumulator::{accumulate, Accumulated, AccumulatedModifier};
pub use attributes::{AttributeNode, AttributePath, ShipAttributes, SpeedProfile};
pub use cap::{enforce_caps, CappedResult};
pub use composer::{compose, Composition, ShipComposer};
pub use error::ShipStatError;
pub use modifier_name::ModifierName;
pub use registry::{Cap, CapEntry, ModifierEntry, Registries, MAX_SPEED};
pub use source::{Loadout, ModifierProvider, ModifierSource, Module, Wood};
pub use speed::{rescale_speed_profile, SpeedBounds};
