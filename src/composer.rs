//! Ship composer module.
//!
//! Provides the `ShipComposer` type, the entry point that turns a ship's
//! unmodified attributes plus its equipped modifiers into effective
//! attributes.

use crate::accumulator::{accumulate, Accumulated};
use crate::adjust::{apply_modifier, RoundMode};
use crate::attributes::{ShipAttributes, SpeedProfile};
use crate::cap::{enforce_caps, CappedResult};
use crate::error::ShipStatError;
use crate::registry::{Registries, MAX_SPEED};
use crate::source::{Loadout, ModifierSource};
use crate::speed::{rescale_speed_profile, SpeedBounds};
use serde::Serialize;
use tracing::debug;

/// The outcome of one composition run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    /// Effective attributes, including the rescaled speed profile.
    pub effective: ShipAttributes,

    /// Modifiers whose cap clamped at least one attribute.
    pub capped: CappedResult,

    /// Net deltas per active modifier, for breakdown displays.
    pub accumulated: Accumulated,
}

impl Composition {
    /// The effective speed profile, after any "Max speed" rescale.
    pub fn speed_profile(&self) -> Option<&SpeedProfile> {
        self.effective.speed_profile()
    }
}

/// Composes effective ship attributes.
///
/// Each run works in three steps:
/// 1. Sum the sources per modifier name
/// 2. Adjust a fresh copy of the base attributes, then clamp capped ones
///    against the unmodified base
/// 3. Rescale the speed profile when "Max speed" is active
///
/// The composer holds no per-run state; comparing several ships or
/// loadouts side by side is just several `compose` calls.
///
/// # Examples
///
/// ```rust
/// use shipstat::*;
///
/// let registries = Registries::global();
/// let composer = ShipComposer::new(registries, SpeedBounds::new(-3.0, 15.5).unwrap());
///
/// let base = ShipAttributes::new().with_nested("sides", "thickness", 30.0);
/// let sources = vec![ModifierSource::percent("Armor thickness", 10.0)];
///
/// let composition = composer.compose(&base, &sources);
/// let thickness = AttributePath::nested("sides", "thickness");
///
/// assert_eq!(composition.effective.read(&thickness), 33.0);
/// assert!(!composition.capped.is_capped());
/// assert_eq!(base.read(&thickness), 30.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ShipComposer<'r> {
    registries: &'r Registries,
    speed_bounds: SpeedBounds,
}

impl<'r> ShipComposer<'r> {
    /// Create a composer over `registries` with explicit speed bounds.
    ///
    /// Use [`ShipComposer::from_catalog`] to derive the bounds from the
    /// ships being compared instead.
    pub fn new(registries: &'r Registries, speed_bounds: SpeedBounds) -> Self {
        Self {
            registries,
            speed_bounds,
        }
    }

    /// Create a composer whose speed bounds are derived from a ship catalog.
    pub fn from_catalog<'a, I>(registries: &'r Registries, ships: I) -> Result<Self, ShipStatError>
    where
        I: IntoIterator<Item = &'a ShipAttributes>,
    {
        let speed_bounds = SpeedBounds::from_catalog(ships, registries)?;
        Ok(Self::new(registries, speed_bounds))
    }

    /// The registries this composer resolves modifiers against.
    pub fn registries(&self) -> &'r Registries {
        self.registries
    }

    /// The bounds every rescaled speed sample is clamped to.
    pub fn speed_bounds(&self) -> SpeedBounds {
        self.speed_bounds
    }

    /// Compose `base` with a set of modifier sources.
    ///
    /// `base` is never modified.
    pub fn compose<'a, I>(&self, base: &ShipAttributes, sources: I) -> Composition
    where
        I: IntoIterator<Item = &'a ModifierSource>,
    {
        let accumulated = accumulate(sources, self.registries);
        let mut effective = base.clone();

        for (name, modifier) in &accumulated {
            if let Some(entry) = self.registries.modifier(name.as_str()) {
                let mode = RoundMode::for_modifier(name.as_str(), self.registries);
                apply_modifier(&mut effective, entry, modifier, mode);
            }
        }

        let capped = enforce_caps(&mut effective, base, &accumulated, self.registries);

        if let Some(speed) = accumulated.get(MAX_SPEED) {
            if let Some(profile) = effective.speed_profile_mut() {
                rescale_speed_profile(profile, speed.percentage, &self.speed_bounds);
            }
        }

        debug!(
            modifiers = accumulated.len(),
            capped = %capped,
            "ship attributes composed"
        );

        Composition {
            effective,
            capped,
            accumulated,
        }
    }

    /// Compose `base` with everything equipped in `loadout`.
    pub fn compose_loadout(&self, base: &ShipAttributes, loadout: &Loadout) -> Composition {
        self.compose(base, loadout.sources())
    }
}

/// Compose `base` with `sources` in a single call.
///
/// Shorthand for [`ShipComposer::new`] followed by [`ShipComposer::compose`].
pub fn compose<'a, I>(
    base: &ShipAttributes,
    sources: I,
    registries: &Registries,
    speed_bounds: SpeedBounds,
) -> Composition
where
    I: IntoIterator<Item = &'a ModifierSource>,
{
    ShipComposer::new(registries, speed_bounds).compose(base, sources)
}
