//! Value adjustment and the rounding policy.
//!
//! A modifier's percentage scales a magnitude (thickness, hit points) but is
//! added to a rate (resistances stored as fractions), as chosen per registry
//! entry. Absolute deltas are added afterwards. The result is then rounded:
//! integral stats stay integral unless the modifier is listed as
//! do-not-round, everything else keeps two decimals.

use crate::accumulator::AccumulatedModifier;
use crate::attributes::ShipAttributes;
use crate::registry::{ModifierEntry, Registries};
use tracing::trace;

/// How an adjusted value is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundMode {
    /// Nearest integer on integral bases, two decimals otherwise.
    Standard,
    /// Always two decimals.
    KeepDecimals,
}

impl RoundMode {
    /// The mode the registries assign to a modifier.
    pub fn for_modifier(name: &str, registries: &Registries) -> Self {
        if registries.is_do_not_round(name) {
            RoundMode::KeepDecimals
        } else {
            RoundMode::Standard
        }
    }
}

// Hundredths closer than this to a whole hundredth are float noise.
const HUNDREDTH_EPSILON: f64 = 1e-9;

/// Round `value` to the nearest integer, ties to even.
pub fn round_nearest(value: f64) -> f64 {
    value.round_ties_even()
}

/// Truncate `value` toward zero at two decimals.
///
/// ```rust
/// use shipstat::adjust::truncate_hundredths;
///
/// assert_eq!(truncate_hundredths(10.8885), 10.88);
/// assert_eq!(truncate_hundredths(-1.239), -1.23);
/// assert_eq!(truncate_hundredths(0.05 + 0.1), 0.15);
/// ```
pub fn truncate_hundredths(value: f64) -> f64 {
    let scaled = value * 100.0;
    let nearest = scaled.round();
    let hundredths = if (scaled - nearest).abs() < HUNDREDTH_EPSILON {
        nearest
    } else {
        scaled.trunc()
    };
    hundredths / 100.0
}

fn is_integral(value: f64) -> bool {
    value != 0.0 && value.fract() == 0.0
}

/// Round `value` following the policy for a stat whose unmodified value is
/// `base_value`.
///
/// A zero base counts as non-integral, so a stat bootstrapped from nothing
/// keeps its decimals.
///
/// ```rust
/// use shipstat::adjust::{round_policy, RoundMode};
///
/// assert_eq!(round_policy(10.0, 10.37, RoundMode::Standard), 10.0);
/// assert_eq!(round_policy(10.0, 10.37, RoundMode::KeepDecimals), 10.37);
/// assert_eq!(round_policy(10.5, 10.8885, RoundMode::Standard), 10.88);
/// ```
pub fn round_policy(base_value: f64, value: f64, mode: RoundMode) -> f64 {
    if mode == RoundMode::Standard && is_integral(base_value) {
        round_nearest(value)
    } else {
        truncate_hundredths(value)
    }
}

/// Apply one modifier's net deltas to one value.
///
/// # Examples
///
/// ```rust
/// use shipstat::adjust::{adjust, RoundMode};
/// use shipstat::AccumulatedModifier;
///
/// let plus_ten_percent = AccumulatedModifier { absolute: 0.0, percentage: 0.1 };
///
/// // Magnitude: 100 × 1.1
/// assert_eq!(adjust(100.0, &plus_ten_percent, true, RoundMode::Standard), 110.0);
/// // Rate: 0.05 + 0.10
/// assert_eq!(adjust(0.05, &plus_ten_percent, false, RoundMode::Standard), 0.15);
/// // Nothing to scale: the percentage becomes the value.
/// assert_eq!(adjust(0.0, &plus_ten_percent, true, RoundMode::Standard), 0.1);
/// ```
pub fn adjust(
    base_value: f64,
    accumulated: &AccumulatedModifier,
    is_base_value_absolute: bool,
    mode: RoundMode,
) -> f64 {
    let mut value = base_value;

    if accumulated.percentage != 0.0 {
        value = if base_value == 0.0 {
            accumulated.percentage
        } else if is_base_value_absolute {
            base_value * (1.0 + accumulated.percentage)
        } else {
            base_value + accumulated.percentage
        };
    }

    if accumulated.absolute != 0.0 {
        value += accumulated.absolute;
    }

    round_policy(base_value, value, mode)
}

/// Apply one modifier to every attribute it targets in `tree`.
///
/// An attribute the ship does not have is only created by a non-zero delta.
pub(crate) fn apply_modifier(
    tree: &mut ShipAttributes,
    entry: &ModifierEntry,
    accumulated: &AccumulatedModifier,
    mode: RoundMode,
) {
    let is_net_zero = accumulated.absolute == 0.0 && accumulated.percentage == 0.0;
    for path in &entry.target_paths {
        let Some(current) = tree.get(path).or((!is_net_zero).then_some(0.0)) else {
            trace!(%path, "net-zero modifier on absent attribute skipped");
            continue;
        };
        let value = adjust(current, accumulated, entry.is_base_value_absolute, mode);
        tree.write(path, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributePath;

    fn pct(percentage: f64) -> AccumulatedModifier {
        AccumulatedModifier {
            absolute: 0.0,
            percentage,
        }
    }

    fn flat(absolute: f64) -> AccumulatedModifier {
        AccumulatedModifier {
            absolute,
            percentage: 0.0,
        }
    }

    #[test]
    fn test_round_nearest() {
        assert_eq!(round_nearest(2.5), 2.0);
        assert_eq!(round_nearest(3.5), 4.0);
        assert_eq!(round_nearest(-2.5), -2.0);
        assert_eq!(round_nearest(32.999999999), 33.0);
        assert_eq!(round_nearest(10.37), 10.0);
    }

    #[test]
    fn test_truncate_keeps_representable_hundredths() {
        assert_eq!(truncate_hundredths(0.29), 0.29);
        assert_eq!(truncate_hundredths(1.005), 1.0);
        assert_eq!(truncate_hundredths(12.3456), 12.34);
    }

    #[test]
    fn test_multiplicative_on_magnitude() {
        assert_eq!(adjust(30.0, &pct(0.1), true, RoundMode::Standard), 33.0);
    }

    #[test]
    fn test_additive_on_rate() {
        assert_eq!(adjust(0.05, &pct(0.1), false, RoundMode::Standard), 0.15);
        assert_eq!(adjust(0.2, &pct(-0.05), false, RoundMode::Standard), 0.15);
    }

    #[test]
    fn test_absolute_after_percentage() {
        let both = AccumulatedModifier {
            absolute: 5.0,
            percentage: 0.1,
        };
        // 100 × 1.1 + 5, not (100 + 5) × 1.1
        assert_eq!(adjust(100.0, &both, true, RoundMode::Standard), 115.0);
    }

    #[test]
    fn test_absolute_ignores_base_kind() {
        assert_eq!(adjust(250.0, &flat(15.0), true, RoundMode::Standard), 265.0);
        assert_eq!(adjust(0.25, &flat(0.5), false, RoundMode::Standard), 0.75);
    }

    #[test]
    fn test_integer_base_rounds() {
        assert_eq!(adjust(10.0, &pct(0.037), true, RoundMode::Standard), 10.0);
    }

    #[test]
    fn test_do_not_round_keeps_decimals() {
        assert_eq!(adjust(10.0, &pct(0.037), true, RoundMode::KeepDecimals), 10.37);
    }

    #[test]
    fn test_non_integer_base_truncates() {
        assert_eq!(adjust(10.5, &pct(0.037), true, RoundMode::Standard), 10.88);
    }

    #[test]
    fn test_bootstrap_from_zero() {
        assert_eq!(adjust(0.0, &pct(0.15), false, RoundMode::Standard), 0.15);
        assert_eq!(adjust(0.0, &pct(0.15), true, RoundMode::Standard), 0.15);
    }

    #[test]
    fn test_mode_for_modifier() {
        let registries = Registries::naval_action();
        assert_eq!(
            RoundMode::for_modifier("Turn acceleration", &registries),
            RoundMode::KeepDecimals
        );
        assert_eq!(RoundMode::for_modifier("Crew", &registries), RoundMode::Standard);
    }

    #[test]
    fn test_apply_modifier_to_all_paths() {
        let mut tree = ShipAttributes::new()
            .with_nested("bow", "thickness", 20.0)
            .with_nested("sides", "thickness", 30.0);
        let entry = ModifierEntry {
            target_paths: vec![
                AttributePath::nested("bow", "thickness"),
                AttributePath::nested("sides", "thickness"),
                AttributePath::nested("stern", "thickness"),
            ],
            is_base_value_absolute: true,
        };
        apply_modifier(&mut tree, &entry, &pct(0.1), RoundMode::Standard);

        assert_eq!(tree.read(&AttributePath::nested("bow", "thickness")), 22.0);
        assert_eq!(tree.read(&AttributePath::nested("sides", "thickness")), 33.0);
        assert_eq!(tree.get(&AttributePath::nested("stern", "thickness")), None);
    }

    #[test]
    fn test_net_zero_does_not_create_attribute() {
        let mut tree = ShipAttributes::new()
            .with_nested("resistance", "leaks", 0.05)
            .with_nested("crew", "max", 250.0);
        let entry = ModifierEntry {
            target_paths: vec![
                AttributePath::nested("resistance", "fire"),
                AttributePath::nested("crew", "max"),
            ],
            is_base_value_absolute: false,
        };
        apply_modifier(&mut tree, &entry, &flat(0.0), RoundMode::Standard);

        assert_eq!(tree.get(&AttributePath::nested("resistance", "fire")), None);
        assert_eq!(tree.read(&AttributePath::nested("crew", "max")), 250.0);
    }

    #[test]
    fn test_non_zero_delta_creates_attribute_in_existing_group() {
        let mut tree = ShipAttributes::new().with_nested("resistance", "leaks", 0.05);
        let entry = ModifierEntry {
            target_paths: vec![AttributePath::nested("resistance", "fire")],
            is_base_value_absolute: false,
        };
        apply_modifier(&mut tree, &entry, &pct(0.1), RoundMode::Standard);

        assert_eq!(tree.get(&AttributePath::nested("resistance", "fire")), Some(0.1));
    }
}
