//! Cap enforcement.
//!
//! The second pass of a composition run. Every active modifier with a cap
//! entry clamps its target attributes to a ceiling: either a fixed value, or
//! a percentage above the ship's *unmodified* value, so the ceiling does not
//! depend on what the first pass already did to the attribute.

use crate::accumulator::Accumulated;
use crate::adjust::{round_policy, RoundMode};
use crate::attributes::{AttributePath, ShipAttributes};
use crate::modifier_name::ModifierName;
use crate::registry::{Cap, Registries};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Which modifiers hit their cap during a composition run.
///
/// Purely informational: the clamp itself has already been applied to the
/// effective attributes.
///
/// # Examples
///
/// ```rust
/// use shipstat::CappedResult;
///
/// let capped = CappedResult::default();
/// assert!(!capped.is_capped());
/// assert_eq!(capped.to_string(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CappedResult {
    modifier_names: BTreeSet<ModifierName>,
}

impl CappedResult {
    /// `true` when at least one modifier was clamped.
    pub fn is_capped(&self) -> bool {
        !self.modifier_names.is_empty()
    }

    /// Whether the modifier `name` hit its cap.
    pub fn contains(&self, name: &str) -> bool {
        self.modifier_names.contains(name)
    }

    /// Capped modifier names in name order.
    pub fn modifier_names(&self) -> impl Iterator<Item = &ModifierName> + '_ {
        self.modifier_names.iter()
    }

    fn insert(&mut self, name: ModifierName) {
        self.modifier_names.insert(name);
    }
}

/// `"Armor thickness, Turn speed capped"`, or nothing when uncapped.
impl fmt::Display for CappedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_capped() {
            return Ok(());
        }
        let names: Vec<&str> = self
            .modifier_names
            .iter()
            .map(ModifierName::as_str)
            .collect();
        write!(f, "{} capped", names.join(", "))
    }
}

/// Ceiling for `path`, or `None` when the cap does not apply there.
///
/// A percentage cap needs an unmodified value to be relative to; on an
/// attribute the ship did not have before it imposes nothing.
fn threshold(
    cap: &Cap,
    base: &ShipAttributes,
    path: &AttributePath,
    mode: RoundMode,
) -> Option<f64> {
    if !cap.is_percentage {
        return Some(cap.amount);
    }
    let base_value = base.read(path);
    if base_value == 0.0 {
        return None;
    }
    Some(round_policy(base_value, base_value * (1.0 + cap.amount), mode))
}

/// Clamp every capped target of the active modifiers in `tree`.
///
/// `base` must be the unmodified tree `tree` was copied from. Values are only
/// ever lowered, and attributes absent from `tree` are left absent.
pub fn enforce_caps(
    tree: &mut ShipAttributes,
    base: &ShipAttributes,
    accumulated: &Accumulated,
    registries: &Registries,
) -> CappedResult {
    let mut capped = CappedResult::default();

    for (name, _) in accumulated {
        let Some(entry) = registries.cap(name.as_str()) else {
            continue;
        };
        let mode = RoundMode::for_modifier(name.as_str(), registries);

        for path in &entry.target_paths {
            let current = match tree.get(path) {
                Some(value) if value != 0.0 => value,
                _ => continue,
            };
            let Some(ceiling) = threshold(&entry.cap, base, path, mode) else {
                continue;
            };
            if current > ceiling {
                debug!(modifier = %name, %path, current, ceiling, "attribute capped");
                tree.write(path, ceiling);
                capped.insert(name.clone());
            }
        }
    }

    capped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::accumulate;
    use crate::source::ModifierSource;

    fn thickness() -> AttributePath {
        AttributePath::nested("sides", "thickness")
    }

    fn registries() -> Registries {
        Registries::empty()
            .with_modifier("Armor thickness", [thickness()], true)
            .with_cap("Armor thickness", [thickness()], Cap::percentage(0.49))
            .with_modifier("Crew", [AttributePath::nested("crew", "max")], true)
            .with_cap("Crew", [AttributePath::nested("crew", "max")], Cap::absolute(300.0))
            .with_modifier("Water pump health", [AttributePath::nested("pump", "armour")], true)
            .with_cap(
                "Water pump health",
                [AttributePath::nested("pump", "armour")],
                Cap::absolute(10.0),
            )
    }

    fn active(names: &[&str], registries: &Registries) -> Accumulated {
        let sources: Vec<_> = names
            .iter()
            .map(|&name| ModifierSource::flat(name, 1.0))
            .collect();
        accumulate(&sources, registries)
    }

    #[test]
    fn test_percentage_cap_clamps() {
        let registries = registries();
        let base = ShipAttributes::new().with_nested("sides", "thickness", 50.0);
        let mut tree = base.clone();
        tree.write(&thickness(), 80.0);

        let capped = enforce_caps(
            &mut tree,
            &base,
            &active(&["Armor thickness"], &registries),
            &registries,
        );

        // round(50 × 1.49) = round(74.5) = 74
        assert_eq!(tree.read(&thickness()), 74.0);
        assert!(capped.contains("Armor thickness"));
        assert_eq!(capped.to_string(), "Armor thickness capped");
    }

    #[test]
    fn test_below_cap_untouched() {
        let registries = registries();
        let base = ShipAttributes::new().with_nested("sides", "thickness", 50.0);
        let mut tree = base.clone();
        tree.write(&thickness(), 60.0);

        let capped = enforce_caps(
            &mut tree,
            &base,
            &active(&["Armor thickness"], &registries),
            &registries,
        );

        assert_eq!(tree.read(&thickness()), 60.0);
        assert!(!capped.is_capped());
    }

    #[test]
    fn test_cap_relative_to_unmodified_value() {
        let registries = registries();
        let base = ShipAttributes::new().with_nested("sides", "thickness", 30.0);
        let mut tree = base.clone();
        tree.write(&thickness(), 60.0);

        enforce_caps(
            &mut tree,
            &base,
            &active(&["Armor thickness"], &registries),
            &registries,
        );

        // round(30 × 1.49) = round(44.7) = 45, not a ceiling derived from 60
        assert_eq!(tree.read(&thickness()), 45.0);
    }

    #[test]
    fn test_absolute_cap() {
        let registries = registries();
        let base = ShipAttributes::new().with_nested("crew", "max", 280.0);
        let mut tree = base.clone();
        tree.write(&AttributePath::nested("crew", "max"), 320.0);

        let capped = enforce_caps(
            &mut tree,
            &base,
            &active(&["Crew"], &registries),
            &registries,
        );

        assert_eq!(tree.read(&AttributePath::nested("crew", "max")), 300.0);
        assert!(capped.contains("Crew"));
    }

    #[test]
    fn test_never_raises() {
        let registries = registries();
        let base = ShipAttributes::new().with_nested("crew", "max", 280.0);
        let mut tree = base.clone();
        tree.write(&AttributePath::nested("crew", "max"), 100.0);

        enforce_caps(
            &mut tree,
            &base,
            &active(&["Crew"], &registries),
            &registries,
        );

        assert_eq!(tree.read(&AttributePath::nested("crew", "max")), 100.0);
    }

    #[test]
    fn test_inactive_modifier_not_enforced() {
        let registries = registries();
        let base = ShipAttributes::new().with_nested("crew", "max", 500.0);
        let mut tree = base.clone();

        let capped = enforce_caps(
            &mut tree,
            &base,
            &active(&["Armor thickness"], &registries),
            &registries,
        );

        assert_eq!(tree.read(&AttributePath::nested("crew", "max")), 500.0);
        assert!(!capped.is_capped());
    }

    #[test]
    fn test_missing_group_skipped() {
        let registries = registries();
        let base = ShipAttributes::new();
        let mut tree = base.clone();

        let capped = enforce_caps(
            &mut tree,
            &base,
            &active(&["Water pump health"], &registries),
            &registries,
        );

        assert_eq!(tree.get(&AttributePath::nested("pump", "armour")), None);
        assert!(!capped.is_capped());
    }

    #[test]
    fn test_display_lists_names_sorted() {
        let registries = registries();
        let base = ShipAttributes::new()
            .with_nested("sides", "thickness", 10.0)
            .with_nested("crew", "max", 200.0);
        let mut tree = base.clone();
        tree.write(&thickness(), 40.0);
        tree.write(&AttributePath::nested("crew", "max"), 400.0);

        let capped = enforce_caps(
            &mut tree,
            &base,
            &active(&["Crew", "Armor thickness"], &registries),
            &registries,
        );

        assert_eq!(capped.to_string(), "Armor thickness, Crew capped");
        let names: Vec<&str> = capped.modifier_names().map(ModifierName::as_str).collect();
        assert_eq!(names, vec!["Armor thickness", "Crew"]);
    }
}
