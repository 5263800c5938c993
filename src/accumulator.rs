//! Modifier accumulation.
//!
//! Folds every equipped effect into one net absolute delta and one net
//! percentage delta per modifier name. The result is a fresh value per
//! composition run; nothing is carried over between runs.

use crate::modifier_name::ModifierName;
use crate::registry::Registries;
use crate::source::ModifierSource;
use serde::Serialize;
use std::collections::btree_map;
use std::collections::BTreeMap;
use tracing::trace;

/// Net deltas for one modifier name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AccumulatedModifier {
    /// Sum of the absolute contributions.
    pub absolute: f64,
    /// Sum of the percentage contributions, as a fraction (`0.1` = +10%).
    pub percentage: f64,
}

/// Net deltas of every registered modifier present in a loadout.
///
/// # Examples
///
/// ```rust
/// use shipstat::{accumulate, ModifierSource, Registries};
///
/// let sources = vec![
///     ModifierSource::flat("Crew", 10.0),
///     ModifierSource::flat("Crew", 5.0),
///     ModifierSource::percent("Crew", 4.0),
///     ModifierSource::flat("Cannon reload", 3.0),
/// ];
/// let accumulated = accumulate(&sources, Registries::global());
///
/// let crew = accumulated.get("Crew").unwrap();
/// assert_eq!(crew.absolute, 15.0);
/// assert_eq!(crew.percentage, 0.04);
///
/// // Not a registered modifier: dropped.
/// assert!(accumulated.get("Cannon reload").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Accumulated(BTreeMap<ModifierName, AccumulatedModifier>);

impl Accumulated {
    /// Net deltas of `name`, if any registered source granted it.
    pub fn get(&self, name: &str) -> Option<&AccumulatedModifier> {
        self.0.get(name)
    }

    /// Whether `name` is an active modifier in this run.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of active modifiers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no source matched a registered modifier.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Modifiers in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, ModifierName, AccumulatedModifier> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Accumulated {
    type Item = (&'a ModifierName, &'a AccumulatedModifier);
    type IntoIter = btree_map::Iter<'a, ModifierName, AccumulatedModifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Raw contributions for one name, summed only once all are known.
#[derive(Default)]
struct Contributions {
    absolute: Vec<f64>,
    percent_points: Vec<f64>,
}

impl Contributions {
    fn push(&mut self, source: &ModifierSource) {
        if source.is_percentage {
            self.percent_points.push(source.amount);
        } else {
            self.absolute.push(source.amount);
        }
    }

    fn total(mut self) -> AccumulatedModifier {
        AccumulatedModifier {
            absolute: canonical_sum(&mut self.absolute),
            percentage: canonical_sum(&mut self.percent_points) / 100.0,
        }
    }
}

// Float addition is not associative; summing in sorted order makes the total
// independent of the order the sources were equipped in.
fn canonical_sum(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    values.iter().sum()
}

/// Sum modifier sources per name.
///
/// Sources whose name has no modifier registry entry contribute nothing.
pub fn accumulate<'a, I>(sources: I, registries: &Registries) -> Accumulated
where
    I: IntoIterator<Item = &'a ModifierSource>,
{
    let mut contributions: BTreeMap<ModifierName, Contributions> = BTreeMap::new();
    for source in sources {
        if !registries.is_registered(source.name.as_str()) {
            trace!(modifier = %source.name, "unregistered modifier skipped");
            continue;
        }
        contributions
            .entry(source.name.clone())
            .or_default()
            .push(source);
    }

    Accumulated(
        contributions
            .into_iter()
            .map(|(name, contribution)| (name, contribution.total()))
            .collect(),
    )
}
