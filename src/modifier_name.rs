//! Modifier names.
//!
//! Item effects, the modifier registry and the cap registry all refer to a
//! stat change by the same human-readable key, such as "Armor thickness" or
//! "Crew". Matching is exact and case-sensitive: "Max speed" and
//! "max speed" are different modifiers, and a name with no registry entry
//! is simply ignored by the engine. Names order alphabetically, which is
//! the order capped modifiers are reported in.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Key of a modifier, shared by every source that grants it.
///
/// A loadout repeats the same few names across many sources, so the text
/// is held behind an `Arc<str>` and clones only bump a counter. Maps keyed
/// by `ModifierName` can be queried with a plain `&str`.
///
/// # Examples
///
/// ```rust
/// use shipstat::ModifierName;
/// use std::collections::BTreeMap;
///
/// let armor: ModifierName = "Armor thickness".into();
/// assert_eq!(armor, ModifierName::from_str("Armor thickness"));
/// assert_ne!(armor, ModifierName::from("armor thickness"));
///
/// let mut totals = BTreeMap::new();
/// totals.insert(armor, 0.6);
/// assert_eq!(totals.get("Armor thickness"), Some(&0.6));
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModifierName(Arc<str>);

impl ModifierName {
    /// Name a modifier.
    pub fn from_str(name: &str) -> Self {
        Self(name.into())
    }

    /// The name as written in the catalog.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModifierName {
    fn from(name: &str) -> Self {
        Self(name.into())
    }
}

impl From<String> for ModifierName {
    fn from(name: String) -> Self {
        Self(name.into())
    }
}

impl AsRef<str> for ModifierName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ModifierName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModifierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Catalog and registry JSON carry names as bare strings.
impl Serialize for ModifierName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ModifierName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}
