//! Ship attribute tree module.
//!
//! A ship's stats arrive as loosely-typed catalog JSON: a handful of
//! top-level numbers (`maxWeight`, ...), groups one level deep (`sides`,
//! `crew`, `mast`, `pump`, ...) and the 24-sample heading-speed profile.
//! This module models that tree and the only two ways the engine addresses
//! it: a top-level field or a `group.field` pair.

use crate::error::ShipStatError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Number of samples in a speed profile (one every 15°).
pub const HEADING_COUNT: usize = 24;

/// Address of a numeric leaf inside a [`ShipAttributes`] tree.
///
/// Only the two nesting depths used by ship catalogs are representable,
/// so paths are validated once when they are built instead of being split
/// on every access.
///
/// # Examples
///
/// ```rust
/// use shipstat::AttributePath;
///
/// let thickness: AttributePath = "sides.thickness".parse().unwrap();
/// assert_eq!(thickness, AttributePath::nested("sides", "thickness"));
///
/// let weight: AttributePath = "maxWeight".parse().unwrap();
/// assert_eq!(weight, AttributePath::field("maxWeight"));
///
/// assert!("a.b.c".parse::<AttributePath>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AttributePath {
    /// A top-level field.
    Field(String),
    /// A field nested one level down inside a stat group.
    Nested { group: String, field: String },
}

impl AttributePath {
    /// Create a one-segment path.
    pub fn field(name: impl Into<String>) -> Self {
        AttributePath::Field(name.into())
    }

    /// Create a two-segment `group.field` path.
    pub fn nested(group: impl Into<String>, field: impl Into<String>) -> Self {
        AttributePath::Nested {
            group: group.into(),
            field: field.into(),
        }
    }

    /// Parse a dotted path with one or two non-empty segments.
    pub fn parse(path: &str) -> Result<Self, ShipStatError> {
        let mut segments = path.split('.');
        let first = segments.next().unwrap_or_default();
        let second = segments.next();
        if first.is_empty() || segments.next().is_some() {
            return Err(ShipStatError::InvalidPath(path.to_string()));
        }
        match second {
            None => Ok(AttributePath::field(first)),
            Some("") => Err(ShipStatError::InvalidPath(path.to_string())),
            Some(field) => Ok(AttributePath::nested(first, field)),
        }
    }
}

impl FromStr for AttributePath {
    type Err = ShipStatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributePath::parse(s)
    }
}

impl TryFrom<String> for AttributePath {
    type Error = ShipStatError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        AttributePath::parse(&s)
    }
}

impl From<AttributePath> for String {
    fn from(path: AttributePath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributePath::Field(name) => write!(f, "{name}"),
            AttributePath::Nested { group, field } => write!(f, "{group}.{field}"),
        }
    }
}

/// One node of the attribute tree.
///
/// Catalog fields the engine never touches (names, classes, flags) are kept
/// verbatim in [`AttributeNode::Other`] so a tree survives a JSON round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeNode {
    Number(f64),
    Group(BTreeMap<String, AttributeNode>),
    Other(serde_json::Value),
}

impl AttributeNode {
    fn as_number(&self) -> Option<f64> {
        match self {
            AttributeNode::Number(value) => Some(*value),
            _ => None,
        }
    }
}

/// The 24 heading-speed samples of a ship's polar diagram.
///
/// Sample `i` is the speed at heading `i * 15°` relative to the wind.
/// Downwind entries may be stored as negative magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeedProfile([f64; HEADING_COUNT]);

impl SpeedProfile {
    /// Wrap the samples of a polar diagram, heading 0° first.
    pub fn new(samples: [f64; HEADING_COUNT]) -> Self {
        Self(samples)
    }

    /// A profile with the same speed at every heading.
    pub fn uniform(speed: f64) -> Self {
        Self([speed; HEADING_COUNT])
    }

    /// The samples, heading 0° first.
    pub fn samples(&self) -> &[f64; HEADING_COUNT] {
        &self.0
    }

    /// Mutable access to the samples, used by the speed rescale.
    pub fn samples_mut(&mut self) -> &mut [f64; HEADING_COUNT] {
        &mut self.0
    }

    /// Lowest sample of the profile.
    pub fn min(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Highest sample of the profile.
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// A ship's attribute tree.
///
/// Cloning yields a fully independent deep copy, which is what every
/// composition run works on.
///
/// # Examples
///
/// ```rust
/// use shipstat::{AttributePath, ShipAttributes};
///
/// let mut ship = ShipAttributes::new()
///     .with_nested("sides", "thickness", 30.0)
///     .with_field("maxWeight", 400.0);
///
/// let thickness = AttributePath::nested("sides", "thickness");
/// assert_eq!(ship.read(&thickness), 30.0);
///
/// ship.write(&thickness, 33.0);
/// assert_eq!(ship.read(&thickness), 33.0);
///
/// // Ships without a pump simply have no `pump` group; writes are dropped.
/// let pump = AttributePath::nested("pump", "armour");
/// ship.write(&pump, 10.0);
/// assert_eq!(ship.get(&pump), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipAttributes {
    #[serde(
        rename = "speedDegrees",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    speed_profile: Option<SpeedProfile>,

    #[serde(flatten)]
    nodes: BTreeMap<String, AttributeNode>,
}

impl ShipAttributes {
    /// An empty tree with no speed profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a ship's base attributes from catalog JSON.
    pub fn from_json(json: &str) -> Result<Self, ShipStatError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder: set a top-level numeric field.
    pub fn with_field(mut self, name: impl Into<String>, value: f64) -> Self {
        self.nodes.insert(name.into(), AttributeNode::Number(value));
        self
    }

    /// Builder: set a nested numeric field, creating the group if needed.
    pub fn with_nested(
        mut self,
        group: impl Into<String>,
        field: impl Into<String>,
        value: f64,
    ) -> Self {
        let node = self
            .nodes
            .entry(group.into())
            .or_insert_with(|| AttributeNode::Group(BTreeMap::new()));
        if let AttributeNode::Group(fields) = node {
            fields.insert(field.into(), AttributeNode::Number(value));
        }
        self
    }

    /// Builder: attach a speed profile.
    pub fn with_speed_profile(mut self, profile: SpeedProfile) -> Self {
        self.speed_profile = Some(profile);
        self
    }

    /// The heading-speed profile, if the catalog entry has one.
    pub fn speed_profile(&self) -> Option<&SpeedProfile> {
        self.speed_profile.as_ref()
    }

    /// Mutable access to the heading-speed profile.
    pub fn speed_profile_mut(&mut self) -> Option<&mut SpeedProfile> {
        self.speed_profile.as_mut()
    }

    /// Get the numeric value at `path`, if the path holds a number.
    pub fn get(&self, path: &AttributePath) -> Option<f64> {
        match path {
            AttributePath::Field(name) => self.nodes.get(name)?.as_number(),
            AttributePath::Nested { group, field } => match self.nodes.get(group)? {
                AttributeNode::Group(fields) => fields.get(field)?.as_number(),
                _ => None,
            },
        }
    }

    /// Read the value at `path`; absent values read as `0.0`.
    pub fn read(&self, path: &AttributePath) -> f64 {
        self.get(path).unwrap_or(0.0)
    }

    /// Write `value` at `path`.
    ///
    /// Only numeric leaves are written: an absent top-level field is created,
    /// and a nested field is set only when its group exists. A write that
    /// would replace a group or a non-numeric catalog value is dropped.
    pub fn write(&mut self, path: &AttributePath, value: f64) {
        let (fields, key) = match path {
            AttributePath::Field(name) => (&mut self.nodes, name),
            AttributePath::Nested { group, field } => match self.nodes.get_mut(group) {
                Some(AttributeNode::Group(fields)) => (fields, field),
                _ => {
                    trace!(%path, "stat group absent, write skipped");
                    return;
                }
            },
        };
        set_leaf(fields, key, value, path);
    }
}

fn set_leaf(
    fields: &mut BTreeMap<String, AttributeNode>,
    key: &str,
    value: f64,
    path: &AttributePath,
) {
    match fields.get_mut(key) {
        Some(AttributeNode::Number(current)) => *current = value,
        Some(_) => trace!(%path, "attribute is not a number, write skipped"),
        None => {
            fields.insert(key.to_string(), AttributeNode::Number(value));
        }
    }
}
