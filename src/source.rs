//! Modifier sources module.
//!
//! A `ModifierSource` is one stat effect contributed by one equipped item:
//! a module upgrade, or the frame or trim wood of the hull. Sources for the
//! same modifier name stack additively; see [`crate::accumulator`].

use crate::modifier_name::ModifierName;
use serde::{Deserialize, Serialize};

/// One effect of one equipped item.
///
/// When `is_percentage` is set, `amount` is given in percent points as the
/// game catalogs carry it (`10.0` means +10%).
///
/// # Examples
///
/// ```rust
/// use shipstat::ModifierSource;
///
/// let thicker = ModifierSource::percent("Armor thickness", 10.0);
/// let more_crew = ModifierSource::flat("Crew", 15.0);
///
/// assert!(thicker.is_percentage);
/// assert!(!more_crew.is_percentage);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierSource {
    pub name: ModifierName,
    pub amount: f64,
    pub is_percentage: bool,
}

impl ModifierSource {
    /// Create a source. A percentage `amount` is in percent points.
    pub fn new(name: impl Into<ModifierName>, amount: f64, is_percentage: bool) -> Self {
        Self {
            name: name.into(),
            amount,
            is_percentage,
        }
    }

    /// An absolute (flat) contribution.
    pub fn flat(name: impl Into<ModifierName>, amount: f64) -> Self {
        Self::new(name, amount, false)
    }

    /// A percentage contribution, in percent points.
    pub fn percent(name: impl Into<ModifierName>, amount: f64) -> Self {
        Self::new(name, amount, true)
    }
}

/// Anything that contributes modifier sources to a ship.
///
/// Implemented by the item kinds a player can equip. Hosts with their own
/// catalog types can implement it too and feed them to a [`Loadout`].
pub trait ModifierProvider {
    /// The effects this item grants.
    fn modifiers(&self) -> &[ModifierSource];
}

/// A module upgrade (permanent, book, refit, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub modifiers: Vec<ModifierSource>,
}

impl Module {
    /// Create a module granting `modifiers`.
    pub fn new(name: impl Into<String>, modifiers: Vec<ModifierSource>) -> Self {
        Self {
            name: name.into(),
            modifiers,
        }
    }
}

impl ModifierProvider for Module {
    fn modifiers(&self) -> &[ModifierSource] {
        &self.modifiers
    }
}

/// A shipbuilding wood, used either for the frame or for the trim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wood {
    pub name: String,
    pub modifiers: Vec<ModifierSource>,
}

impl Wood {
    /// Create a wood granting `modifiers`.
    pub fn new(name: impl Into<String>, modifiers: Vec<ModifierSource>) -> Self {
        Self {
            name: name.into(),
            modifiers,
        }
    }
}

impl ModifierProvider for Wood {
    fn modifiers(&self) -> &[ModifierSource] {
        &self.modifiers
    }
}

/// Everything equipped on one ship: module upgrades plus frame and trim wood.
///
/// # Examples
///
/// ```rust
/// use shipstat::{Loadout, ModifierSource, Module, Wood};
///
/// let loadout = Loadout::new()
///     .with_module(Module::new("Elite Spanish", vec![ModifierSource::flat("Crew", 10.0)]))
///     .with_frame(Wood::new("Live Oak", vec![ModifierSource::percent("Armor thickness", 5.0)]))
///     .with_trim(Wood::new("Fir", vec![]));
///
/// assert_eq!(loadout.sources().count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub modules: Vec<Module>,
    pub frame: Option<Wood>,
    pub trim: Option<Wood>,
}

impl Loadout {
    /// An empty loadout: no modules, no woods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: equip a module.
    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    /// Builder: set the frame wood.
    pub fn with_frame(mut self, wood: Wood) -> Self {
        self.frame = Some(wood);
        self
    }

    /// Builder: set the trim wood.
    pub fn with_trim(mut self, wood: Wood) -> Self {
        self.trim = Some(wood);
        self
    }

    /// All modifier sources of the loadout: modules first, then frame and trim.
    pub fn sources(&self) -> impl Iterator<Item = &ModifierSource> + '_ {
        let woods = self.frame.iter().chain(self.trim.iter());
        self.modules
            .iter()
            .flat_map(|module| module.modifiers().iter())
            .chain(woods.flat_map(|wood| wood.modifiers().iter()))
    }
}
