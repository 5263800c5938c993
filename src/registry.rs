//! Modifier and cap registries.
//!
//! The modifier registry maps a modifier name to the attributes it changes
//! and to how a percentage applies to them. The cap registry bounds a subset
//! of those modifiers, either at a fixed value or relative to the ship's
//! unmodified value. Both tables are constant for the life of the process:
//! build them once (or use [`Registries::global`]) and share them by
//! reference.
//!
//! Modifier names without a registry entry are not an error anywhere in the
//! engine. Catalogs routinely carry effects that have no ship attribute to
//! show them on, and those are skipped.

use crate::attributes::AttributePath;
use crate::error::ShipStatError;
use crate::modifier_name::ModifierName;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::warn;

/// Name of the modifier that also rescales the speed profile.
pub const MAX_SPEED: &str = "Max speed";

/// Registry entry for one modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierEntry {
    /// Attributes changed by the modifier.
    pub target_paths: Vec<AttributePath>,
    /// `true` when the attribute is a magnitude (percentages multiply it),
    /// `false` when it is a rate (percentages are added to it).
    pub is_base_value_absolute: bool,
}

/// A ceiling for a modifier's target attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cap {
    /// Fixed ceiling, or a fraction of the unmodified value (`0.49` = +49%).
    pub amount: f64,
    pub is_percentage: bool,
}

impl Cap {
    /// A fixed ceiling, in the attribute's own unit.
    pub fn absolute(amount: f64) -> Self {
        Self {
            amount,
            is_percentage: false,
        }
    }

    /// A ceiling `fraction` above the unmodified value.
    pub fn percentage(fraction: f64) -> Self {
        Self {
            amount: fraction,
            is_percentage: true,
        }
    }
}

/// Registry entry for one capped modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapEntry {
    pub target_paths: Vec<AttributePath>,
    pub cap: Cap,
}

/// The modifier registry, the cap registry and the do-not-round set.
///
/// # Examples
///
/// ```rust
/// use shipstat::{AttributePath, Cap, Registries};
///
/// let registries = Registries::empty()
///     .with_modifier("Crew", [AttributePath::nested("crew", "max")], true)
///     .with_cap("Crew", [AttributePath::nested("crew", "max")], Cap::absolute(1000.0));
///
/// assert!(registries.modifier("Crew").is_some());
/// assert!(registries.modifier("Cannon reload").is_none());
/// assert_eq!(registries.cap("Crew").unwrap().cap.amount, 1000.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registries {
    modifiers: HashMap<ModifierName, ModifierEntry>,
    #[serde(default)]
    caps: HashMap<ModifierName, CapEntry>,
    #[serde(default)]
    do_not_round: HashSet<ModifierName>,
}

impl Registries {
    /// Registries without any entry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in tables for Naval Action ship upgrades and woods.
    pub fn naval_action() -> Self {
        let armour_sides = ["bow", "sides", "stern"];
        let masts = ["bottom", "middle", "top"];
        fn nested(group: &str, field: &str) -> AttributePath {
            AttributePath::nested(group, field)
        }

        let thickness: Vec<_> = armour_sides
            .iter()
            .map(|&side| nested(side, "thickness"))
            .collect();
        let armour: Vec<_> = armour_sides
            .iter()
            .map(|&side| nested(side, "armour"))
            .collect();
        let mast_thickness: Vec<_> = masts
            .iter()
            .map(|part| nested("mast", &format!("{part}Thickness")))
            .collect();
        let mast_armour: Vec<_> = masts
            .iter()
            .map(|part| nested("mast", &format!("{part}Armour")))
            .collect();

        Self::empty()
            .with_modifier("Armor thickness", thickness.clone(), true)
            .with_modifier("Armour hit points", armour.clone(), true)
            .with_modifier("Structure hit points", [nested("structure", "armour")], true)
            .with_modifier("Crew", [nested("crew", "max")], true)
            .with_modifier("Fire resistance", [nested("resistance", "fire")], false)
            .with_modifier("Leak resistance", [nested("resistance", "leaks")], false)
            .with_modifier("Splinter resistance", [nested("resistance", "splinter")], false)
            .with_modifier("Mast thickness", mast_thickness.clone(), true)
            .with_modifier("Mast health", mast_armour, true)
            .with_modifier("Rudder health", [nested("rudder", "armour")], true)
            .with_modifier("Rudder speed", [nested("rudder", "halfturnTime")], true)
            .with_modifier("Sail health", [nested("sails", "armour")], true)
            .with_modifier("Sail rotation speed", [nested("sails", "rotation")], true)
            .with_modifier("Turn acceleration", [nested("ship", "turnAcceleration")], true)
            .with_modifier("Turn speed", [nested("ship", "turnSpeed")], true)
            .with_modifier("Acceleration", [nested("ship", "acceleration")], true)
            .with_modifier("Deceleration", [nested("ship", "deceleration")], true)
            .with_modifier(MAX_SPEED, [nested("speed", "max")], true)
            .with_modifier("Hold weight", [AttributePath::field("maxWeight")], true)
            .with_modifier("Water pump health", [nested("pump", "armour")], true)
            .with_cap("Armor thickness", thickness, Cap::percentage(0.49))
            .with_cap("Armour hit points", armour, Cap::percentage(0.49))
            .with_cap(
                "Structure hit points",
                [nested("structure", "armour")],
                Cap::percentage(0.49),
            )
            .with_cap("Mast thickness", mast_thickness, Cap::percentage(0.49))
            .with_cap("Turn speed", [nested("ship", "turnSpeed")], Cap::percentage(0.25))
            .with_cap(MAX_SPEED, [nested("speed", "max")], Cap::absolute(15.5))
            .with_do_not_round("Turn acceleration")
    }

    /// Shared built-in registries, initialised on first use.
    pub fn global() -> &'static Registries {
        static REGISTRIES: OnceLock<Registries> = OnceLock::new();
        REGISTRIES.get_or_init(Registries::naval_action)
    }

    /// Load registries from a JSON document.
    ///
    /// Every capped modifier must also be registered as a modifier.
    ///
    /// ```rust
    /// use shipstat::Registries;
    ///
    /// let registries = Registries::from_json(r#"{
    ///     "modifiers": {
    ///         "Crew": { "targetPaths": ["crew.max"], "isBaseValueAbsolute": true }
    ///     },
    ///     "caps": {
    ///         "Crew": { "targetPaths": ["crew.max"], "cap": { "amount": 0.2, "isPercentage": true } }
    ///     }
    /// }"#).unwrap();
    ///
    /// assert!(registries.cap("Crew").unwrap().cap.is_percentage);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ShipStatError> {
        let registries: Registries = serde_json::from_str(json)?;
        registries.validate()?;
        Ok(registries)
    }

    fn validate(&self) -> Result<(), ShipStatError> {
        let mut capped: Vec<&ModifierName> = self.caps.keys().collect();
        capped.sort();
        if let Some(unknown) = capped.into_iter().find(|name| !self.modifiers.contains_key(*name)) {
            return Err(ShipStatError::UnknownCapModifier((*unknown).clone()));
        }
        for name in &self.do_not_round {
            if !self.modifiers.contains_key(name) {
                warn!(modifier = %name, "do-not-round entry is not a registered modifier");
            }
        }
        Ok(())
    }

    /// Builder: register a modifier, replacing any previous entry.
    pub fn with_modifier(
        mut self,
        name: impl Into<ModifierName>,
        target_paths: impl IntoIterator<Item = AttributePath>,
        is_base_value_absolute: bool,
    ) -> Self {
        self.modifiers.insert(
            name.into(),
            ModifierEntry {
                target_paths: target_paths.into_iter().collect(),
                is_base_value_absolute,
            },
        );
        self
    }

    /// Builder: register a cap, replacing any previous entry.
    pub fn with_cap(
        mut self,
        name: impl Into<ModifierName>,
        target_paths: impl IntoIterator<Item = AttributePath>,
        cap: Cap,
    ) -> Self {
        self.caps.insert(
            name.into(),
            CapEntry {
                target_paths: target_paths.into_iter().collect(),
                cap,
            },
        );
        self
    }

    /// Builder: keep two decimals for this modifier even on integer bases.
    pub fn with_do_not_round(mut self, name: impl Into<ModifierName>) -> Self {
        self.do_not_round.insert(name.into());
        self
    }

    /// Look up the registry entry of a modifier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shipstat::Registries;
    ///
    /// let registries = Registries::global();
    /// let crew = registries.modifier("Crew").unwrap();
    /// assert!(crew.is_base_value_absolute);
    /// assert!(registries.modifier("crew").is_none());
    /// ```
    pub fn modifier(&self, name: &str) -> Option<&ModifierEntry> {
        self.modifiers.get(name)
    }

    /// The cap entry of a modifier, if it is capped.
    pub fn cap(&self, name: &str) -> Option<&CapEntry> {
        self.caps.get(name)
    }

    /// Whether sources named `name` take part in composition.
    pub fn is_registered(&self, name: &str) -> bool {
        self.modifiers.contains_key(name)
    }

    /// Whether `name` always keeps two decimals.
    pub fn is_do_not_round(&self, name: &str) -> bool {
        self.do_not_round.contains(name)
    }

    /// The fixed cap of the [`MAX_SPEED`] modifier, if it has one.
    pub fn max_speed_cap(&self) -> Option<f64> {
        self.cap(MAX_SPEED)
            .filter(|entry| !entry.cap.is_percentage)
            .map(|entry| entry.cap.amount)
    }
}
