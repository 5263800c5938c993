//! Comparison example: one ship, three columns
//!
//! This example demonstrates:
//! - Loading a ship from catalog JSON
//! - Deriving speed bounds from the catalog
//! - Composing a base column and two loadout columns side by side
//! - Reporting which modifiers hit their cap

use shipstat::*;

const CERBERUS: &str = r#"{
    "name": "Cerberus",
    "maxWeight": 510,
    "bow": { "armour": 2450, "thickness": 33 },
    "sides": { "armour": 4125, "thickness": 30 },
    "stern": { "armour": 1350, "thickness": 26 },
    "structure": { "armour": 3400 },
    "crew": { "min": 20, "max": 250 },
    "resistance": { "fire": 0, "leaks": 0.05, "splinter": 0.1 },
    "ship": { "acceleration": 0.33, "deceleration": 0.45, "turnSpeed": 8, "turnAcceleration": 2 },
    "speed": { "min": -1.5, "max": 13.02 },
    "speedDegrees": [
        0, 0, 8.5, 8.75, 9, 9.25, 9.5, 9.75, 10, 10.25, 10.5, 10.75,
        11, 11.25, 11.5, 11.75, 12, -1.5, -1.5, -1.5, -1.5, -1.5, -1.5, -1.5
    ]
}"#;

const ROWS: [&str; 7] = [
    "sides.thickness",
    "sides.armour",
    "structure.armour",
    "crew.max",
    "resistance.leaks",
    "ship.turnSpeed",
    "maxWeight",
];

fn main() -> Result<(), ShipStatError> {
    println!("=== Ship Comparison Demo ===\n");

    let base = ShipAttributes::from_json(CERBERUS)?;
    let composer = ShipComposer::from_catalog(Registries::global(), [&base])?;
    let bounds = composer.speed_bounds();
    println!("Speed bounds: {:.2} .. {:.2} knots\n", bounds.min(), bounds.max());

    let brawler = Loadout::new()
        .with_module(Module::new(
            "Reinforced Hull",
            vec![
                ModifierSource::percent("Armor thickness", 30.0),
                ModifierSource::percent("Armour hit points", 25.0),
            ],
        ))
        .with_module(Module::new(
            "Bow Figure",
            vec![ModifierSource::percent("Armor thickness", 30.0)],
        ))
        .with_frame(Wood::new(
            "Live Oak",
            vec![
                ModifierSource::percent("Structure hit points", 8.0),
                ModifierSource::percent("Max speed", -1.0),
            ],
        ))
        .with_trim(Wood::new(
            "White Oak",
            vec![ModifierSource::percent("Leak resistance", 10.0)],
        ));

    let runner = Loadout::new()
        .with_module(Module::new(
            "Optimized Rudder",
            vec![ModifierSource::percent("Turn speed", 12.0)],
        ))
        .with_module(Module::new(
            "Elite Crew",
            vec![ModifierSource::flat("Crew", 15.0)],
        ))
        .with_frame(Wood::new(
            "Fir",
            vec![
                ModifierSource::percent("Max speed", 1.5),
                ModifierSource::percent("Armor thickness", -5.0),
            ],
        ));

    let columns = [
        ("Base", composer.compose_loadout(&base, &Loadout::new())),
        ("Brawler", composer.compose_loadout(&base, &brawler)),
        ("Runner", composer.compose_loadout(&base, &runner)),
    ];

    print!("{:<20}", "");
    for (title, _) in &columns {
        print!("{title:>12}");
    }
    println!();

    for row in ROWS {
        let path: AttributePath = row.parse()?;
        print!("{row:<20}");
        for (_, composition) in &columns {
            print!("{:>12}", composition.effective.read(&path));
        }
        println!();
    }

    print!("{:<20}", "top speed");
    for (_, composition) in &columns {
        let top = composition.speed_profile().map_or(0.0, SpeedProfile::max);
        print!("{top:>12.2}");
    }
    println!("\n");

    for (title, composition) in &columns {
        if composition.capped.is_capped() {
            println!("{title}: {}", composition.capped);
        }
    }

    Ok(())
}
