use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use satchel_core::{EquipSlot, ItemDefinition, ItemId, StatBonuses, StatKind};
use satchel_engine::{
    registry_from_file, GearSystem, InventoryConfig, ItemRegistry, Member, SaveStore,
};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt;

fn main() -> Result<()> {
    let _ = fmt().with_max_level(Level::INFO).try_init();
    let config = config_from_args()?;

    let store = SaveStore::new(&config.save_dir)?;
    let mut system = GearSystem::new(
        Arc::new(config.registry),
        InventoryConfig::default(),
    );
    system.roster_mut().add(Member::new("Aria"));

    match store.read_slot(config.slot)? {
        Some(snapshot) => {
            let skipped = system.restore(&snapshot);
            tracing::info!(slot = config.slot, skipped, "restored save slot");
        }
        None => {
            tracing::info!(slot = config.slot, "no prior save; seeding starting items");
            seed_starting_items(&mut system)?;
        }
    }

    demo_gear_round(&mut system)?;
    print_state(&system);

    let snapshot = system.snapshot();
    store.write_slot(config.slot, &snapshot)?;
    tracing::info!(slot = config.slot, "wrote save slot");

    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("failed to render snapshot")?
    );
    Ok(())
}

struct CliConfig {
    registry: ItemRegistry,
    save_dir: PathBuf,
    slot: u32,
}

fn config_from_args() -> Result<CliConfig> {
    config_from_iter(env::args().skip(1))
}

fn config_from_iter<I>(mut args: I) -> Result<CliConfig>
where
    I: Iterator<Item = String>,
{
    let mut pack_path: Option<PathBuf> = None;
    let mut save_dir: Option<PathBuf> = None;
    let mut slot: u32 = 0;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--items" => pack_path = args.next().map(PathBuf::from),
            "--saves" => save_dir = args.next().map(PathBuf::from),
            "--slot" => {
                slot = args
                    .next()
                    .and_then(|s| s.parse().ok())
                    .context("--slot expects a non-negative integer")?;
            }
            _ => {}
        }
    }
    let registry = if let Some(path) = pack_path {
        load_pack(&path)?
    } else {
        default_registry()?
    };
    let save_dir = save_dir.unwrap_or_else(|| PathBuf::from("target/saves"));
    Ok(CliConfig {
        registry,
        save_dir,
        slot,
    })
}

fn load_pack(path: &Path) -> Result<ItemRegistry> {
    registry_from_file(path)
        .with_context(|| format!("failed to load item pack from {}", path.display()))
}

fn default_registry() -> Result<ItemRegistry> {
    ItemRegistry::new(vec![
        ItemDefinition::simple("sat:herb", "Healing Herb", 10, 0.2),
        ItemDefinition::simple("sat:potion", "Potion", 5, 0.5),
        ItemDefinition::gear(
            "sat:iron_sword",
            "Iron Sword",
            3.0,
            EquipSlot::Weapon,
            StatBonuses {
                attack: 5,
                ..Default::default()
            },
        ),
        ItemDefinition::gear(
            "sat:leather_cap",
            "Leather Cap",
            1.0,
            EquipSlot::Helmet,
            StatBonuses {
                defense: 2,
                ..Default::default()
            },
        ),
    ])
}

fn seed_starting_items(system: &mut GearSystem) -> Result<()> {
    for (id, quantity) in [("sat:herb", 3), ("sat:iron_sword", 1), ("sat:leather_cap", 1)] {
        let id = ItemId::parse(id)?;
        if system.registry().contains(&id) {
            system
                .add_item(&id, quantity)
                .with_context(|| format!("failed to seed {id}"))?;
        }
    }
    system.add_currency(100);
    Ok(())
}

/// Equip everything equippable we carry, then report the loadout.
fn demo_gear_round(system: &mut GearSystem) -> Result<()> {
    let equippable: Vec<ItemId> = system
        .inventory()
        .slots()
        .iter()
        .flatten()
        .filter(|entry| entry.item.is_equippable())
        .map(|entry| entry.item.id.clone())
        .collect();

    for id in equippable {
        match system.equip(&id) {
            Ok(()) => tracing::info!(%id, "equipped"),
            Err(err) => tracing::warn!(%id, %err, "could not equip"),
        }
    }
    for event in system.drain_events() {
        tracing::debug!(?event, "state change");
    }
    Ok(())
}

fn print_state(system: &GearSystem) {
    println!(
        "inventory: {}/{} slots, {:.1}/{:.1} weight, {} gold",
        system.inventory().used_slots(),
        system.inventory().capacity(),
        system.inventory().current_weight(),
        system.inventory().max_weight(),
        system.inventory().currency(),
    );
    for (index, entry) in system.inventory().slots().iter().enumerate() {
        if let Some(entry) = entry {
            println!("  [{index}] {} x{}", entry.item.name, entry.quantity);
        }
    }
    for (slot, item) in system.shared_loadout().iter() {
        if let Some(item) = item {
            println!("  worn {slot}: {}", item.name);
        }
    }
    println!(
        "bonuses: atk {:+} def {:+} spd {:+}",
        system.equipment_bonus(StatKind::Attack),
        system.equipment_bonus(StatKind::Defense),
        system.equipment_bonus(StatKind::Speed),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args<'a>(list: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
        list.iter().map(|s| s.to_string())
    }

    #[test]
    fn default_config_uses_builtin_pack() {
        let config = config_from_iter(args(&[])).unwrap();
        assert_eq!(config.slot, 0);
        assert!(config.registry.len() >= 4);
    }

    #[test]
    fn slot_argument_is_parsed() {
        let config = config_from_iter(args(&["--slot", "3"])).unwrap();
        assert_eq!(config.slot, 3);
    }

    #[test]
    fn bad_slot_argument_is_an_error() {
        assert!(config_from_iter(args(&["--slot", "banana"])).is_err());
    }

    #[test]
    fn seeded_system_can_run_a_demo_round() {
        let mut system = GearSystem::new(
            Arc::new(default_registry().unwrap()),
            InventoryConfig::default(),
        );
        system.roster_mut().add(Member::new("Aria"));
        seed_starting_items(&mut system).unwrap();
        demo_gear_round(&mut system).unwrap();

        assert!(system.equipped(EquipSlot::Weapon).is_some());
        assert!(system.equipped(EquipSlot::Helmet).is_some());
        assert_eq!(system.equipment_bonus(StatKind::Attack), 5);
    }
}
