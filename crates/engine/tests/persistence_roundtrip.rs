//! Snapshot and save-file round trips.

use satchel_core::{EquipSlot, ItemDefinition, ItemId, StatBonuses};
use satchel_engine::{GearSystem, InventoryConfig, ItemRegistry, Member, SaveStore, Snapshot};
use std::path::PathBuf;
use std::sync::Arc;

fn registry() -> Arc<ItemRegistry> {
    Arc::new(
        ItemRegistry::new(vec![
            ItemDefinition::simple("sat:herb", "Herb", 5, 0.5),
            ItemDefinition::simple("sat:rock", "Rock", 1, 1.0),
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
                "sat:helm",
                "Helm",
                2.0,
                EquipSlot::Helmet,
                StatBonuses {
                    defense: 3,
                    ..Default::default()
                },
            ),
        ])
        .unwrap(),
    )
}

fn id(text: &str) -> ItemId {
    ItemId::parse(text).unwrap()
}

fn populated_system() -> GearSystem {
    let mut sys = GearSystem::new(
        registry(),
        InventoryConfig {
            capacity: 12,
            max_weight: 60.0,
            max_currency: 9999,
        },
    );
    sys.roster_mut().add(Member::new("Aria"));
    sys.add_item(&id("sat:herb"), 7).unwrap();
    sys.add_item(&id("sat:rock"), 2).unwrap();
    sys.add_item(&id("sat:iron_sword"), 1).unwrap();
    sys.add_item(&id("sat:helm"), 1).unwrap();
    sys.add_currency(250);
    sys.equip(&id("sat:iron_sword")).unwrap();
    sys
}

fn temp_dir(label: &str) -> PathBuf {
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("satchel-{label}-{stamp}"))
}

fn snapshot_key(snapshot: &Snapshot) -> (u32, String, Vec<(usize, String, u32)>, Vec<String>) {
    let items = snapshot
        .items
        .iter()
        .map(|i| (i.slot, i.id.to_string(), i.quantity))
        .collect();
    let equipment = snapshot
        .equipment
        .iter()
        .map(|(slot, id)| format!("{slot}={id}"))
        .collect();
    (
        snapshot.currency,
        format!("{:.4}", snapshot.current_weight),
        items,
        equipment,
    )
}

#[test]
fn restore_of_own_snapshot_reproduces_state() {
    let sys = populated_system();
    let snapshot = sys.snapshot();

    let mut fresh = GearSystem::new(registry(), InventoryConfig::default());
    fresh.roster_mut().add(Member::new("Aria"));
    let skipped = fresh.restore(&snapshot);
    assert_eq!(skipped, 0);

    assert_eq!(snapshot_key(&fresh.snapshot()), snapshot_key(&snapshot));
    assert_eq!(fresh.count_item(&id("sat:herb")), 7);
    assert_eq!(fresh.inventory().currency(), 250);
    assert_eq!(
        fresh.equipped(EquipSlot::Weapon).unwrap().id,
        id("sat:iron_sword")
    );
    // The active member picks the shared loadout back up.
    assert_eq!(
        fresh
            .roster()
            .active()
            .unwrap()
            .loadout
            .get(EquipSlot::Weapon)
            .unwrap()
            .id,
        id("sat:iron_sword")
    );
}

#[test]
fn restore_skips_unresolvable_entries() {
    let sys_snapshot = populated_system().snapshot();

    let mut snapshot = sys_snapshot;
    snapshot.items.push(satchel_engine::SavedItem {
        id: id("sat:vanished_relic"),
        quantity: 3,
        slot: 11,
    });
    snapshot
        .equipment
        .insert(EquipSlot::Helmet, id("sat:vanished_crown"));

    let mut fresh = GearSystem::new(registry(), InventoryConfig::default());
    fresh.roster_mut().add(Member::new("Aria"));
    let skipped = fresh.restore(&snapshot);
    assert_eq!(skipped, 2);

    // Everything resolvable still lands.
    assert_eq!(fresh.count_item(&id("sat:herb")), 7);
    assert!(fresh.equipped(EquipSlot::Helmet).is_none());
}

#[test]
fn restore_skips_slot_incompatible_equipment() {
    let mut snapshot = populated_system().snapshot();
    // A sword recorded in the helmet slot is stale data, not an error.
    snapshot
        .equipment
        .insert(EquipSlot::Helmet, id("sat:iron_sword"));

    let mut fresh = GearSystem::new(registry(), InventoryConfig::default());
    fresh.roster_mut().add(Member::new("Aria"));
    let skipped = fresh.restore(&snapshot);
    assert_eq!(skipped, 1);
    assert!(fresh.equipped(EquipSlot::Helmet).is_none());
    assert_eq!(
        fresh.equipped(EquipSlot::Weapon).unwrap().id,
        id("sat:iron_sword")
    );
}

#[test]
fn restored_stacks_are_never_reserved() {
    let snapshot = populated_system().snapshot();

    let mut fresh = GearSystem::new(registry(), InventoryConfig::default());
    fresh.roster_mut().add(Member::new("Aria"));
    fresh.restore(&snapshot);

    for entry in fresh.inventory().slots().iter().flatten() {
        assert!(!entry.reserved);
    }
    // Every restored stack is immediately usable.
    fresh.remove_item(&id("sat:herb"), 7).unwrap();
}

#[test]
fn restore_replaces_any_previous_contents() {
    let snapshot = populated_system().snapshot();

    let mut other = GearSystem::new(registry(), InventoryConfig::default());
    other.roster_mut().add(Member::new("Bram"));
    other.add_item(&id("sat:rock"), 5).unwrap();
    other.add_currency(9000);
    other.restore(&snapshot);

    assert_eq!(other.count_item(&id("sat:rock")), 2);
    assert_eq!(other.inventory().currency(), 250);
}

#[test]
fn save_store_round_trips_through_a_file() {
    let dir = temp_dir("roundtrip");
    let store = SaveStore::new(&dir).unwrap();
    let snapshot = populated_system().snapshot();

    assert!(!store.slot_exists(0));
    store.write_slot(0, &snapshot).unwrap();
    assert!(store.slot_exists(0));

    let loaded = store.read_slot(0).unwrap().unwrap();
    assert_eq!(snapshot_key(&loaded), snapshot_key(&snapshot));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_slot_reads_as_none() {
    let dir = temp_dir("missing");
    let store = SaveStore::new(&dir).unwrap();
    assert!(store.read_slot(3).unwrap().is_none());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn corrupted_payload_is_rejected() {
    let dir = temp_dir("corrupt");
    let store = SaveStore::new(&dir).unwrap();
    let snapshot = populated_system().snapshot();
    store.write_slot(1, &snapshot).unwrap();

    let path = dir.join("save.1.sv");
    let mut bytes = std::fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    std::fs::write(&path, &bytes).unwrap();

    assert!(store.read_slot(1).is_err());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn truncated_file_is_rejected() {
    let dir = temp_dir("truncated");
    let store = SaveStore::new(&dir).unwrap();
    let snapshot = populated_system().snapshot();
    store.write_slot(2, &snapshot).unwrap();

    let path = dir.join("save.2.sv");
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..8]).unwrap();

    assert!(store.read_slot(2).is_err());
    std::fs::remove_dir_all(&dir).unwrap();
}
