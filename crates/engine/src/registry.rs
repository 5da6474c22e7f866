//! Item definition registry.
//!
//! Maps stable item ids to their immutable definitions. Built once at
//! startup from an item pack (JSON) or an in-code list, then shared
//! read-only as `Arc<ItemRegistry>` for the lifetime of the process.

use anyhow::{Context, Result};
use satchel_core::{ItemDefinition, ItemId};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Registry storing item definitions keyed by id.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    items: HashMap<ItemId, Arc<ItemDefinition>>,
}

impl ItemRegistry {
    /// Construct a registry from the supplied definitions.
    ///
    /// Rejects duplicate ids, zero stack limits, and negative or
    /// non-finite weights; a pack that fails validation is refused as a
    /// whole rather than partially loaded.
    pub fn new(definitions: Vec<ItemDefinition>) -> Result<Self> {
        let mut items = HashMap::with_capacity(definitions.len());
        for def in definitions {
            if def.stack_limit == 0 {
                anyhow::bail!("item {} has a zero stack limit", def.id);
            }
            if !def.weight.is_finite() || def.weight < 0.0 {
                anyhow::bail!("item {} has an invalid weight {}", def.id, def.weight);
            }
            let id = def.id.clone();
            if items.insert(id.clone(), Arc::new(def)).is_some() {
                anyhow::bail!("duplicate item id {id} in pack");
            }
        }
        Ok(Self { items })
    }

    /// Look up a definition by id.
    pub fn resolve(&self, id: &ItemId) -> Option<Arc<ItemDefinition>> {
        self.items.get(id).cloned()
    }

    /// Whether the registry knows `id`.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the registry holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate definitions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ItemDefinition>> {
        self.items.values()
    }
}

/// Load an item registry from the provided JSON pack file.
pub fn registry_from_file(path: &Path) -> Result<ItemRegistry> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read item pack {}", path.display()))?;
    registry_from_str(&data)
}

/// Load an item registry from an in-memory JSON pack string.
///
/// The pack is a JSON array of item definitions; optional fields
/// (equip slot, bonuses, effect, droppable, rarity) take their
/// defaults when omitted.
pub fn registry_from_str(input: &str) -> Result<ItemRegistry> {
    let defs: Vec<ItemDefinition> =
        serde_json::from_str(input).context("failed to parse item pack JSON")?;
    ItemRegistry::new(defs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_core::{EquipSlot, StatBonuses};

    #[test]
    fn resolves_registered_items() {
        let registry = ItemRegistry::new(vec![
            ItemDefinition::simple("sat:potion", "Potion", 10, 0.2),
            ItemDefinition::gear(
                "sat:iron_sword",
                "Iron Sword",
                3.0,
                EquipSlot::Weapon,
                StatBonuses::default(),
            ),
        ])
        .unwrap();

        let id = ItemId::parse("sat:potion").unwrap();
        let def = registry.resolve(&id).unwrap();
        assert_eq!(def.name, "Potion");
        assert_eq!(registry.len(), 2);

        let missing = ItemId::parse("sat:ghost").unwrap();
        assert!(registry.resolve(&missing).is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = ItemRegistry::new(vec![
            ItemDefinition::simple("sat:potion", "Potion", 10, 0.2),
            ItemDefinition::simple("sat:potion", "Potion Again", 10, 0.2),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_invalid_fields() {
        let mut bad = ItemDefinition::simple("sat:potion", "Potion", 10, 0.2);
        bad.stack_limit = 0;
        assert!(ItemRegistry::new(vec![bad]).is_err());

        let mut heavy = ItemDefinition::simple("sat:anvil", "Anvil", 1, 1.0);
        heavy.weight = f32::NAN;
        assert!(ItemRegistry::new(vec![heavy]).is_err());
    }

    #[test]
    fn loads_pack_from_json() {
        let pack = r#"[
            {"id": "sat:potion", "name": "Potion", "stack_limit": 10, "weight": 0.2,
             "effect": {"hp_restore": 50}},
            {"id": "sat:iron_sword", "name": "Iron Sword", "stack_limit": 1, "weight": 3.0,
             "equip_slot": "weapon", "bonuses": {"attack": 5}, "rarity": "uncommon"}
        ]"#;
        let registry = registry_from_str(pack).unwrap();
        assert_eq!(registry.len(), 2);

        let sword = registry
            .resolve(&ItemId::parse("sat:iron_sword").unwrap())
            .unwrap();
        assert_eq!(sword.equip_slot, Some(EquipSlot::Weapon));
        assert_eq!(sword.bonuses.attack, 5);

        let potion = registry
            .resolve(&ItemId::parse("sat:potion").unwrap())
            .unwrap();
        assert_eq!(potion.effect.hp_restore, 50);
        assert!(potion.droppable);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(registry_from_str("not json").is_err());
        assert!(registry_from_str(r#"[{"id": "sat:x"}]"#).is_err());
    }
}
