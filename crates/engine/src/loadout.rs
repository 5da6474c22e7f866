//! Per-character equipment loadout.

use satchel_core::{EquipSlot, GearError, ItemDefinition, StatKind};
use std::sync::Arc;

/// Physical equip points: one per canonical slot kind (`MainHand`
/// folds onto `Weapon`, so eleven points back twelve kinds).
const SLOT_COUNT: usize = 11;

/// One item per equipment slot kind.
///
/// Placing and clearing occupants is the loadout's whole job; moving
/// items between a loadout and an inventory is the transaction
/// manager's, and it alone calls these methods.
#[derive(Debug, Clone, Default)]
pub struct Loadout {
    slots: [Option<Arc<ItemDefinition>>; SLOT_COUNT],
}

impl Loadout {
    /// Create an empty loadout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `item` into the slot its definition targets, returning the
    /// previous occupant. The caller is responsible for having
    /// retrieved the occupant's inventory unit beforehand; this method
    /// overwrites unconditionally and touches no inventory.
    pub fn equip(
        &mut self,
        item: &Arc<ItemDefinition>,
    ) -> Result<Option<Arc<ItemDefinition>>, GearError> {
        let Some(slot) = item.equip_slot else {
            return Err(GearError::InvalidArgument("item is not equippable"));
        };
        Ok(self.slots[slot.index()].replace(Arc::clone(item)))
    }

    /// Clear a slot, returning the previous occupant.
    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Arc<ItemDefinition>> {
        self.slots[slot.index()].take()
    }

    /// Occupant of a slot, if any.
    pub fn get(&self, slot: EquipSlot) -> Option<&Arc<ItemDefinition>> {
        self.slots[slot.index()].as_ref()
    }

    /// Sum of one stat's bonuses across every equipped item.
    pub fn stat_bonus(&self, kind: StatKind) -> i32 {
        self.slots
            .iter()
            .flatten()
            .map(|item| item.bonuses.get(kind))
            .sum()
    }

    /// Iterate `(canonical slot, occupant)` pairs in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, Option<&Arc<ItemDefinition>>)> {
        EquipSlot::ALL
            .iter()
            .filter(|slot| slot.canonical() == **slot)
            .map(|slot| (*slot, self.slots[slot.index()].as_ref()))
    }

    /// True when no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }
}
