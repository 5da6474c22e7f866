//! The gear system: public facade and equip/unequip transactions.
//!
//! Owns the inventory, the shared loadout, the party roster, and the
//! event queue. UI and combat call this surface only; loadout slots are
//! written here and in the sync module, inventory slots only by the
//! inventory's own methods. `&mut self` on every mutator makes each
//! transaction a critical section by construction.

use crate::events::{ChangeEvent, EventQueue};
use crate::inventory::{Inventory, InventoryConfig};
use crate::loadout::Loadout;
use crate::registry::ItemRegistry;
use crate::roster::Roster;
use crate::sync::{mirror_to_member, reconcile_from_member};
use satchel_core::{EquipSlot, GearError, ItemDefinition, ItemId, StatKind};
use std::sync::Arc;

/// Inventory, shared equipment loadout, and party roster under one
/// transactional surface.
#[derive(Debug)]
pub struct GearSystem {
    registry: Arc<ItemRegistry>,
    inventory: Inventory,
    shared: Loadout,
    roster: Roster,
    events: EventQueue,
}

impl GearSystem {
    /// Create a system with an empty inventory and empty loadouts.
    pub fn new(registry: Arc<ItemRegistry>, config: InventoryConfig) -> Self {
        Self {
            registry,
            inventory: Inventory::new(config),
            shared: Loadout::new(),
            roster: Roster::new(),
            events: EventQueue::new(),
        }
    }

    /// The registry definitions are resolved through.
    pub fn registry(&self) -> &Arc<ItemRegistry> {
        &self.registry
    }

    /// Read-only inventory access.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// The shared (party-wide) loadout.
    pub fn shared_loadout(&self) -> &Loadout {
        &self.shared
    }

    /// Read-only roster access.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Mutable roster access, for membership changes and for
    /// subsystems that own member gear directly. After mutating a
    /// member's loadout outside [`GearSystem::equip`] /
    /// [`GearSystem::unequip`], call [`GearSystem::reconcile_active`]
    /// so the shared view converges.
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    /// Make the named member active and adopt their personal loadout
    /// into the shared view (member wins on divergence).
    pub fn set_active(&mut self, name: &str) -> bool {
        if !self.roster.set_active(name) {
            return false;
        }
        self.reconcile_active();
        true
    }

    // ---- inventory surface -------------------------------------------------

    /// Add `quantity` units of `id`. See [`Inventory::add_item`] for
    /// the atomicity contract.
    pub fn add_item(&mut self, id: &ItemId, quantity: u32) -> Result<(), GearError> {
        let item = self.resolve(id)?;
        self.inventory.add_item(&item, quantity)?;
        self.note_inventory_changed();
        Ok(())
    }

    /// Remove `quantity` units of `id`, highest-index stack first.
    pub fn remove_item(&mut self, id: &ItemId, quantity: u32) -> Result<(), GearError> {
        self.inventory.remove_item(id, quantity)?;
        self.note_inventory_changed();
        Ok(())
    }

    /// Remove `quantity` units from one specific slot.
    pub fn remove_from_slot(&mut self, slot: usize, quantity: u32) -> Result<(), GearError> {
        self.inventory.remove_from_slot(slot, quantity)?;
        self.note_inventory_changed();
        Ok(())
    }

    /// Whether at least `quantity` units of `id` are carried.
    pub fn has_item(&self, id: &ItemId, quantity: u32) -> bool {
        self.inventory.has_item(id, quantity)
    }

    /// Total carried units of `id`.
    pub fn count_item(&self, id: &ItemId) -> u32 {
        self.inventory.count_item(id)
    }

    /// Add currency; emits an event when the balance moved.
    pub fn add_currency(&mut self, amount: u32) -> bool {
        let changed = self.inventory.add_currency(amount);
        if changed {
            self.events.push(ChangeEvent::CurrencyChanged);
        }
        changed
    }

    /// Remove currency; emits an event when the balance moved.
    pub fn remove_currency(&mut self, amount: u32) -> bool {
        let changed = self.inventory.remove_currency(amount);
        if changed {
            self.events.push(ChangeEvent::CurrencyChanged);
        }
        changed
    }

    // ---- equipment surface -------------------------------------------------

    /// Occupant of a shared loadout slot.
    pub fn equipped(&self, slot: EquipSlot) -> Option<&Arc<ItemDefinition>> {
        self.shared.get(slot)
    }

    /// Summed equipment bonus for one stat across the shared loadout.
    pub fn equipment_bonus(&self, kind: StatKind) -> i32 {
        self.shared.stat_bonus(kind)
    }

    /// Equip one carried unit of `id` into its slot on the shared
    /// loadout, displacing (and returning to inventory) any different
    /// occupant.
    ///
    /// Atomic: every failure leaves inventory and loadouts exactly as
    /// they were. Re-equipping the current occupant is a no-op success.
    pub fn equip(&mut self, id: &ItemId) -> Result<(), GearError> {
        let item = self.resolve(id)?;
        let Some(slot) = item.equip_slot else {
            return Err(GearError::InvalidArgument("item is not equippable"));
        };
        let slot = slot.canonical();

        // Idempotent re-equip.
        if self.shared.get(slot).is_some_and(|worn| worn.id == item.id) {
            return Ok(());
        }

        if !self.inventory.has_item(id, 1) {
            return Err(GearError::ItemNotAvailable { id: id.clone() });
        }

        // Reserve, then physically remove the unit, remembering which
        // slot it left so rollback can put it back in place. A failure
        // here has mutated nothing beyond the reservation flag, which
        // is cleared.
        if !self.inventory.mark_reserved(id) {
            return Err(GearError::ItemNotAvailable { id: id.clone() });
        }
        let origin = match self.inventory.take_reserved(id) {
            Ok(origin) => origin,
            Err(err) => {
                self.inventory.clear_reserved(id);
                return Err(err);
            }
        };

        // Displace the current occupant back into the inventory. If it
        // does not fit (capacity is independent of weight), restore
        // both sides and abort.
        let displaced = self.shared.unequip(slot);
        let mut displaced_at = None;
        if let Some(prev) = &displaced {
            match self.inventory.place_one(prev) {
                Ok(index) => displaced_at = Some(index),
                Err(_) => {
                    let _ = self.shared.equip(prev);
                    self.inventory.untake(origin, &item);
                    return Err(GearError::NoSpaceForDisplaced {
                        id: prev.id.clone(),
                    });
                }
            }
        }

        // Commit, then re-read the slot to verify. The verification
        // cannot fail while transactions stay non-reentrant; a mismatch
        // means some other code wrote the loadout.
        let _ = self.shared.equip(&item)?;
        let verified = self.shared.get(slot).is_some_and(|worn| worn.id == item.id);
        if !verified {
            tracing::error!(slot = %slot, id = %item.id, "loadout verification failed; rolling back");
            self.shared.unequip(slot);
            if let (Some(prev), Some(index)) = (&displaced, displaced_at) {
                let _ = self.inventory.remove_from_slot(index, 1);
                let _ = self.shared.equip(prev);
            }
            self.inventory.untake(origin, &item);
            return Err(GearError::VerificationFailed { slot });
        }

        self.finish_equipment_change();
        Ok(())
    }

    /// Remove the occupant of `slot` from the shared loadout and return
    /// it to the inventory.
    ///
    /// Atomic: if the item cannot return (weight budget or capacity),
    /// the loadout keeps it and nothing changes.
    pub fn unequip(&mut self, slot: EquipSlot) -> Result<Arc<ItemDefinition>, GearError> {
        let slot = slot.canonical();
        let Some(item) = self.shared.get(slot).cloned() else {
            return Err(GearError::SlotEmpty(slot));
        };

        if !self.inventory.can_carry(item.weight) {
            return Err(GearError::WeightExceeded {
                id: item.id.clone(),
            });
        }

        self.shared.unequip(slot);
        if let Err(err) = self.inventory.add_item(&item, 1) {
            // Capacity is checked independently of weight, so the
            // pre-check above does not cover this path.
            let _ = self.shared.equip(&item);
            return Err(err);
        }

        self.finish_equipment_change();
        Ok(item)
    }

    /// Copy the active member's personal loadout over the shared view
    /// wherever they disagree (member wins). Returns the number of
    /// corrected slots.
    pub fn reconcile_active(&mut self) -> usize {
        let Some(member) = self.roster.active() else {
            return 0;
        };
        let corrected = reconcile_from_member(&member.loadout, &mut self.shared);
        if corrected > 0 {
            self.events.push(ChangeEvent::EquipmentChanged);
        }
        corrected
    }

    // ---- events ------------------------------------------------------------

    /// Take every pending change event.
    pub fn drain_events(&mut self) -> Vec<ChangeEvent> {
        self.events.drain()
    }

    // ---- internals ---------------------------------------------------------

    fn resolve(&self, id: &ItemId) -> Result<Arc<ItemDefinition>, GearError> {
        self.registry
            .resolve(id)
            .ok_or_else(|| GearError::ItemUnresolvable(id.clone()))
    }

    /// Mirror shared -> active member and emit the equipment events.
    fn finish_equipment_change(&mut self) {
        if let Some(member) = self.roster.active_mut() {
            mirror_to_member(&self.shared, &mut member.loadout);
        }
        self.note_inventory_changed();
        self.events.push(ChangeEvent::EquipmentChanged);
    }

    fn note_inventory_changed(&mut self) {
        self.events.push(ChangeEvent::InventoryChanged);
        self.events.push(ChangeEvent::WeightChanged {
            current: self.inventory.current_weight(),
            max: self.inventory.max_weight(),
        });
    }

    /// Restore path: swap in rebuilt state wholesale. Persist module
    /// only.
    pub(crate) fn parts_mut(&mut self) -> (&Arc<ItemRegistry>, &mut Inventory, &mut Loadout) {
        (&self.registry, &mut self.inventory, &mut self.shared)
    }

    /// Restore path: mirror and signal once the snapshot is applied.
    pub(crate) fn after_restore(&mut self) {
        if let Some(member) = self.roster.active_mut() {
            mirror_to_member(&self.shared, &mut member.loadout);
        }
        self.note_inventory_changed();
        self.events.push(ChangeEvent::EquipmentChanged);
        self.events.push(ChangeEvent::CurrencyChanged);
    }
}
