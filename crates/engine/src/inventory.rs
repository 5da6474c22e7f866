//! Slot-based inventory store.
//!
//! A fixed-size array of slots with stack merging, a carry-weight
//! budget, and bounded currency. Add and remove are atomic: the full
//! requested quantity is verified to fit (or to be present) before any
//! slot is touched, so a failed call never leaves partial state.

use satchel_core::{GearError, ItemDefinition, ItemId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configured limits for an inventory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Number of slots.
    pub capacity: usize,
    /// Carry-weight budget.
    pub max_weight: f32,
    /// Currency ceiling.
    pub max_currency: u32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            capacity: 30,
            max_weight: 100.0,
            max_currency: 999_999,
        }
    }
}

/// Contents of one occupied inventory slot.
///
/// `quantity` is always at least 1; an empty slot is `None`, never a
/// zero-quantity entry. `reserved` marks a unit claimed by an in-flight
/// equip transaction; reserved slots are skipped as stack and removal
/// targets until the transaction commits or rolls back.
#[derive(Debug, Clone)]
pub struct SlotEntry {
    /// Definition of the stacked item.
    pub item: Arc<ItemDefinition>,
    /// Units in the stack (1..=stack_limit).
    pub quantity: u32,
    /// Reservation flag owned by the equip transaction.
    pub reserved: bool,
}

/// Fixed-capacity slot inventory with weight and currency accounting.
#[derive(Debug, Clone)]
pub struct Inventory {
    slots: Vec<Option<SlotEntry>>,
    currency: u32,
    weight: f32,
    max_weight: f32,
    max_currency: u32,
}

impl Inventory {
    /// Create an all-empty inventory with the supplied limits.
    pub fn new(config: InventoryConfig) -> Self {
        Self {
            slots: vec![None; config.capacity],
            currency: 0,
            weight: 0.0,
            max_weight: config.max_weight,
            max_currency: config.max_currency,
        }
    }

    /// Number of slots; fixed for the inventory's lifetime.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Read-only view of every slot.
    pub fn slots(&self) -> &[Option<SlotEntry>] {
        &self.slots
    }

    /// Contents of one slot, `None` when empty or out of range.
    pub fn get(&self, slot: usize) -> Option<&SlotEntry> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Number of empty slots.
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// Number of occupied slots.
    pub fn used_slots(&self) -> usize {
        self.slots.len() - self.empty_slots()
    }

    /// Total units of `id` across all slots, reserved included.
    pub fn count_item(&self, id: &ItemId) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|entry| entry.item.id == *id)
            .map(|entry| entry.quantity)
            .sum()
    }

    /// Whether at least `quantity` units of `id` are held.
    pub fn has_item(&self, id: &ItemId, quantity: u32) -> bool {
        self.count_item(id) >= quantity
    }

    /// Add `quantity` units, filling matching stacks first (lowest
    /// index first), then empty slots.
    ///
    /// Atomic: fails without touching any slot when the weight budget
    /// or the combined stack-plus-empty capacity cannot take the full
    /// quantity. Reserved stacks are never used as merge targets.
    pub fn add_item(&mut self, item: &Arc<ItemDefinition>, quantity: u32) -> Result<(), GearError> {
        if quantity == 0 {
            return Err(GearError::InvalidArgument("quantity must be positive"));
        }

        let added_weight = item.weight * quantity as f32;
        if self.weight + added_weight > self.max_weight {
            return Err(GearError::WeightExceeded {
                id: item.id.clone(),
            });
        }

        if self.fit_for(item) < quantity as u64 {
            return Err(GearError::CapacityExceeded {
                id: item.id.clone(),
                quantity,
            });
        }

        let mut remaining = quantity;

        // First pass: top up existing stacks.
        for entry in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if entry.item.id == item.id && !entry.reserved && entry.quantity < entry.item.stack_limit
            {
                let take = remaining.min(entry.item.stack_limit - entry.quantity);
                entry.quantity += take;
                remaining -= take;
            }
        }

        // Second pass: open new stacks in empty slots.
        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let take = remaining.min(item.stack_limit);
                *slot = Some(SlotEntry {
                    item: Arc::clone(item),
                    quantity: take,
                    reserved: false,
                });
                remaining -= take;
            }
        }

        debug_assert_eq!(remaining, 0, "fit precheck must cover the full quantity");
        self.recompute_weight();
        Ok(())
    }

    /// How many more units of `item` the inventory can take, ignoring
    /// weight: headroom of matching unreserved stacks plus empty-slot
    /// capacity.
    fn fit_for(&self, item: &ItemDefinition) -> u64 {
        let mut fit: u64 = 0;
        for slot in &self.slots {
            match slot {
                None => fit += item.stack_limit as u64,
                Some(entry)
                    if entry.item.id == item.id
                        && !entry.reserved
                        && entry.quantity < entry.item.stack_limit =>
                {
                    fit += (entry.item.stack_limit - entry.quantity) as u64;
                }
                Some(_) => {}
            }
        }
        fit
    }

    /// Remove `quantity` units of `id`, draining the highest-index
    /// matching stack first and clearing stacks that reach zero.
    ///
    /// Atomic: fails without mutation unless the full quantity is held
    /// in unreserved stacks. Callers that already resolved a specific
    /// stack should prefer [`Inventory::remove_from_slot`].
    pub fn remove_item(&mut self, id: &ItemId, quantity: u32) -> Result<(), GearError> {
        if quantity == 0 {
            return Err(GearError::InvalidArgument("quantity must be positive"));
        }

        let available: u32 = self
            .slots
            .iter()
            .flatten()
            .filter(|entry| entry.item.id == *id && !entry.reserved)
            .map(|entry| entry.quantity)
            .sum();
        if available < quantity {
            return Err(GearError::ItemNotAvailable { id: id.clone() });
        }

        let mut remaining = quantity;
        for slot in self.slots.iter_mut().rev() {
            if remaining == 0 {
                break;
            }
            if let Some(entry) = slot {
                if entry.item.id == *id && !entry.reserved {
                    let take = remaining.min(entry.quantity);
                    entry.quantity -= take;
                    remaining -= take;
                    if entry.quantity == 0 {
                        *slot = None;
                    }
                }
            }
        }

        self.recompute_weight();
        Ok(())
    }

    /// Remove `quantity` units from one specific slot.
    ///
    /// The canonical primitive when duplicate stacks make item identity
    /// ambiguous (e.g. the caller knows which stack a drag came from).
    pub fn remove_from_slot(&mut self, slot: usize, quantity: u32) -> Result<(), GearError> {
        if quantity == 0 {
            return Err(GearError::InvalidArgument("quantity must be positive"));
        }
        let Some(stored) = self.slots.get_mut(slot) else {
            return Err(GearError::InvalidArgument("slot index out of range"));
        };
        let Some(entry) = stored else {
            return Err(GearError::InvalidArgument("slot is empty"));
        };
        if entry.reserved {
            return Err(GearError::InvalidArgument("slot is reserved"));
        }
        if entry.quantity < quantity {
            return Err(GearError::ItemNotAvailable {
                id: entry.item.id.clone(),
            });
        }

        entry.quantity -= quantity;
        if entry.quantity == 0 {
            *stored = None;
        }
        self.recompute_weight();
        Ok(())
    }

    /// Reserve one unit of `id` for an in-flight equip transaction.
    ///
    /// Flags the highest-index unreserved matching stack. Returns false
    /// when no such stack exists.
    pub fn mark_reserved(&mut self, id: &ItemId) -> bool {
        for entry in self.slots.iter_mut().rev().flatten() {
            if entry.item.id == *id && !entry.reserved {
                entry.reserved = true;
                return true;
            }
        }
        false
    }

    /// Clear the reservation flag on the matching stack, if any.
    pub fn clear_reserved(&mut self, id: &ItemId) -> bool {
        for entry in self.slots.iter_mut().flatten() {
            if entry.item.id == *id && entry.reserved {
                entry.reserved = false;
                return true;
            }
        }
        false
    }

    /// Consume one unit from the reserved stack of `id`, clearing the
    /// reservation. The physical removal step of an equip transaction.
    /// Returns the slot index the unit left, for positional rollback.
    pub fn take_reserved(&mut self, id: &ItemId) -> Result<usize, GearError> {
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if let Some(entry) = slot {
                if entry.item.id == *id && entry.reserved {
                    entry.reserved = false;
                    entry.quantity -= 1;
                    if entry.quantity == 0 {
                        *slot = None;
                    }
                    self.recompute_weight();
                    return Ok(index);
                }
            }
        }
        Err(GearError::ItemNotAvailable { id: id.clone() })
    }

    /// Undo of [`Inventory::take_reserved`]: return the unit to the
    /// slot it left, re-merging with the surviving stack or re-opening
    /// the emptied slot, so a rolled-back transaction restores the
    /// exact pre-call slot layout.
    pub(crate) fn untake(&mut self, slot: usize, item: &Arc<ItemDefinition>) {
        let fits_back = match self.slots.get(slot) {
            Some(None) => true,
            Some(Some(entry)) => {
                entry.item.id == item.id && !entry.reserved && entry.quantity < entry.item.stack_limit
            }
            None => false,
        };
        if fits_back {
            match &mut self.slots[slot] {
                Some(entry) => entry.quantity += 1,
                stored => {
                    *stored = Some(SlotEntry {
                        item: Arc::clone(item),
                        quantity: 1,
                        reserved: false,
                    });
                }
            }
            self.recompute_weight();
            return;
        }
        // The slot shape changed underneath the transaction; any open
        // spot beats losing the unit.
        if let Err(err) = self.add_item(item, 1) {
            debug_assert!(false, "rollback re-add failed: {err}");
            tracing::error!(id = %item.id, slot, %err, "rollback could not return unit to inventory");
        }
    }

    /// Add a single unit, reporting which slot took it. Same checks
    /// and fill order as [`Inventory::add_item`]; equip-transaction
    /// helper so the displaced occupant can be rolled back from the
    /// exact slot it landed in.
    pub(crate) fn place_one(&mut self, item: &Arc<ItemDefinition>) -> Result<usize, GearError> {
        if self.weight + item.weight > self.max_weight {
            return Err(GearError::WeightExceeded {
                id: item.id.clone(),
            });
        }
        let stack = self.slots.iter().position(|slot| {
            slot.as_ref().is_some_and(|entry| {
                entry.item.id == item.id
                    && !entry.reserved
                    && entry.quantity < entry.item.stack_limit
            })
        });
        let index = match stack.or_else(|| self.slots.iter().position(|slot| slot.is_none())) {
            Some(index) => index,
            None => {
                return Err(GearError::CapacityExceeded {
                    id: item.id.clone(),
                    quantity: 1,
                })
            }
        };
        match &mut self.slots[index] {
            Some(entry) => entry.quantity += 1,
            stored => {
                *stored = Some(SlotEntry {
                    item: Arc::clone(item),
                    quantity: 1,
                    reserved: false,
                });
            }
        }
        self.recompute_weight();
        Ok(index)
    }

    /// Current total carry weight.
    pub fn current_weight(&self) -> f32 {
        self.weight
    }

    /// Carry-weight budget.
    pub fn max_weight(&self) -> f32 {
        self.max_weight
    }

    /// Whether `delta` more weight fits the budget (`==` is within).
    pub fn can_carry(&self, delta: f32) -> bool {
        self.weight + delta <= self.max_weight
    }

    /// Full rescan of slot contents; the weight field is a cache only.
    fn recompute_weight(&mut self) {
        self.weight = self
            .slots
            .iter()
            .flatten()
            .map(|entry| entry.item.weight * entry.quantity as f32)
            .sum();
    }

    /// Current currency.
    pub fn currency(&self) -> u32 {
        self.currency
    }

    /// Whether at least `amount` currency is held.
    pub fn has_currency(&self, amount: u32) -> bool {
        self.currency >= amount
    }

    /// Add currency, clamped at the ceiling. Reports whether the
    /// balance changed.
    pub fn add_currency(&mut self, amount: u32) -> bool {
        let next = self.currency.saturating_add(amount).min(self.max_currency);
        let changed = next != self.currency;
        self.currency = next;
        changed
    }

    /// Remove currency, clamped at zero. Reports whether the balance
    /// changed.
    pub fn remove_currency(&mut self, amount: u32) -> bool {
        let next = self.currency.saturating_sub(amount);
        let changed = next != self.currency;
        self.currency = next;
        changed
    }

    /// Re-initialize to all-empty slots with new limits. Restore path
    /// only; ordinary play never resizes an inventory.
    pub(crate) fn reinitialize(&mut self, capacity: usize, max_weight: f32) {
        self.slots = vec![None; capacity];
        self.currency = 0;
        self.weight = 0.0;
        self.max_weight = max_weight;
    }

    /// Place a restored stack at its saved index, falling back to the
    /// ordinary fill when the index is taken or out of range.
    pub(crate) fn restore_entry(
        &mut self,
        slot: usize,
        item: &Arc<ItemDefinition>,
        quantity: u32,
    ) -> Result<(), GearError> {
        let quantity = quantity.min(item.stack_limit);
        match self.slots.get_mut(slot) {
            Some(stored @ None) => {
                *stored = Some(SlotEntry {
                    item: Arc::clone(item),
                    quantity,
                    reserved: false,
                });
                self.recompute_weight();
                Ok(())
            }
            _ => self.add_item(item, quantity),
        }
    }

    /// Restore the currency balance verbatim, clamped to the ceiling.
    pub(crate) fn restore_currency(&mut self, amount: u32) {
        self.currency = amount.min(self.max_currency);
    }
}
