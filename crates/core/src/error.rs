//! Error taxonomy for inventory and equipment operations.
//!
//! Every variant is an expected, locally recovered condition: public
//! operations report failure through `Result` and leave state exactly
//! as it was before the call. [`GearError::VerificationFailed`] is the
//! one variant that also gets surfaced loudly, since it indicates a
//! broken invariant elsewhere.

use crate::item::ItemId;
use crate::slot::EquipSlot;
use thiserror::Error;

/// Failure modes of inventory and equipment operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GearError {
    /// Null-equivalent item, zero quantity, out-of-range slot index,
    /// or an item used where it cannot apply.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// No empty slot or matching stack headroom for the full quantity.
    #[error("inventory cannot hold {quantity} more of {id}")]
    CapacityExceeded {
        /// Item that did not fit.
        id: ItemId,
        /// Requested quantity.
        quantity: u32,
    },

    /// Adding the item would exceed the carry-weight budget.
    #[error("carrying {id} would exceed the weight budget")]
    WeightExceeded {
        /// Item that would push weight over budget.
        id: ItemId,
    },

    /// The inventory does not hold the requested quantity.
    #[error("item {id} not available in the requested quantity")]
    ItemNotAvailable {
        /// Missing item.
        id: ItemId,
    },

    /// Unequip requested on an empty loadout slot.
    #[error("equipment slot {0} is empty")]
    SlotEmpty(EquipSlot),

    /// The displaced occupant of an equip swap could not return to the
    /// inventory; the transaction was rolled back.
    #[error("no inventory space for the displaced {id}")]
    NoSpaceForDisplaced {
        /// Occupant that could not be returned.
        id: ItemId,
    },

    /// Post-commit re-read did not match the item just placed. The
    /// transaction was rolled back; the mismatch points at a logic or
    /// reentrancy defect elsewhere.
    #[error("loadout slot {slot} verification failed after equip")]
    VerificationFailed {
        /// Slot that failed verification.
        slot: EquipSlot,
    },

    /// A persisted id no longer resolves through the registry. The
    /// entry is skipped during restore, never fatal.
    #[error("item id {0} does not resolve")]
    ItemUnresolvable(ItemId),
}
