//! Equipment slot kinds and the slot compatibility rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed attachment point an equippable item targets.
///
/// `Weapon` and `MainHand` are two groupings of the same underlying
/// equip point; [`EquipSlot::accepts`] is the one place that alias is
/// resolved. Call sites must not reimplement the pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    /// Primary weapon.
    Weapon,
    /// General armor.
    Armor,
    /// Head gear.
    Helmet,
    /// Hand gear.
    Gloves,
    /// Foot gear.
    Boots,
    /// Generic accessory.
    Accessory,
    /// Ring.
    Ring,
    /// Amulet.
    Amulet,
    /// Body garment.
    Body,
    /// Shield or focus held in the off hand.
    OffHand,
    /// Bow, gun, or other ranged weapon.
    LongRange,
    /// Alias grouping for the primary weapon point.
    MainHand,
}

impl EquipSlot {
    /// All slot kinds in stable iteration order.
    pub const ALL: [EquipSlot; 12] = [
        EquipSlot::Weapon,
        EquipSlot::Armor,
        EquipSlot::Helmet,
        EquipSlot::Gloves,
        EquipSlot::Boots,
        EquipSlot::Accessory,
        EquipSlot::Ring,
        EquipSlot::Amulet,
        EquipSlot::Body,
        EquipSlot::OffHand,
        EquipSlot::LongRange,
        EquipSlot::MainHand,
    ];

    /// Whether an item targeting `other` may occupy this slot.
    ///
    /// Identical kinds always match; the only non-identity pairing is
    /// `Weapon`/`MainHand`, in either direction.
    pub fn accepts(self, other: EquipSlot) -> bool {
        if self == other {
            return true;
        }
        matches!(
            (self, other),
            (EquipSlot::Weapon, EquipSlot::MainHand) | (EquipSlot::MainHand, EquipSlot::Weapon)
        )
    }

    /// The physical slot a kind resolves to: `MainHand` folds onto
    /// `Weapon`, everything else maps to itself. Loadouts store
    /// occupants under the canonical kind only.
    pub fn canonical(self) -> EquipSlot {
        match self {
            EquipSlot::MainHand => EquipSlot::Weapon,
            other => other,
        }
    }

    /// Dense index for array-backed loadout storage.
    pub fn index(self) -> usize {
        self.canonical() as usize
    }
}

impl fmt::Display for EquipSlot {
    // Matches the serde snake_case form so logs and save files agree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EquipSlot::Weapon => "weapon",
            EquipSlot::Armor => "armor",
            EquipSlot::Helmet => "helmet",
            EquipSlot::Gloves => "gloves",
            EquipSlot::Boots => "boots",
            EquipSlot::Accessory => "accessory",
            EquipSlot::Ring => "ring",
            EquipSlot::Amulet => "amulet",
            EquipSlot::Body => "body",
            EquipSlot::OffHand => "off_hand",
            EquipSlot::LongRange => "long_range",
            EquipSlot::MainHand => "main_hand",
        };
        write!(f, "{name}")
    }
}
