//! Loadout synchronization.
//!
//! The shared loadout tracks the party-wide carried-equipment view; the
//! active member carries a personal copy. Both directions here are
//! idempotent, and the reconcile direction reports every corrected slot
//! so callers can decide whether to persist.

use crate::loadout::Loadout;
use satchel_core::EquipSlot;
use std::sync::Arc;

/// Force `member` to match `shared`, slot by slot.
///
/// A full overwrite (clear then set), not a diff, so convergence holds
/// even after missed updates. Run after every successful shared-path
/// equip or unequip and after every restore.
pub fn mirror_to_member(shared: &Loadout, member: &mut Loadout) {
    for slot in physical_slots() {
        member.unequip(slot);
        if let Some(item) = shared.get(slot) {
            // Occupants came through the shared loadout, so their kind
            // is already valid for this slot.
            let _ = member.equip(&Arc::clone(item));
        }
    }
}

/// Copy every slot where `member` disagrees with `shared` back into
/// `shared`, the member's value winning. Returns the number of
/// corrected slots; each correction is logged.
///
/// Run on demand when a member's personal loadout may have been mutated
/// outside the shared path.
pub fn reconcile_from_member(member: &Loadout, shared: &mut Loadout) -> usize {
    let mut corrected = 0;
    for slot in physical_slots() {
        let member_id = member.get(slot).map(|item| &item.id);
        let shared_id = shared.get(slot).map(|item| &item.id);
        if member_id == shared_id {
            continue;
        }

        tracing::warn!(
            slot = %slot,
            from = %shared_id.map(|id| id.to_string()).unwrap_or_else(|| "empty".into()),
            to = %member_id.map(|id| id.to_string()).unwrap_or_else(|| "empty".into()),
            "shared loadout diverged from member; correcting"
        );
        shared.unequip(slot);
        if let Some(item) = member.get(slot) {
            let _ = shared.equip(&Arc::clone(item));
        }
        corrected += 1;
    }
    corrected
}

/// Canonical slot kinds, each physical equip point once.
fn physical_slots() -> impl Iterator<Item = EquipSlot> {
    EquipSlot::ALL
        .into_iter()
        .filter(|slot| slot.canonical() == *slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchel_core::{ItemDefinition, StatBonuses};

    fn gear(id: &str, slot: EquipSlot) -> Arc<ItemDefinition> {
        Arc::new(ItemDefinition::gear(
            id,
            id,
            1.0,
            slot,
            StatBonuses::default(),
        ))
    }

    #[test]
    fn mirror_overwrites_stale_member_slots() {
        let mut shared = Loadout::new();
        shared.equip(&gear("sat:sword", EquipSlot::Weapon)).unwrap();

        let mut member = Loadout::new();
        member.equip(&gear("sat:old_helm", EquipSlot::Helmet)).unwrap();
        member.equip(&gear("sat:old_sword", EquipSlot::Weapon)).unwrap();

        mirror_to_member(&shared, &mut member);

        assert_eq!(
            member.get(EquipSlot::Weapon).unwrap().id.to_string(),
            "sat:sword"
        );
        assert!(member.get(EquipSlot::Helmet).is_none());
    }

    #[test]
    fn mirror_is_idempotent() {
        let mut shared = Loadout::new();
        shared.equip(&gear("sat:ring", EquipSlot::Ring)).unwrap();

        let mut member = Loadout::new();
        mirror_to_member(&shared, &mut member);
        mirror_to_member(&shared, &mut member);

        assert_eq!(
            member.get(EquipSlot::Ring).unwrap().id.to_string(),
            "sat:ring"
        );
        assert!(member.get(EquipSlot::Weapon).is_none());
    }

    #[test]
    fn reconcile_counts_corrections_and_member_wins() {
        let mut shared = Loadout::new();
        shared.equip(&gear("sat:sword", EquipSlot::Weapon)).unwrap();
        shared.equip(&gear("sat:helm", EquipSlot::Helmet)).unwrap();

        let mut member = Loadout::new();
        member.equip(&gear("sat:axe", EquipSlot::Weapon)).unwrap();
        member.equip(&gear("sat:helm", EquipSlot::Helmet)).unwrap();
        member.equip(&gear("sat:ring", EquipSlot::Ring)).unwrap();

        // Weapon differs, helmet matches, ring missing from shared,
        // and shared has nothing the member lacks.
        let corrected = reconcile_from_member(&member, &mut shared);
        assert_eq!(corrected, 2);
        assert_eq!(
            shared.get(EquipSlot::Weapon).unwrap().id.to_string(),
            "sat:axe"
        );
        assert_eq!(
            shared.get(EquipSlot::Ring).unwrap().id.to_string(),
            "sat:ring"
        );

        // Converged: a second pass corrects nothing.
        assert_eq!(reconcile_from_member(&member, &mut shared), 0);
    }

    #[test]
    fn reconcile_clears_slots_the_member_emptied() {
        let mut shared = Loadout::new();
        shared.equip(&gear("sat:boots", EquipSlot::Boots)).unwrap();

        let member = Loadout::new();
        let corrected = reconcile_from_member(&member, &mut shared);
        assert_eq!(corrected, 1);
        assert!(shared.get(EquipSlot::Boots).is_none());
    }
}
