//! Stat kinds and the bonus block carried by equippable items.

use serde::{Deserialize, Serialize};

/// Combat stat a piece of equipment can modify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    /// Physical attack.
    Attack,
    /// Physical defense.
    Defense,
    /// Magic attack.
    MagicAttack,
    /// Magic defense.
    MagicDefense,
    /// Turn order / evasion speed.
    Speed,
}

impl StatKind {
    /// All stat kinds in stable iteration order.
    pub const ALL: [StatKind; 5] = [
        StatKind::Attack,
        StatKind::Defense,
        StatKind::MagicAttack,
        StatKind::MagicDefense,
        StatKind::Speed,
    ];
}

/// Flat stat bonuses granted while an item is equipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBonuses {
    /// Physical attack bonus.
    #[serde(default)]
    pub attack: i32,
    /// Physical defense bonus.
    #[serde(default)]
    pub defense: i32,
    /// Magic attack bonus.
    #[serde(default)]
    pub magic_attack: i32,
    /// Magic defense bonus.
    #[serde(default)]
    pub magic_defense: i32,
    /// Speed bonus.
    #[serde(default)]
    pub speed: i32,
}

impl StatBonuses {
    /// Bonus for a single stat kind.
    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::MagicAttack => self.magic_attack,
            StatKind::MagicDefense => self.magic_defense,
            StatKind::Speed => self.speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_maps_every_kind() {
        let bonuses = StatBonuses {
            attack: 1,
            defense: 2,
            magic_attack: 3,
            magic_defense: 4,
            speed: 5,
        };
        let values: Vec<i32> = StatKind::ALL.iter().map(|k| bonuses.get(*k)).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn default_is_all_zero() {
        let bonuses = StatBonuses::default();
        for kind in StatKind::ALL {
            assert_eq!(bonuses.get(kind), 0);
        }
    }
}
