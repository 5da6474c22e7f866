//! Item identifiers and immutable item definitions.
//!
//! Item ids are stable string identifiers used for authoring and
//! persistence (e.g., `sat:iron_sword`). They are ordered and validated
//! to support deterministic iteration and stable save files.

use crate::slot::EquipSlot;
use crate::stats::StatBonuses;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default namespace used when an id omits an explicit namespace.
pub const DEFAULT_NAMESPACE: &str = "sat";

/// Error returned when parsing an invalid [`ItemId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ItemIdError {
    message: String,
}

impl ItemIdError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A namespaced item id of the form `namespace:path`.
///
/// Ordering is lexical by `(namespace, path)` and is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId {
    namespace: String,
    path: String,
}

impl ItemId {
    /// Parse an item id.
    ///
    /// Accepts either:
    /// - `namespace:path`
    /// - `path` (uses [`DEFAULT_NAMESPACE`])
    pub fn parse(input: &str) -> Result<Self, ItemIdError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ItemIdError::new("ItemId cannot be empty"));
        }

        let (namespace, path) = match input.split_once(':') {
            Some((ns, p)) => (ns, p),
            None => (DEFAULT_NAMESPACE, input),
        };

        let namespace = namespace.trim();
        let path = path.trim();

        validate_namespace(namespace)?;
        validate_path(path)?;

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Item id namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Item id path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ItemId {
    type Err = ItemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = ItemIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.to_string()
    }
}

fn validate_namespace(ns: &str) -> Result<(), ItemIdError> {
    if ns.is_empty() {
        return Err(ItemIdError::new("ItemId namespace cannot be empty"));
    }
    if ns.len() > 64 {
        return Err(ItemIdError::new("ItemId namespace too long (max 64)"));
    }
    if !ns
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'))
    {
        return Err(ItemIdError::new(
            "ItemId namespace has invalid characters (allowed: a-z0-9_.-)",
        ));
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<(), ItemIdError> {
    if path.is_empty() {
        return Err(ItemIdError::new("ItemId path cannot be empty"));
    }
    if path.len() > 128 {
        return Err(ItemIdError::new("ItemId path too long (max 128)"));
    }
    if !path
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'))
    {
        return Err(ItemIdError::new(
            "ItemId path has invalid characters (allowed: a-z0-9_./-)",
        ));
    }
    Ok(())
}

/// Rarity tier used for display ordering and loot tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Everyday items.
    #[default]
    Common,
    /// Slightly better than common.
    Uncommon,
    /// Hard to find.
    Rare,
    /// Very hard to find.
    Epic,
    /// Unique or near-unique.
    Legendary,
}

/// Effects applied when a consumable item is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableEffect {
    /// Hit points restored on use.
    #[serde(default)]
    pub hp_restore: u32,
    /// Magic points restored on use.
    #[serde(default)]
    pub mp_restore: u32,
    /// Whether the item revives a downed character.
    #[serde(default)]
    pub revive: bool,
    /// Whether the item cures status ailments.
    #[serde(default)]
    pub cure_status: bool,
}

impl ConsumableEffect {
    /// True if using the item has any effect at all.
    pub fn is_some(&self) -> bool {
        self.hp_restore > 0 || self.mp_restore > 0 || self.revive || self.cure_status
    }
}

/// Immutable item metadata owned by the registry.
///
/// Definitions are loaded once at startup and never mutated; the engine
/// shares them as `Arc<ItemDefinition>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Stable identifier (e.g., `sat:iron_sword`).
    pub id: ItemId,
    /// Human-readable display name.
    pub name: String,
    /// Maximum units per inventory slot (>= 1).
    pub stack_limit: u32,
    /// Carry weight per unit (>= 0).
    pub weight: f32,
    /// Equipment slot this item attaches to (`None` = not equippable).
    pub equip_slot: Option<EquipSlot>,
    /// Stat bonuses granted while equipped.
    #[serde(default)]
    pub bonuses: StatBonuses,
    /// Consumable effects, if any.
    #[serde(default)]
    pub effect: ConsumableEffect,
    /// Whether the player may drop or discard the item.
    #[serde(default = "default_droppable")]
    pub droppable: bool,
    /// Rarity tier.
    #[serde(default)]
    pub rarity: Rarity,
}

fn default_droppable() -> bool {
    true
}

impl ItemDefinition {
    /// Construct a minimal non-equippable definition. Helper for tests
    /// and in-code default packs.
    pub fn simple(id: &str, name: &str, stack_limit: u32, weight: f32) -> Self {
        Self {
            id: ItemId::parse(id).unwrap_or_else(|e| panic!("bad item id {id:?}: {e}")),
            name: name.to_string(),
            stack_limit: stack_limit.max(1),
            weight: weight.max(0.0),
            equip_slot: None,
            bonuses: StatBonuses::default(),
            effect: ConsumableEffect::default(),
            droppable: true,
            rarity: Rarity::Common,
        }
    }

    /// Construct an equippable definition targeting `slot`.
    pub fn gear(id: &str, name: &str, weight: f32, slot: EquipSlot, bonuses: StatBonuses) -> Self {
        Self {
            equip_slot: Some(slot),
            bonuses,
            ..Self::simple(id, name, 1, weight)
        }
    }

    /// Whether the item can be worn in an equipment slot.
    pub fn is_equippable(&self) -> bool {
        self.equip_slot.is_some()
    }
}
