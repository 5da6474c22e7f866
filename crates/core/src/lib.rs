#![warn(missing_docs)]
//! Core item and equipment primitives shared across the workspace.

pub mod error;
pub mod item;
pub mod slot;
pub mod stats;

// Re-export commonly used types
pub use error::GearError;
pub use item::{ConsumableEffect, ItemDefinition, ItemId, Rarity};
pub use slot::EquipSlot;
pub use stats::{StatBonuses, StatKind};
