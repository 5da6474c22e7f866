//! Change notifications emitted after successful mutations.
//!
//! The engine never calls into UI; it pushes events into a queue that
//! subscribers drain once per frame (or whenever they like). Events
//! carry no payload obligations beyond "this facet changed".

/// Observable state-change signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChangeEvent {
    /// Slot contents changed (add, remove, equip, unequip, restore).
    InventoryChanged,
    /// Currency balance changed.
    CurrencyChanged,
    /// Shared or member loadout changed.
    EquipmentChanged,
    /// Carry weight changed.
    WeightChanged {
        /// Weight after the change.
        current: f32,
        /// Configured budget.
        max: f32,
    },
}

/// Drain-queue of pending change events.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<ChangeEvent>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. Consecutive duplicates are collapsed; a frame
    /// that mutates the same facet twice still reports it once.
    pub fn push(&mut self, event: ChangeEvent) {
        if self.pending.last() != Some(&event) {
            self.pending.push(event);
        }
    }

    /// Take every pending event, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
