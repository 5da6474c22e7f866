//! Party roster: per-character loadouts and the active-character slot.

use crate::loadout::Loadout;

/// One party member and their personal equipment loadout.
#[derive(Debug, Clone)]
pub struct Member {
    /// Display name; unique within a roster.
    pub name: String,
    /// The member's personal loadout, kept mirrored from the shared
    /// loadout while the member is active.
    pub loadout: Loadout,
}

impl Member {
    /// Create a member with an empty loadout.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loadout: Loadout::new(),
        }
    }
}

/// The set of party members, at most one of which is active.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    members: Vec<Member>,
    active: Option<usize>,
}

impl Roster {
    /// Create an empty roster with no active member.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member; the first member added becomes active.
    pub fn add(&mut self, member: Member) {
        self.members.push(member);
        if self.active.is_none() {
            self.active = Some(self.members.len() - 1);
        }
    }

    /// Remove a member by name, returning whether one was removed. The
    /// active slot moves to the first remaining member, or clears.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(index) = self.members.iter().position(|m| m.name == name) else {
            return false;
        };
        self.members.remove(index);
        self.active = match self.active {
            Some(active) if active == index => (!self.members.is_empty()).then_some(0),
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        true
    }

    /// Make the named member active, returning whether it exists.
    pub fn set_active(&mut self, name: &str) -> bool {
        match self.members.iter().position(|m| m.name == name) {
            Some(index) => {
                self.active = Some(index);
                true
            }
            None => false,
        }
    }

    /// The active member, if any.
    pub fn active(&self) -> Option<&Member> {
        self.active.and_then(|i| self.members.get(i))
    }

    /// Mutable access to the active member.
    pub fn active_mut(&mut self) -> Option<&mut Member> {
        self.active.and_then(|i| self.members.get_mut(i))
    }

    /// All members in join order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Mutable member lookup by name.
    pub fn member_mut(&mut self, name: &str) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.name == name)
    }
}
