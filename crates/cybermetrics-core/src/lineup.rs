// Lineup builder: ten field positions, each holding at most one player.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::models::PlayerSummary;

/// A lineup position. Declaration order is the display order on the
/// diamond: outfield, infield, battery, then designated hitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    LeftField,
    CenterField,
    RightField,
    ThirdBase,
    Shortstop,
    SecondBase,
    FirstBase,
    Pitcher,
    Catcher,
    DesignatedHitter,
}

impl Slot {
    pub const ALL: [Slot; 10] = [
        Slot::LeftField,
        Slot::CenterField,
        Slot::RightField,
        Slot::ThirdBase,
        Slot::Shortstop,
        Slot::SecondBase,
        Slot::FirstBase,
        Slot::Pitcher,
        Slot::Catcher,
        Slot::DesignatedHitter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Slot::LeftField => "LF",
            Slot::CenterField => "CF",
            Slot::RightField => "RF",
            Slot::ThirdBase => "3B",
            Slot::Shortstop => "SS",
            Slot::SecondBase => "2B",
            Slot::FirstBase => "1B",
            Slot::Pitcher => "P",
            Slot::Catcher => "C",
            Slot::DesignatedHitter => "DH",
        }
    }

    pub fn from_label(label: &str) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(label.trim()))
    }

    /// The slot after this one in display order, wrapping around.
    pub fn next(self) -> Slot {
        let i = Slot::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Slot::ALL[(i + 1) % Slot::ALL.len()]
    }

    pub fn prev(self) -> Slot {
        let i = Slot::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Slot::ALL[(i + Slot::ALL.len() - 1) % Slot::ALL.len()]
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineupError {
    #[error("Select a position first")]
    NoActiveSlot,

    #[error("{name} is already playing {slot}")]
    AlreadyAssigned { name: String, slot: Slot },
}

#[derive(Debug, Clone)]
pub struct Lineup {
    slots: BTreeMap<Slot, Option<PlayerSummary>>,
    active: Option<Slot>,
}

impl Default for Lineup {
    fn default() -> Self {
        Self::new()
    }
}

impl Lineup {
    pub fn new() -> Self {
        Self {
            slots: Slot::ALL.into_iter().map(|s| (s, None)).collect(),
            active: None,
        }
    }

    pub fn select_slot(&mut self, slot: Slot) {
        self.active = Some(slot);
    }

    pub fn active_slot(&self) -> Option<Slot> {
        self.active
    }

    /// Put `player` into the active slot and return whoever was there.
    pub fn assign(&mut self, player: PlayerSummary) -> Result<Option<PlayerSummary>, LineupError> {
        let target = self.active.ok_or(LineupError::NoActiveSlot)?;
        if let Some(slot) = self.slot_of(player.id) {
            if slot != target {
                return Err(LineupError::AlreadyAssigned {
                    name: player.name,
                    slot,
                });
            }
        }
        Ok(self.slots.insert(target, Some(player)).flatten())
    }

    /// Empty `slot`. Other slots and the active selection are untouched.
    pub fn clear(&mut self, slot: Slot) -> Option<PlayerSummary> {
        self.slots.insert(slot, None).flatten()
    }

    pub fn get(&self, slot: Slot) -> Option<&PlayerSummary> {
        self.slots.get(&slot).and_then(|p| p.as_ref())
    }

    /// All slots in display order with their occupants.
    pub fn slots(&self) -> impl Iterator<Item = (Slot, Option<&PlayerSummary>)> + '_ {
        self.slots.iter().map(|(s, p)| (*s, p.as_ref()))
    }

    pub fn assigned_ids(&self) -> HashSet<u64> {
        self.slots.values().flatten().map(|p| p.id).collect()
    }

    /// A player can be offered as a candidate only while not in any slot.
    pub fn is_assignable(&self, player_id: u64) -> bool {
        self.slot_of(player_id).is_none()
    }

    pub fn filled_count(&self) -> usize {
        self.slots.values().filter(|p| p.is_some()).count()
    }

    fn slot_of(&self, player_id: u64) -> Option<Slot> {
        self.slots
            .iter()
            .find(|(_, p)| p.as_ref().is_some_and(|p| p.id == player_id))
            .map(|(s, _)| *s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
