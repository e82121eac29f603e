//! Bracket (all slots of one player's predictions) and BracketError.

use crate::models::live::LiveFeed;
use crate::models::slot::{BracketSlot, Round, Side, SlotIndex, SlotStatus};
use log::warn;
use serde::{Deserialize, Serialize};

/// Number of matches from the round of 16 to the final.
pub const SLOT_COUNT: usize = 15;

/// Index of the final; the only slot without a next match.
pub const FINAL_SLOT: SlotIndex = 14;

/// Errors that can occur while editing or validating a bracket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// No slot with this index.
    UnknownSlot(SlotIndex),
    /// Choice is neither undecided nor one of the slot's teams.
    InvalidChoice {
        slot: SlotIndex,
        choice: Option<String>,
    },
    /// Bracket already submitted, or the match started without a pick.
    LockedSlot(SlotIndex),
    /// The live feed has no entry for this slot.
    MissingLiveMatch(SlotIndex),
    AlreadySubmitted,
    /// Slots that still need a pick before the bracket can be submitted.
    IncompleteBracket { undecided: Vec<SlotIndex> },
    WrongSlotCount { expected: usize, found: usize },
    /// Next-match pointers of this slot do not form the fixed knockout tree.
    InvalidTopology(SlotIndex),
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::UnknownSlot(slot) => write!(f, "No match with index {}", slot),
            BracketError::InvalidChoice { slot, choice } => match choice {
                Some(team) => write!(f, "{} is not playing in match {}", team, slot),
                None => write!(f, "Invalid choice for match {}", slot),
            },
            BracketError::LockedSlot(slot) => write!(f, "Match {} can no longer be changed", slot),
            BracketError::MissingLiveMatch(slot) => write!(f, "No live data for match {}", slot),
            BracketError::AlreadySubmitted => write!(f, "Bracket was already submitted"),
            BracketError::IncompleteBracket { undecided } => {
                write!(f, "Pick a winner for every match first ({} missing)", undecided.len())
            }
            BracketError::WrongSlotCount { expected, found } => {
                write!(f, "Bracket needs {} matches (found {})", expected, found)
            }
            BracketError::InvalidTopology(slot) => {
                write!(f, "Match {} does not fit the knockout bracket", slot)
            }
        }
    }
}

impl std::error::Error for BracketError {}

/// One player's bracket: 15 slots linked child -> parent via `next_match`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    slots: Vec<BracketSlot>,
    /// Frozen once submitted.
    #[serde(default)]
    submitted: bool,
}

impl Bracket {
    /// Copy the feed's skeleton (teams and links) with every prediction undecided.
    pub fn from_feed(feed: &LiveFeed) -> Result<Self, BracketError> {
        if feed.len() != SLOT_COUNT {
            return Err(BracketError::WrongSlotCount {
                expected: SLOT_COUNT,
                found: feed.len(),
            });
        }
        let slots = (0..SLOT_COUNT)
            .map(|i| {
                let live = feed.get(i).ok_or(BracketError::MissingLiveMatch(i))?;
                Ok(BracketSlot::new(
                    live.team_a.clone(),
                    live.team_b.clone(),
                    live.next_match,
                    live.next_team,
                ))
            })
            .collect::<Result<Vec<_>, BracketError>>()?;
        let bracket = Self {
            slots,
            submitted: false,
        };
        bracket.validate()?;
        Ok(bracket)
    }

    /// Check the fixed shape: 15 slots, links pointing forward into the next round,
    /// the final as the only root, and exactly one child per side for every
    /// non-leaf slot.
    pub fn validate(&self) -> Result<(), BracketError> {
        if self.slots.len() != SLOT_COUNT {
            return Err(BracketError::WrongSlotCount {
                expected: SLOT_COUNT,
                found: self.slots.len(),
            });
        }
        let mut fed = [[false; 2]; SLOT_COUNT];
        for (i, slot) in self.slots.iter().enumerate() {
            match slot.next_match {
                None if i == FINAL_SLOT => {}
                Some(next)
                    if i != FINAL_SLOT
                        && next > i
                        && next < SLOT_COUNT
                        && Round::of(i).next() == Some(Round::of(next)) =>
                {
                    let side = side_index(slot.next_team);
                    if fed[next][side] {
                        return Err(BracketError::InvalidTopology(i));
                    }
                    fed[next][side] = true;
                }
                _ => return Err(BracketError::InvalidTopology(i)),
            }
        }
        for (i, sides) in fed.iter().enumerate() {
            let has_children = Round::of(i) != Round::RoundOf16;
            if sides[0] != has_children || sides[1] != has_children {
                return Err(BracketError::InvalidTopology(i));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[BracketSlot] {
        &self.slots
    }

    pub fn slot(&self, index: SlotIndex) -> Result<&BracketSlot, BracketError> {
        self.slots.get(index).ok_or(BracketError::UnknownSlot(index))
    }

    pub(crate) fn slot_mut(&mut self, index: SlotIndex) -> Result<&mut BracketSlot, BracketError> {
        self.slots.get_mut(index).ok_or(BracketError::UnknownSlot(index))
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [BracketSlot] {
        &mut self.slots
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub(crate) fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    /// Slots whose winners feed into `index`, as [side A, side B]. Both None for leaves.
    pub fn children(&self, index: SlotIndex) -> [Option<SlotIndex>; 2] {
        let mut children = [None, None];
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.next_match == Some(index) {
                children[side_index(slot.next_team)] = Some(i);
            }
        }
        children
    }

    /// Slots still missing a pick that can still be picked (not NOT_VOTED).
    pub fn undecided_slots(&self) -> Vec<SlotIndex> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_decided() && s.status != SlotStatus::NotVoted)
            .map(|(i, _)| i)
            .collect()
    }

    /// Reset predictions that no longer match either team of their slot.
    /// Returns the indices that were reset.
    pub fn heal_predictions(&mut self) -> Vec<SlotIndex> {
        let mut healed = Vec::new();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if !slot.accepts(slot.prediction.as_deref()) {
                warn!(
                    "Match {}: prediction {:?} is not one of its teams, resetting",
                    i, slot.prediction
                );
                slot.prediction = None;
                healed.push(i);
            }
        }
        healed
    }
}

fn side_index(side: Side) -> usize {
    match side {
        Side::A => 0,
        Side::B => 1,
    }
}
