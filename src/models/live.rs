//! Live match results as published by the tournament feed (read-only).

use crate::models::slot::{Side, SlotIndex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Live state of one match slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LiveMatch {
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    pub goals_a: u32,
    pub goals_b: u32,
    /// None until the match has a winner ("NONE" in the feed).
    pub winner: Option<String>,
    pub kickoff: DateTime<Utc>,
    pub done: bool,
    /// Bracket skeleton: where this match's winner goes.
    pub next_match: Option<SlotIndex>,
    pub next_team: Side,
}

impl LiveMatch {
    /// A scheduled match with no result yet.
    pub fn scheduled(
        team_a: Option<String>,
        team_b: Option<String>,
        kickoff: DateTime<Utc>,
        next_match: Option<SlotIndex>,
        next_team: Side,
    ) -> Self {
        Self {
            team_a,
            team_b,
            goals_a: 0,
            goals_b: 0,
            winner: None,
            kickoff,
            done: false,
            next_match,
            next_team,
        }
    }

    /// Record a final result. The winner is given explicitly since a draw can go to penalties.
    pub fn finish(&mut self, goals_a: u32, goals_b: u32, winner: Side) {
        self.goals_a = goals_a;
        self.goals_b = goals_b;
        self.winner = match winner {
            Side::A => self.team_a.clone(),
            Side::B => self.team_b.clone(),
        };
        self.done = true;
    }

    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.kickoff < now
    }
}

/// All live matches keyed by slot index; indices align with the bracket's.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LiveFeed {
    pub matches: BTreeMap<SlotIndex, LiveMatch>,
}

impl LiveFeed {
    pub fn new(matches: BTreeMap<SlotIndex, LiveMatch>) -> Self {
        Self { matches }
    }

    pub fn get(&self, slot: SlotIndex) -> Option<&LiveMatch> {
        self.matches.get(&slot)
    }

    pub fn get_mut(&mut self, slot: SlotIndex) -> Option<&mut LiveMatch> {
        self.matches.get_mut(&slot)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl FromIterator<(SlotIndex, LiveMatch)> for LiveFeed {
    fn from_iter<I: IntoIterator<Item = (SlotIndex, LiveMatch)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
