//! BracketSlot (one predicted match), its status, and the round it belongs to.

use serde::{Deserialize, Serialize};

/// Position of a match in the bracket (0..15).
pub type SlotIndex = usize;

/// Text used by feeds and exports for a team that is not known yet.
pub const NOT_DECIDED: &str = "Not Decided";

/// Which team field of the next match a winner fills.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Side {
    #[default]
    #[serde(rename = "TeamA")]
    A,
    #[serde(rename = "TeamB")]
    B,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::A => "TeamA",
            Side::B => "TeamB",
        }
    }
}

/// Round of the tournament, derived from the slot index.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    Final,
}

impl Round {
    /// 0..8 round of 16, 8..12 quarterfinals, 12..14 semifinals, 14 final.
    pub fn of(slot: SlotIndex) -> Self {
        match slot {
            0..=7 => Round::RoundOf16,
            8..=11 => Round::QuarterFinal,
            12..=13 => Round::SemiFinal,
            _ => Round::Final,
        }
    }

    /// Round the winners of this round play in; None for the final.
    pub fn next(self) -> Option<Self> {
        match self {
            Round::RoundOf16 => Some(Round::QuarterFinal),
            Round::QuarterFinal => Some(Round::SemiFinal),
            Round::SemiFinal => Some(Round::Final),
            Round::Final => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Round::RoundOf16 => "Round of 16",
            Round::QuarterFinal => "Quarterfinal",
            Round::SemiFinal => "Semifinal",
            Round::Final => "Final",
        }
    }
}

/// Outcome of a prediction against the live result. Always derived, never edited.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    /// Nothing to judge yet.
    #[default]
    Empty,
    /// Game started and no winner was picked.
    NotVoted,
    Correct,
    Incorrect,
}

impl SlotStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SlotStatus::Empty => "EMPTY",
            SlotStatus::NotVoted => "NOT_VOTED",
            SlotStatus::Correct => "CORRECT",
            SlotStatus::Incorrect => "INCORRECT",
        }
    }
}

/// A submitted goal prediction for one match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Scoreline {
    pub goals_a: u32,
    pub goals_b: u32,
}

impl Scoreline {
    pub fn new(goals_a: u32, goals_b: u32) -> Self {
        Self { goals_a, goals_b }
    }
}

/// One match position in a player's bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketSlot {
    /// None while undecided (filled by propagation for later rounds).
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    /// Predicted winner; None if not picked.
    pub prediction: Option<String>,
    /// Match the winner advances to; None for the final.
    pub next_match: Option<SlotIndex>,
    /// Team field of `next_match` the winner fills.
    pub next_team: Side,
    #[serde(default)]
    pub status: SlotStatus,
    /// Some once a goal prediction has been submitted.
    #[serde(default)]
    pub predicted_score: Option<Scoreline>,
}

impl BracketSlot {
    pub fn new(
        team_a: Option<String>,
        team_b: Option<String>,
        next_match: Option<SlotIndex>,
        next_team: Side,
    ) -> Self {
        Self {
            team_a,
            team_b,
            prediction: None,
            next_match,
            next_team,
            status: SlotStatus::Empty,
            predicted_score: None,
        }
    }

    pub fn team(&self, side: Side) -> Option<&str> {
        match side {
            Side::A => self.team_a.as_deref(),
            Side::B => self.team_b.as_deref(),
        }
    }

    pub fn set_team(&mut self, side: Side, team: Option<String>) {
        match side {
            Side::A => self.team_a = team,
            Side::B => self.team_b = team,
        }
    }

    /// Next match and the side this slot's winner fills there.
    pub fn forward_edge(&self) -> Option<(SlotIndex, Side)> {
        self.next_match.map(|next| (next, self.next_team))
    }

    /// True if `choice` is undecided or one of this slot's (known) teams.
    pub fn accepts(&self, choice: Option<&str>) -> bool {
        match choice {
            None => true,
            Some(team) => self.team_a.as_deref() == Some(team) || self.team_b.as_deref() == Some(team),
        }
    }

    pub fn is_decided(&self) -> bool {
        self.prediction.is_some()
    }

    pub fn has_scoreline(&self) -> bool {
        self.predicted_score.is_some()
    }
}

/// Map feed/export text to a team: "Not Decided" and blanks are undecided.
pub fn parse_team(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() || text == NOT_DECIDED {
        None
    } else {
        Some(text.to_string())
    }
}

/// Inverse of [`parse_team`] for display and export.
pub fn team_label(team: Option<&str>) -> &str {
    team.unwrap_or(NOT_DECIDED)
}
