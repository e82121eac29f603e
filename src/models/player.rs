//! PlayerState: one friend's nickname and bracket.

use crate::models::bracket::{Bracket, BracketError};
use crate::models::live::LiveFeed;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in URLs instead of the nickname).
pub type PlayerId = Uuid;

/// A player and their predictions.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub bracket: Bracket,
}

impl PlayerState {
    /// Create a player with an empty bracket copied from the live feed.
    pub fn new(name: impl Into<String>, feed: &LiveFeed) -> Result<Self, BracketError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            bracket: Bracket::from_feed(feed)?,
        })
    }

    /// True if at least one goal prediction was submitted.
    pub fn has_scoreline_predictions(&self) -> bool {
        self.bracket.slots().iter().any(|s| s.has_scoreline())
    }

    /// Players show up on the leaderboard once they submitted anything.
    pub fn is_ranked(&self) -> bool {
        self.bracket.is_submitted() || self.has_scoreline_predictions()
    }
}
