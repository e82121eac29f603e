//! Submitting predictions: freezing a bracket and locking in goal predictions before kickoff.

use crate::models::{Bracket, BracketError, LiveMatch, Scoreline, SlotIndex};
use chrono::{DateTime, Duration, Utc};
use log::info;
use serde::Serialize;

/// Goal predictions get flagged as closing this long before kickoff.
pub const CLOSING_SOON_MINUTES: i64 = 30;

/// Whether a goal prediction for a match can still be submitted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorelineWindow {
    Open,
    /// Less than 30 minutes to kickoff.
    ClosingSoon,
    /// Kickoff has passed.
    Closed,
}

pub fn scoreline_window(live: &LiveMatch, now: DateTime<Utc>) -> ScorelineWindow {
    let until_kickoff = live.kickoff - now;
    if until_kickoff <= Duration::zero() {
        ScorelineWindow::Closed
    } else if until_kickoff < Duration::minutes(CLOSING_SOON_MINUTES) {
        ScorelineWindow::ClosingSoon
    } else {
        ScorelineWindow::Open
    }
}

/// A bracket can be submitted once every match that is still open has a pick.
pub fn can_submit_bracket(bracket: &Bracket) -> bool {
    !bracket.is_submitted() && bracket.undecided_slots().is_empty()
}

/// Freeze the bracket. No further picks are accepted afterwards.
pub fn submit_bracket(bracket: &mut Bracket) -> Result<(), BracketError> {
    if bracket.is_submitted() {
        return Err(BracketError::AlreadySubmitted);
    }
    let undecided = bracket.undecided_slots();
    if !undecided.is_empty() {
        return Err(BracketError::IncompleteBracket { undecided });
    }
    bracket.mark_submitted();
    info!("Bracket submitted");
    Ok(())
}

/// Store a goal prediction for `slot`. Each match takes one submission, before kickoff.
pub fn submit_scoreline(
    bracket: &mut Bracket,
    slot: SlotIndex,
    score: Scoreline,
    live: &LiveMatch,
    now: DateTime<Utc>,
) -> Result<(), BracketError> {
    let target = bracket.slot_mut(slot)?;
    if target.has_scoreline() || scoreline_window(live, now) == ScorelineWindow::Closed {
        return Err(BracketError::LockedSlot(slot));
    }
    target.predicted_score = Some(score);
    info!("Match {}: goal prediction {}:{} submitted", slot, score.goals_a, score.goals_b);
    Ok(())
}
