//! Scoring: match status, scoreline points, and recursive bracket points.

use crate::models::{
    country_code, team_label, Bracket, BracketError, BracketSlot, LiveFeed, LiveMatch, SlotIndex,
    SlotStatus,
};
use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;

/// Exact scoreline.
pub const EXACT_SCORE_POINTS: u32 = 5;
/// Right goal margin, wrong scoreline.
pub const GOAL_MARGIN_POINTS: u32 = 4;
/// Right winner only.
pub const WINNER_POINTS: u32 = 3;

/// One line of a player's bracket points breakdown.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PointsRow {
    pub description: String,
    #[serde(rename = "match")]
    pub match_label: String,
    pub points: u32,
}

/// Both point totals for one player plus the bracket breakdown.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PointsReport {
    pub bracket_points: u32,
    pub breakdown: Vec<PointsRow>,
    pub match_points: u32,
    /// Matches without live data; scored as EMPTY.
    pub missing: Vec<SlotIndex>,
}

/// Status of one prediction given the live match at time `now`.
///
/// NOT_VOTED if the match started and no winner was picked; once there is a
/// winner, CORRECT or INCORRECT; EMPTY otherwise.
pub fn classify(slot: &BracketSlot, live: &LiveMatch, now: DateTime<Utc>) -> SlotStatus {
    let done = live.winner.is_some();
    let started = live.has_started(now);
    if started && !slot.is_decided() {
        SlotStatus::NotVoted
    } else if done && slot.prediction == live.winner {
        SlotStatus::Correct
    } else if done {
        SlotStatus::Incorrect
    } else {
        SlotStatus::Empty
    }
}

/// Recompute every slot's status from the feed. Slots without live data become
/// EMPTY and are reported as `MissingLiveMatch`; the rest are still classified.
pub fn refresh_statuses(
    bracket: &mut Bracket,
    feed: &LiveFeed,
    now: DateTime<Utc>,
) -> Vec<BracketError> {
    let mut missing = Vec::new();
    for (index, slot) in bracket.slots_mut().iter_mut().enumerate() {
        slot.status = match feed.get(index) {
            Some(live) => classify(slot, live, now),
            None => {
                warn!("No live data for match {}, leaving it unscored", index);
                missing.push(BracketError::MissingLiveMatch(index));
                SlotStatus::Empty
            }
        };
    }
    missing
}

/// Survival points for a slot: the sum over its two feeding slots, where a slot
/// past the leaves or a NOT_VOTED slot is worth 1. A clean run is worth 2 in the
/// round of 16 and doubles every round up to 16 for the final.
///
/// Reads the statuses stored on the bracket; call [`refresh_statuses`] first.
pub fn bracket_points(bracket: &Bracket, slot: SlotIndex) -> u32 {
    subtree_points(bracket, Some(slot))
}

fn subtree_points(bracket: &Bracket, slot: Option<SlotIndex>) -> u32 {
    let Some(index) = slot else {
        return 1;
    };
    match bracket.slot(index) {
        Ok(current) if current.status != SlotStatus::NotVoted => {
            let [left, right] = bracket.children(index);
            subtree_points(bracket, left) + subtree_points(bracket, right)
        }
        _ => 1,
    }
}

/// Points for a submitted goal prediction once the match is done (0 otherwise).
///
/// 5 for the exact score, 4 for the right goal margin, 3 when both margins have
/// the same non-zero sign. A drawn result only scores through the first two rules.
pub fn match_points(slot: &BracketSlot, live: &LiveMatch) -> u32 {
    let Some(predicted) = slot.predicted_score else {
        return 0;
    };
    if !live.done {
        return 0;
    }
    let (predicted_a, predicted_b) = (i64::from(predicted.goals_a), i64::from(predicted.goals_b));
    let (actual_a, actual_b) = (i64::from(live.goals_a), i64::from(live.goals_b));
    let predicted_margin = predicted_a - predicted_b;
    let actual_margin = actual_a - actual_b;

    if predicted_a == actual_a && predicted_b == actual_b {
        EXACT_SCORE_POINTS
    } else if predicted_margin == actual_margin {
        GOAL_MARGIN_POINTS
    } else if (actual_margin > 0 && predicted_margin > 0) || (actual_margin < 0 && predicted_margin < 0) {
        WINNER_POINTS
    } else {
        0
    }
}

/// Score a player's bracket: statuses are refreshed, every CORRECT slot adds its
/// bracket points (with a breakdown row), and every submitted scoreline adds its
/// match points. The two totals are independent.
pub fn calculate_points(bracket: &mut Bracket, feed: &LiveFeed, now: DateTime<Utc>) -> PointsReport {
    let missing = refresh_statuses(bracket, feed, now)
        .into_iter()
        .filter_map(|e| match e {
            BracketError::MissingLiveMatch(slot) => Some(slot),
            _ => None,
        })
        .collect();

    let mut report = PointsReport {
        missing,
        ..PointsReport::default()
    };
    for (index, slot) in bracket.slots().iter().enumerate() {
        if slot.status == SlotStatus::Correct {
            let points = bracket_points(bracket, index);
            let team = slot.prediction.as_deref();
            report.breakdown.push(PointsRow {
                description: format!(
                    "Correctly predicted {} ({}) win in:",
                    team_label(team),
                    country_code(team)
                ),
                match_label: format!(
                    "{} vs {}",
                    country_code(slot.team_a.as_deref()),
                    country_code(slot.team_b.as_deref())
                ),
                points,
            });
            report.bracket_points += points;
        }
        if slot.has_scoreline() {
            if let Some(live) = feed.get(index) {
                report.match_points += match_points(slot, live);
            }
        }
    }
    report
}
