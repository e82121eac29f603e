//! Leaderboard across players and the per-player goal prediction table.

use crate::logic::scoring::{calculate_points, match_points};
use crate::models::{team_label, Bracket, LiveFeed, PlayerId, PlayerState};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub player_id: PlayerId,
    pub name: String,
    pub bracket_points: u32,
    pub match_points: u32,
}

/// Rank every player who submitted a bracket or a goal prediction, by bracket
/// points (highest first, ties by name). Statuses are refreshed along the way.
pub fn leaderboard<'a>(
    players: impl IntoIterator<Item = &'a mut PlayerState>,
    feed: &LiveFeed,
    now: DateTime<Utc>,
) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = players
        .into_iter()
        .filter(|p| p.is_ranked())
        .map(|p| {
            let report = calculate_points(&mut p.bracket, feed, now);
            LeaderboardRow {
                player_id: p.id,
                name: p.name.clone(),
                bracket_points: report.bracket_points,
                match_points: report.match_points,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.bracket_points
            .cmp(&a.bracket_points)
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

/// One submitted goal prediction next to the result.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchPredictionRow {
    pub game: String,
    pub prediction: String,
    /// None until the match is done.
    pub result: Option<String>,
    pub points: u32,
}

pub fn match_prediction_rows(bracket: &Bracket, feed: &LiveFeed) -> Vec<MatchPredictionRow> {
    bracket
        .slots()
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| {
            let predicted = slot.predicted_score?;
            let live = feed.get(index)?;
            Some(MatchPredictionRow {
                game: format!(
                    "{} vs {}",
                    team_label(live.team_a.as_deref()),
                    team_label(live.team_b.as_deref())
                ),
                prediction: format!("{} : {}", predicted.goals_a, predicted.goals_b),
                result: live
                    .done
                    .then(|| format!("{} : {}", live.goals_a, live.goals_b)),
                points: match_points(slot, live),
            })
        })
        .collect()
}
