//! Bracket business logic: pick propagation, scoring, submission, leaderboard, diagram.

mod leaderboard;
mod propagation;
mod render;
mod scoring;
mod submission;

pub use leaderboard::{leaderboard, match_prediction_rows, LeaderboardRow, MatchPredictionRow};
pub use propagation::apply_choice;
pub use render::{bracket_graph, status_color, BracketGraph, GraphEdge, GraphNode, STROKE_COLOR};
pub use scoring::{
    bracket_points, calculate_points, classify, match_points, refresh_statuses, PointsReport,
    PointsRow, EXACT_SCORE_POINTS, GOAL_MARGIN_POINTS, WINNER_POINTS,
};
pub use submission::{
    can_submit_bracket, scoreline_window, submit_bracket, submit_scoreline, ScorelineWindow,
    CLOSING_SOON_MINUTES,
};
