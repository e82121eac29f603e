//! Bracket predictions web app: library with models, business logic, feed import and storage.

pub mod feed;
pub mod logic;
pub mod models;
pub mod store;

pub use feed::{carry_forward_missing, load_feed, parse_feed, parse_kickoff, FeedError};
pub use logic::{
    apply_choice, bracket_graph, bracket_points, calculate_points, can_submit_bracket, classify,
    leaderboard, match_points, match_prediction_rows, refresh_statuses, scoreline_window,
    status_color, submit_bracket, submit_scoreline, BracketGraph, LeaderboardRow,
    MatchPredictionRow, PointsReport, PointsRow, ScorelineWindow,
};
pub use models::{
    country_code, Bracket, BracketError, BracketSlot, LiveFeed, LiveMatch, PlayerId, PlayerState,
    Round, Scoreline, Side, SlotIndex, SlotStatus, FINAL_SLOT, NOT_DECIDED, SLOT_COUNT,
};
pub use store::{PlayerStore, StoreError};
