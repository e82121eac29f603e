//! Data structures for bracket predictions: slots, brackets, live results, players.

mod bracket;
mod country;
mod live;
mod player;
mod slot;

pub use bracket::{Bracket, BracketError, FINAL_SLOT, SLOT_COUNT};
pub use country::country_code;
pub use live::{LiveFeed, LiveMatch};
pub use player::{PlayerId, PlayerState};
pub use slot::{
    parse_team, team_label, BracketSlot, Round, Scoreline, Side, SlotIndex, SlotStatus, NOT_DECIDED,
};
