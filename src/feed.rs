//! Live feed import: the results table exported from the tournament spreadsheet as CSV.
//!
//! One row per match, row order = slot index. Columns:
//! `TeamA,TeamB,goalsA,goalsB,winner,datetime,done,nextMatch,nextTeam`.

use crate::models::{parse_team, LiveFeed, LiveMatch, Side, SlotIndex};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Errors that stop the whole feed from loading. Bad rows are skipped instead.
#[derive(Debug)]
pub enum FeedError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Csv(csv::Error),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Io { path, source } => write!(f, "failed to read live feed {}: {}", path, source),
            FeedError::Csv(e) => write!(f, "failed to read live feed CSV: {}", e),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Io { source, .. } => Some(source),
            FeedError::Csv(e) => Some(e),
        }
    }
}

/// Spreadsheet row as exported. Goals may come out as floats ("2.0") when a
/// column has blanks, so they are read as f64.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawLiveMatch {
    TeamA: String,
    TeamB: String,
    #[serde(default)]
    goalsA: Option<f64>,
    #[serde(default)]
    goalsB: Option<f64>,
    winner: String,
    datetime: String,
    #[serde(default)]
    done: String,
    #[serde(default)]
    nextMatch: Option<usize>,
    nextTeam: String,
}

impl RawLiveMatch {
    fn into_live(self) -> Result<LiveMatch, String> {
        let kickoff = parse_kickoff(&self.datetime)
            .ok_or_else(|| format!("bad datetime '{}'", self.datetime))?;
        let done = parse_flag(&self.done).ok_or_else(|| format!("bad done flag '{}'", self.done))?;
        let next_team = match self.nextTeam.as_str() {
            "TeamA" | "A" => Side::A,
            "TeamB" | "B" => Side::B,
            other => return Err(format!("bad nextTeam '{}'", other)),
        };
        let winner = match self.winner.as_str() {
            "NONE" | "" => None,
            other => parse_team(other),
        };
        Ok(LiveMatch {
            team_a: parse_team(&self.TeamA),
            team_b: parse_team(&self.TeamB),
            goals_a: parse_goals(self.goalsA),
            goals_b: parse_goals(self.goalsB),
            winner,
            kickoff,
            done,
            // 0 marks the final.
            next_match: self.nextMatch.filter(|&n| n != 0),
            next_team,
        })
    }
}

fn parse_goals(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v.round() as u32,
        _ => 0,
    }
}

/// Offset-aware layouts accepted besides RFC 3339. `%#z` takes `+12`, `+1200`
/// and `+12:00`.
const KICKOFF_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// ISO-8601 with an offset, `T` or space separated, seconds optional.
pub fn parse_kickoff(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .or_else(|| {
            KICKOFF_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(text, format).ok())
        })
        .map(|dt| dt.with_timezone(&Utc))
}

/// Fill slots missing from a reloaded feed with their previous entries, so one
/// bad row does not shrink the bracket. Returns the carried slots.
pub fn carry_forward_missing(next: &mut LiveFeed, previous: &LiveFeed) -> Vec<SlotIndex> {
    let mut carried = Vec::new();
    for (&slot, live) in &previous.matches {
        if next.get(slot).is_none() {
            warn!("Live feed row {} unreadable, keeping its previous data", slot);
            next.matches.insert(slot, live.clone());
            carried.push(slot);
        }
    }
    carried
}

/// Spreadsheet booleans: TRUE/FALSE in any case, 1/0, yes/no. Blank is false.
fn parse_flag(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" | "" => Some(false),
        _ => None,
    }
}

/// Parse a feed from any reader. A malformed row leaves its slot out of the feed
/// without shifting the slots after it.
pub fn parse_feed<R: Read>(rdr: R) -> Result<LiveFeed, FeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);
    let mut matches = BTreeMap::new();
    for (index, result) in reader.deserialize::<RawLiveMatch>().enumerate() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) if e.is_io_error() => return Err(FeedError::Csv(e)),
            Err(e) => {
                warn!("skipping live feed row {}: {}", index, e);
                continue;
            }
        };
        match raw.into_live() {
            Ok(live) => {
                matches.insert(index, live);
            }
            Err(e) => warn!("skipping live feed row {}: {}", index, e),
        }
    }
    Ok(LiveFeed::new(matches))
}

/// Load the feed from a CSV file.
pub fn load_feed(path: impl AsRef<Path>) -> Result<LiveFeed, FeedError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FeedError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let feed = parse_feed(file)?;
    info!("Loaded {} live matches from {}", feed.len(), path.display());
    Ok(feed)
}
