//! Player store: every player's state in one JSON file, plus CSV export.

use crate::models::{team_label, BracketError, LiveFeed, PlayerId, PlayerState};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Errors while loading, saving, or exporting the store.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    Csv(csv::Error),
    /// A stored bracket does not have the knockout shape.
    Bracket {
        player: String,
        source: BracketError,
    },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io { path, source } => write!(f, "player store {}: {}", path, source),
            StoreError::Json(e) => write!(f, "player store JSON: {}", e),
            StoreError::Csv(e) => write!(f, "CSV export: {}", e),
            StoreError::Bracket { player, source } => {
                write!(f, "stored bracket of {}: {}", player, source)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Json(e) => Some(e),
            StoreError::Csv(e) => Some(e),
            StoreError::Bracket { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::Csv(e)
    }
}

/// All players by nickname.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerStore {
    players: BTreeMap<String, PlayerState>,
}

impl PlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`; a missing file is an empty store. Stored brackets are
    /// validated and malformed predictions reset.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No player store at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        let mut store: PlayerStore = serde_json::from_str(&text)?;
        for (name, player) in store.players.iter_mut() {
            player
                .bracket
                .validate()
                .map_err(|source| StoreError::Bracket {
                    player: name.clone(),
                    source,
                })?;
            let healed = player.bracket.heal_predictions();
            if !healed.is_empty() {
                warn!("Reset {} stale prediction(s) of {}", healed.len(), name);
            }
        }
        info!("Loaded {} player(s) from {}", store.len(), path.display());
        Ok(store)
    }

    /// Write the whole store (temp file, then rename over `path`).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let io_err = |source| StoreError::Io {
            path: path.display().to_string(),
            source,
        };
        let json = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PlayerState> {
        self.players.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PlayerState> {
        self.players.get_mut(name)
    }

    /// The player with this nickname, created with an empty bracket if new.
    pub fn get_or_create(
        &mut self,
        name: &str,
        feed: &LiveFeed,
    ) -> Result<&mut PlayerState, BracketError> {
        match self.players.entry(name.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let player = PlayerState::new(name, feed)?;
                info!("New player {}", name);
                Ok(e.insert(player))
            }
        }
    }

    pub fn find_by_id_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.values_mut().find(|p| p.id == id)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.values()
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut PlayerState> {
        self.players.values_mut()
    }

    /// One CSV row per player and match, goal predictions `NA` when not submitted.
    pub fn export_csv(&self) -> Result<Vec<u8>, StoreError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "user",
            "slot",
            "TeamA",
            "TeamB",
            "nextMatch",
            "nextTeam",
            "prediction",
            "status",
            "goal prediction A",
            "goal prediction B",
        ])?;
        for (name, player) in &self.players {
            for (index, slot) in player.bracket.slots().iter().enumerate() {
                let index = index.to_string();
                let next_match = slot.next_match.unwrap_or(0).to_string();
                let (goals_a, goals_b) = match slot.predicted_score {
                    Some(score) => (score.goals_a.to_string(), score.goals_b.to_string()),
                    None => ("NA".to_string(), "NA".to_string()),
                };
                writer.write_record([
                    name.as_str(),
                    index.as_str(),
                    team_label(slot.team_a.as_deref()),
                    team_label(slot.team_b.as_deref()),
                    next_match.as_str(),
                    slot.next_team.as_str(),
                    team_label(slot.prediction.as_deref()),
                    slot.status.as_str(),
                    goals_a.as_str(),
                    goals_b.as_str(),
                ])?;
            }
        }
        writer
            .into_inner()
            .map_err(|e| StoreError::Io {
                path: "CSV export".to_string(),
                source: e.into_error(),
            })
    }
}
