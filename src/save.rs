//! Persistence codec: the full-state save record and its JSON encoding.
//!
//! Loading tolerates records written by older releases (missing fields take
//! documented defaults) and rejects corrupt records without touching the
//! running session.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::goals::AiGoal;
use crate::grid::Grid;
use crate::news::NewsLog;
use crate::session::{CityState, ResourceLedger};
use crate::stats::CityStats;

fn default_ai_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub grid: Grid,
    pub stats: CityStats,
    #[serde(default)]
    pub current_goal: Option<AiGoal>,
    #[serde(default)]
    pub news_feed: NewsLog,
    #[serde(default = "default_ai_enabled")]
    pub ai_enabled: bool,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt save record: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("corrupt save record: grid is not square")]
    MalformedGrid,
}

impl SaveRecord {
    pub fn capture(state: &CityState) -> Self {
        Self {
            grid: state.grid.clone(),
            stats: state.stats.clone(),
            current_goal: state.goal.clone(),
            news_feed: state.news.clone(),
            ai_enabled: state.ai_enabled,
            saved_at: Utc::now(),
        }
    }

    /// Replace the session wholesale. Only call with a decoded (already
    /// validated) record, so the swap cannot half-apply.
    pub fn restore(self, state: &mut CityState) {
        state.grid = self.grid;
        state.stats = self.stats;
        state.goal = self.current_goal;
        state.news = self.news_feed;
        state.ai_enabled = self.ai_enabled;
        state.ledger = ResourceLedger::default();
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let mut record: SaveRecord = serde_json::from_str(json)?;
        if !record.grid.is_square() {
            return Err(SaveError::MalformedGrid);
        }
        record.grid.sanitize();
        record.stats.sanitize();
        Ok(record)
    }
}

pub fn save_to_path(state: &CityState, path: &Path) -> Result<(), SaveError> {
    let record = SaveRecord::capture(state);
    fs::write(path, record.to_json()?)?;
    info!(path = %path.display(), day = state.stats.day, "city saved");
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<SaveRecord, SaveError> {
    let json = fs::read_to_string(path)?;
    SaveRecord::from_json(&json)
}

/// Writes a save every fixed number of ticks. A failed write is reported
/// through the return value, never fatal.
pub struct Autosave {
    path: PathBuf,
    every_ticks: u64,
}

impl Autosave {
    pub fn new(path: PathBuf, every_ticks: u64) -> Self {
        Self { path, every_ticks }
    }

    /// Save if the tick lands on the interval. Returns whether a write was
    /// attempted and the error, if any, for the caller's feedback channel.
    pub fn maybe_save(&self, tick: u64, state: &CityState) -> Option<Result<(), SaveError>> {
        if self.every_ticks == 0 || tick == 0 || tick % self.every_ticks != 0 {
            return None;
        }
        let result = save_to_path(state, &self.path);
        if let Err(err) = &result {
            warn!(path = %self.path.display(), %err, "autosave failed");
        }
        Some(result)
    }
}
