//! New-game settings loaded from YAML. Every field except the name has a
//! default, so a minimal file is enough to start a city.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::grid::DEFAULT_GRID_SIZE;
use crate::session::CityState;

fn default_seed() -> u64 {
    7
}

fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}

fn default_starting_money() -> f64 {
    25_000.0
}

fn default_tick_interval_ms() -> u64 {
    2_000
}

fn default_ai_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSettings {
    pub name: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    #[serde(default = "default_starting_money")]
    pub starting_money: f64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Total ticks to run; `None` runs until interrupted.
    #[serde(default)]
    pub ticks: Option<u64>,
    /// 0 disables autosaving.
    #[serde(default)]
    pub autosave_every_ticks: u64,
    #[serde(default = "default_ai_enabled")]
    pub ai_enabled: bool,
}

impl GameSettings {
    pub fn default_city() -> Self {
        Self {
            name: "riverbend".to_string(),
            seed: default_seed(),
            grid_size: default_grid_size(),
            starting_money: default_starting_money(),
            tick_interval_ms: default_tick_interval_ms(),
            ticks: None,
            autosave_every_ticks: 0,
            ai_enabled: default_ai_enabled(),
        }
    }

    pub fn build_state(&self) -> CityState {
        let mut state = CityState::new(self.grid_size, self.starting_money);
        state.ai_enabled = self.ai_enabled;
        state
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> Option<u64> {
        override_ticks.or(self.ticks)
    }
}

pub struct SettingsLoader {
    base_dir: PathBuf,
}

impl SettingsLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<GameSettings> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: GameSettings = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_takes_defaults() {
        let settings: GameSettings = serde_yaml::from_str("name: testville").unwrap();
        assert_eq!(settings.name, "testville");
        assert_eq!(settings.grid_size, DEFAULT_GRID_SIZE);
        assert_eq!(settings.starting_money, 25_000.0);
        assert_eq!(settings.tick_interval_ms, 2_000);
        assert_eq!(settings.ticks, None);
        assert_eq!(settings.autosave_every_ticks, 0);
        assert!(settings.ai_enabled);
    }

    #[test]
    fn settings_round_trip_through_yaml() {
        let settings = GameSettings::default_city();
        let yaml = serde_yaml::to_string(&settings).unwrap();
        let loaded: GameSettings = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(loaded.name, settings.name);
        assert_eq!(loaded.seed, settings.seed);
        assert_eq!(loaded.grid_size, settings.grid_size);
    }

    #[test]
    fn build_state_applies_settings() {
        let mut settings = GameSettings::default_city();
        settings.grid_size = 9;
        settings.starting_money = 500.0;
        settings.ai_enabled = false;
        let state = settings.build_state();
        assert_eq!(state.grid.size(), 9);
        assert_eq!(state.stats.money, 500.0);
        assert!(!state.ai_enabled);
    }
}
