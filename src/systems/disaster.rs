//! Stochastic area-damage events. Runs after resource accounting and before
//! the growth model, so damage shows up in next tick's supply figures.

use anyhow::Result;
use rand::Rng;
use tracing::info;

use crate::engine::{System, TickContext};
use crate::news::NewsKind;
use crate::rng::SystemRng;
use crate::session::{CityState, DisasterKind, DisasterReport};
use crate::stats::Weather;

/// Chebyshev radius of the damaged area around the epicenter.
pub const DISASTER_RADIUS: i64 = 2;
pub const MIN_DAMAGE: u8 = 20;
pub const MAX_DAMAGE: u8 = 60;

const BASE_FIRE_CHANCE: f64 = 0.001;
const DRY_WEATHER_FIRE_BONUS: f64 = 0.002;
const SMOG_FIRE_BONUS: f64 = 0.003;
const BASE_STORM_CHANCE: f64 = 0.001;
const RAIN_STORM_BONUS: f64 = 0.005;

pub struct DisasterSystem;

impl DisasterSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DisasterSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for DisasterSystem {
    fn name(&self) -> &'static str {
        "disaster"
    }

    fn run(
        &mut self,
        ctx: &TickContext,
        state: &mut CityState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let fire_chance = BASE_FIRE_CHANCE
            + if state.stats.weather == Weather::Sunny {
                DRY_WEATHER_FIRE_BONUS
            } else {
                0.0
            }
            + if state.stats.pollution > 50 {
                SMOG_FIRE_BONUS
            } else {
                0.0
            };
        let storm_chance = BASE_STORM_CHANCE
            + if state.stats.weather == Weather::Rainy {
                RAIN_STORM_BONUS
            } else {
                0.0
            };

        let roll: f64 = rng.gen();
        let kind = if roll < fire_chance {
            DisasterKind::Fire
        } else if roll < fire_chance + storm_chance {
            DisasterKind::Storm
        } else {
            return Ok(());
        };

        let Some(report) = strike(state, kind, rng) else {
            return Ok(());
        };
        state.news.push(
            NewsKind::Negative,
            format!(
                "Day {}: {} at ({}, {}) damaged {} buildings",
                ctx.day + 1,
                report.kind.label(),
                report.epicenter.0,
                report.epicenter.1,
                report.tiles_hit
            ),
        );
        info!(kind = report.kind.label(), tiles = report.tiles_hit, "disaster struck");
        state.ledger.disaster = Some(report);
        Ok(())
    }
}

/// Pick an epicenter and damage the surrounding area. Returns `None` when
/// the city has nothing left to damage.
fn strike(state: &mut CityState, kind: DisasterKind, rng: &mut SystemRng<'_>) -> Option<DisasterReport> {
    let candidates = state.grid.damageable_positions();
    if candidates.is_empty() {
        return None;
    }
    let (ex, ey) = candidates[rng.gen_range(0..candidates.len())];

    let mut tiles_hit = 0;
    for dy in -DISASTER_RADIUS..=DISASTER_RADIUS {
        for dx in -DISASTER_RADIUS..=DISASTER_RADIUS {
            let x = ex as i64 + dx;
            let y = ey as i64 + dy;
            if x < 0 || y < 0 {
                continue;
            }
            let Some(tile) = state.grid.get_mut(x as usize, y as usize) else {
                continue;
            };
            if tile.is_empty() || tile.health == 0 {
                continue;
            }
            let damage = rng.gen_range(MIN_DAMAGE..=MAX_DAMAGE);
            tile.health = tile.health.saturating_sub(damage);
            tiles_hit += 1;
        }
    }

    Some(DisasterReport {
        kind,
        epicenter: (ex, ey),
        tiles_hit,
    })
}
