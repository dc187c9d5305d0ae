//! Happiness & growth model: folds the tick's resource ledger into the next
//! CityStats. The only writer of CityStats inside the tick.

use anyhow::Result;
use rand::Rng;

use crate::catalog::BuildingType;
use crate::engine::{System, TickContext};
use crate::rng::SystemRng;
use crate::session::CityState;
use crate::stats::Weather;

pub const HOUSING_PER_RESIDENTIAL: u32 = 50;
pub const HOUSING_PER_MIXED_USE: u32 = 100;
/// Residents leaving per tick once the city has no housing at all.
pub const EMIGRATION_PER_TICK: u32 = 5;

const HAPPINESS_BASE: f64 = 60.0;
const WEATHER_REROLL_CHANCE: f64 = 0.05;

pub struct GrowthSystem;

impl GrowthSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GrowthSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for GrowthSystem {
    fn name(&self) -> &'static str {
        "growth"
    }

    fn run(
        &mut self,
        _ctx: &TickContext,
        state: &mut CityState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let residential = state.ledger.counts.get(BuildingType::Residential);
        let mixed_use = state.ledger.counts.get(BuildingType::MixedUse);
        let industrial = state.ledger.counts.get(BuildingType::Industrial);
        let power_plants = state.ledger.counts.get(BuildingType::PowerPlant);
        let airports = state.ledger.counts.get(BuildingType::Airport);
        let parks = state.ledger.counts.get(BuildingType::Park);
        let stadiums = state.ledger.counts.get(BuildingType::Stadium);

        let ledger = &state.ledger;
        let stats = &mut state.stats;

        // Treasury first; no floor here. The floor lives at the point of a
        // spend action, so a shortfall shows up as debt.
        stats.money += ledger.income - ledger.maintenance;

        let housing = residential * HOUSING_PER_RESIDENTIAL + mixed_use * HOUSING_PER_MIXED_USE;
        let previous_population = stats.population;
        let population = if housing == 0 {
            previous_population.saturating_sub(EMIGRATION_PER_TICK)
        } else {
            let grown = (f64::from(previous_population) + ledger.population_growth)
                .max(0.0)
                .floor() as u32;
            grown.min(housing)
        };
        stats.population = population;

        let pollution = (i64::from(industrial) * 10 + i64::from(power_plants) * 5
            + i64::from(airports) * 20
            - i64::from(parks) * 5)
            .clamp(0, 100) as u32;
        stats.pollution = pollution;

        let education = coverage(ledger.education_capacity, population);
        let healthcare = coverage(ledger.healthcare_capacity, population);
        let safety = coverage(ledger.safety_capacity, population);

        let mut happiness = HAPPINESS_BASE;
        happiness += (f64::from(parks) * 5.0).min(20.0);
        happiness += (f64::from(stadiums) * 15.0).min(30.0);
        happiness -= (f64::from(pollution) * 0.8).floor();
        if housing > 0 && f64::from(population) > 0.9 * f64::from(housing) {
            happiness -= 15.0;
        }
        happiness -= 20.0 * (1.0 - ledger.power_efficiency);
        happiness -= 20.0 * (1.0 - ledger.water_efficiency);
        happiness += service_term(education, 15.0, 80.0);
        happiness += service_term(healthcare, 20.0, 80.0);
        happiness += service_term(safety, 15.0, 90.0);
        if ledger.goods_efficiency < 0.5 {
            happiness -= 5.0;
        }
        if ledger.traffic_congestion > 60.0 {
            happiness -= ((ledger.traffic_congestion - 60.0) * 0.5).floor();
        }
        if stats.money > 2_000.0 {
            happiness += 5.0;
        }
        happiness += match stats.weather {
            Weather::Sunny => 2.0,
            Weather::Rainy => -2.0,
            Weather::Snowy => -1.0,
        };
        if ledger.disaster.is_some() {
            happiness -= 10.0;
        }
        if housing == 0 && population > 0 {
            // Homelessness overrides every other term this tick.
            happiness = 10.0;
        }
        stats.happiness = happiness.floor().clamp(0.0, 100.0) as u32;

        stats.power_supply = ledger.power_supply;
        stats.power_demand = ledger.power_demand;
        stats.water_supply = ledger.water_supply;
        stats.water_demand = ledger.water_demand;
        stats.goods_supply = ledger.goods_supply;
        stats.goods_demand = ledger.goods_demand;
        stats.education_coverage = education.floor() as u32;
        stats.healthcare_coverage = healthcare.floor() as u32;
        stats.safety_coverage = safety.floor() as u32;
        stats.traffic_congestion = ledger.traffic_congestion.floor() as u32;

        // Weather persists; a 5% reroll keeps runs of identical days common.
        // Happiness and disaster odds above saw the pre-roll weather.
        if rng.chance(WEATHER_REROLL_CHANCE) {
            let roll: f64 = rng.gen();
            stats.weather = if roll < 0.6 {
                Weather::Sunny
            } else if roll < 0.85 {
                Weather::Rainy
            } else {
                Weather::Snowy
            };
        }

        Ok(())
    }
}

/// Service coverage as a 0-100 percentage of the population served.
fn coverage(capacity: f64, population: u32) -> f64 {
    if population > 0 {
        (100.0 * capacity / f64::from(population)).min(100.0)
    } else {
        100.0
    }
}

/// Happiness contribution of one public service: a shortfall penalty that
/// deepens linearly below 50% coverage, a flat bonus above the threshold.
fn service_term(cov: f64, shortfall_weight: f64, bonus_over: f64) -> f64 {
    if cov < 50.0 {
        -shortfall_weight * (1.0 - cov / 50.0)
    } else if cov > bonus_over {
        5.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_of_an_empty_city_is_full() {
        assert_eq!(coverage(0.0, 0), 100.0);
        assert_eq!(coverage(30.0, 60), 50.0);
        assert_eq!(coverage(500.0, 10), 100.0);
    }

    #[test]
    fn service_term_shape() {
        assert_eq!(service_term(0.0, 20.0, 80.0), -20.0);
        assert_eq!(service_term(25.0, 20.0, 80.0), -10.0);
        assert_eq!(service_term(50.0, 20.0, 80.0), 0.0);
        assert_eq!(service_term(80.0, 20.0, 80.0), 0.0);
        assert_eq!(service_term(81.0, 20.0, 80.0), 5.0);
    }
}
