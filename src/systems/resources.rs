//! Resource accountant: aggregates per-tile supply, demand, upkeep, and
//! traffic, then applies the derived efficiencies to income and growth.

use anyhow::Result;

use crate::catalog::BuildingType;
use crate::engine::{System, TickContext};
use crate::rng::SystemRng;
use crate::session::CityState;

/// Vehicles per tick one road tile can carry at full health.
pub const ROAD_CAPACITY_PER_TILE: f64 = 5.0;

pub struct ResourceSystem;

impl ResourceSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResourceSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ResourceSystem {
    fn name(&self) -> &'static str {
        "resources"
    }

    fn run(
        &mut self,
        _ctx: &TickContext,
        state: &mut CityState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let ledger = &mut state.ledger;

        // Pass 1: aggregate. Generation scales with the category budget and
        // tile health; demand never does. Upkeep scales with the budget only,
        // so a damaged building still costs full maintenance.
        for (_, _, tile) in state.grid.iter() {
            if tile.is_empty() {
                continue;
            }
            let kind = tile.building;
            let cfg = kind.config();
            let multiplier = state.stats.budget.multiplier(kind);
            let health = tile.health_factor();

            ledger.counts.add(kind);
            ledger.maintenance += cfg.maintenance * multiplier;

            ledger.power_supply += cfg.power_gen * multiplier * health;
            ledger.water_supply += cfg.water_gen * multiplier * health;
            ledger.education_capacity += cfg.education_gen * multiplier * health;
            ledger.healthcare_capacity += cfg.healthcare_gen * multiplier * health;
            ledger.safety_capacity += cfg.safety_gen * multiplier * health;
            ledger.goods_supply += cfg.goods_gen * health;

            ledger.power_demand += cfg.power_usage;
            ledger.water_demand += cfg.water_usage;
            ledger.goods_demand += cfg.goods_usage;

            ledger.traffic_load += kind.traffic_load();
            if kind == BuildingType::Road {
                ledger.road_capacity += ROAD_CAPACITY_PER_TILE * health;
            }
        }

        ledger.power_efficiency = efficiency(ledger.power_supply, ledger.power_demand);
        ledger.water_efficiency = efficiency(ledger.water_supply, ledger.water_demand);
        ledger.goods_efficiency = efficiency(ledger.goods_supply, ledger.goods_demand);
        ledger.basic_utility_efficiency =
            (ledger.power_efficiency + ledger.water_efficiency) / 2.0;
        ledger.traffic_congestion = congestion(ledger.traffic_load, ledger.road_capacity);

        // Pass 2: efficiency is a city-wide ratio, so per-tile income and
        // growth can only be computed once everything is aggregated.
        let basic = ledger.basic_utility_efficiency;
        let goods = ledger.goods_efficiency;
        for (_, _, tile) in state.grid.iter() {
            if tile.is_empty() {
                continue;
            }
            let cfg = tile.building.config();
            let health = tile.health_factor();
            let mut income = cfg.income_gen * basic * health;
            if cfg.goods_usage > 0.0 {
                income *= goods;
            }
            ledger.income += income;
            ledger.population_growth += cfg.pop_gen * basic * health;
        }

        Ok(())
    }
}

/// Supply/demand ratio clamped to 1. No demand means fully served.
fn efficiency(supply: f64, demand: f64) -> f64 {
    if demand > 0.0 {
        (supply / demand).min(1.0)
    } else {
        1.0
    }
}

fn congestion(load: f64, capacity: f64) -> f64 {
    if capacity > 0.0 {
        (100.0 * load / capacity).min(100.0)
    } else if load > 0.0 {
        100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_clamps() {
        assert_eq!(efficiency(0.0, 0.0), 1.0);
        assert_eq!(efficiency(120.0, 0.0), 1.0);
        assert_eq!(efficiency(50.0, 100.0), 0.5);
        assert_eq!(efficiency(500.0, 100.0), 1.0);
    }

    #[test]
    fn congestion_without_roads() {
        assert_eq!(congestion(0.0, 0.0), 0.0);
        assert_eq!(congestion(3.0, 0.0), 100.0);
        assert_eq!(congestion(5.0, 25.0), 20.0);
        assert_eq!(congestion(80.0, 10.0), 100.0);
    }
}
