//! Player actions: synchronous, validated grid mutations between ticks.
//!
//! One click resolves to at most one handler, in fixed precedence:
//! repair, then demolish, then road variant cycle, then placement.

use thiserror::Error;
use tracing::debug;

use crate::catalog::BuildingType;
use crate::grid::{FULL_HEALTH, ROAD_VARIANTS};
use crate::news::NewsKind;
use crate::session::CityState;

pub const DEMOLISH_COST: f64 = 5.0;
pub const ROAD_CYCLE_COST: f64 = 50.0;
/// Repair price as a fraction of the building's base cost.
pub const REPAIR_COST_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Bulldoze,
    Build(BuildingType),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionOutcome {
    Placed {
        building: BuildingType,
        cost: f64,
    },
    Demolished {
        building: BuildingType,
        cost: f64,
    },
    Repaired {
        building: BuildingType,
        cost: f64,
    },
    RoadCycled {
        variant: u8,
        cost: f64,
    },
    /// Out-of-bounds click, bulldozing an empty lot, or a tool/tile
    /// combination no handler accepts. Nothing changed.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ActionError {
    #[error("not enough money: need ${needed:.0}, have ${available:.0}")]
    InsufficientFunds { needed: f64, available: f64 },
}

pub fn apply_tool(
    state: &mut CityState,
    x: usize,
    y: usize,
    tool: Tool,
) -> Result<ActionOutcome, ActionError> {
    let Some(tile) = state.grid.get(x, y).copied() else {
        return Ok(ActionOutcome::Ignored);
    };

    // Repair beats everything but the bulldozer on a damaged tile.
    if !tile.is_empty() && tile.health < FULL_HEALTH && tool != Tool::Bulldoze {
        let cost = (tile.building.config().cost * REPAIR_COST_FACTOR).floor();
        try_spend(state, cost, &format!("repairs to the {}", tile.building.label()))?;
        if let Some(tile) = state.grid.get_mut(x, y) {
            tile.health = FULL_HEALTH;
        }
        debug!(x, y, cost, "repaired");
        return Ok(ActionOutcome::Repaired {
            building: tile.building,
            cost,
        });
    }

    if tool == Tool::Bulldoze {
        if tile.is_empty() {
            return Ok(ActionOutcome::Ignored);
        }
        try_spend(state, DEMOLISH_COST, "demolition")?;
        if let Some(tile) = state.grid.get_mut(x, y) {
            *tile = crate::grid::Tile::EMPTY;
        }
        debug!(x, y, "demolished");
        return Ok(ActionOutcome::Demolished {
            building: tile.building,
            cost: DEMOLISH_COST,
        });
    }

    // Road tool on an existing road cycles ground / bridge / overpass kinds.
    if tile.building == BuildingType::Road && tool == Tool::Build(BuildingType::Road) {
        try_spend(state, ROAD_CYCLE_COST, "road works")?;
        let variant = (tile.variant + 1) % ROAD_VARIANTS;
        if let Some(tile) = state.grid.get_mut(x, y) {
            tile.variant = variant;
        }
        return Ok(ActionOutcome::RoadCycled {
            variant,
            cost: ROAD_CYCLE_COST,
        });
    }

    if tile.is_empty() {
        if let Tool::Build(building) = tool {
            if building == BuildingType::None {
                return Ok(ActionOutcome::Ignored);
            }
            let cost = building.config().cost;
            try_spend(state, cost, building.label())?;
            if let Some(tile) = state.grid.get_mut(x, y) {
                tile.building = building;
                tile.variant = 0;
                tile.health = FULL_HEALTH;
            }
            debug!(x, y, ?building, "placed");
            return Ok(ActionOutcome::Placed { building, cost });
        }
    }

    Ok(ActionOutcome::Ignored)
}

/// Deduct `cost` or reject the action with a negative news item.
fn try_spend(state: &mut CityState, cost: f64, what: &str) -> Result<(), ActionError> {
    if state.stats.money < cost {
        state.news.push(
            NewsKind::Negative,
            format!("City hall cannot afford {what} (${cost:.0})"),
        );
        return Err(ActionError::InsufficientFunds {
            needed: cost,
            available: state.stats.money,
        });
    }
    state.stats.money -= cost;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;

    fn state() -> CityState {
        CityState::new(8, 10_000.0)
    }

    #[test]
    fn placement_charges_catalog_cost() {
        let mut state = state();
        let outcome = apply_tool(&mut state, 2, 3, Tool::Build(BuildingType::School)).unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Placed {
                building: BuildingType::School,
                cost: 250.0
            }
        );
        assert_eq!(state.stats.money, 9_750.0);
        let tile = state.grid.get(2, 3).unwrap();
        assert_eq!(tile.building, BuildingType::School);
        assert_eq!(tile.health, FULL_HEALTH);
    }

    #[test]
    fn bulldozing_an_empty_lot_is_free() {
        let mut state = state();
        assert_eq!(
            apply_tool(&mut state, 0, 0, Tool::Bulldoze).unwrap(),
            ActionOutcome::Ignored
        );
        assert_eq!(state.stats.money, 10_000.0);
        assert!(state.news.is_empty());
    }

    #[test]
    fn repair_takes_precedence_over_placement() {
        let mut state = state();
        *state.grid.get_mut(1, 1).unwrap() = Tile {
            building: BuildingType::Hospital,
            variant: 0,
            health: 40,
        };
        let outcome = apply_tool(&mut state, 1, 1, Tool::Build(BuildingType::Park)).unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Repaired {
                building: BuildingType::Hospital,
                cost: 175.0
            }
        );
        assert_eq!(state.grid.get(1, 1).unwrap().health, FULL_HEALTH);
        assert_eq!(state.grid.get(1, 1).unwrap().building, BuildingType::Hospital);
    }

    #[test]
    fn road_tool_cycles_variants() {
        let mut state = state();
        apply_tool(&mut state, 4, 4, Tool::Build(BuildingType::Road)).unwrap();
        for expected in [1, 2, 3, 0] {
            let outcome =
                apply_tool(&mut state, 4, 4, Tool::Build(BuildingType::Road)).unwrap();
            assert_eq!(
                outcome,
                ActionOutcome::RoadCycled {
                    variant: expected,
                    cost: ROAD_CYCLE_COST
                }
            );
        }
        assert_eq!(state.grid.get(4, 4).unwrap().variant, 0);
    }

    #[test]
    fn out_of_bounds_is_silently_ignored() {
        let mut state = state();
        let outcome = apply_tool(&mut state, 99, 0, Tool::Build(BuildingType::Park)).unwrap();
        assert_eq!(outcome, ActionOutcome::Ignored);
        assert!(state.news.is_empty());
    }

    #[test]
    fn occupied_healthy_tile_rejects_other_builds() {
        let mut state = state();
        apply_tool(&mut state, 5, 5, Tool::Build(BuildingType::Park)).unwrap();
        let outcome = apply_tool(&mut state, 5, 5, Tool::Build(BuildingType::School)).unwrap();
        assert_eq!(outcome, ActionOutcome::Ignored);
        assert_eq!(state.grid.get(5, 5).unwrap().building, BuildingType::Park);
    }

    #[test]
    fn insufficient_funds_rejects_and_surfaces_news() {
        let mut state = CityState::new(8, 100.0);
        let err = apply_tool(&mut state, 0, 0, Tool::Build(BuildingType::Airport)).unwrap_err();
        assert_eq!(
            err,
            ActionError::InsufficientFunds {
                needed: 1_000.0,
                available: 100.0
            }
        );
        assert_eq!(state.stats.money, 100.0);
        assert!(state.grid.get(0, 0).unwrap().is_empty());
        assert_eq!(state.news.latest().unwrap().kind, NewsKind::Negative);
    }
}
