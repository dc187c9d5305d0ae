//! Tile grid owned by the simulation session. Fixed size for the lifetime
//! of a city; mutated only through player actions and disasters.

use serde::{Deserialize, Serialize};

use crate::catalog::BuildingType;

pub const DEFAULT_GRID_SIZE: usize = 15;
pub const FULL_HEALTH: u8 = 100;

/// Road sub-kinds stored in `Tile::variant`.
pub const ROAD_VARIANTS: u8 = 4;

fn default_health() -> u8 {
    FULL_HEALTH
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(default)]
    pub building: BuildingType,
    /// Sub-kind of the building. Roads: 0 ground, 1 bridge, 2 overpass with
    /// ground lanes north-south, 3 overpass with ground lanes east-west.
    #[serde(default)]
    pub variant: u8,
    /// 0-100 condition. 0 renders as rubble and produces nothing.
    #[serde(default = "default_health")]
    pub health: u8,
}

impl Tile {
    pub const EMPTY: Tile = Tile {
        building: BuildingType::None,
        variant: 0,
        health: FULL_HEALTH,
    };

    pub fn is_empty(&self) -> bool {
        self.building == BuildingType::None
    }

    pub fn health_factor(&self) -> f64 {
        f64::from(self.health.min(FULL_HEALTH)) / f64::from(FULL_HEALTH)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::EMPTY
    }
}

/// Row-major `[y][x]` tile array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<Tile>>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            rows: vec![vec![Tile::EMPTY; size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Tile> {
        self.rows.get(y).and_then(|row| row.get(x))
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        self.rows.get_mut(y).and_then(|row| row.get_mut(x))
    }

    /// Row-major iteration over `(x, y, tile)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Tile)> {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().map(move |(x, tile)| (x, y, tile))
        })
    }

    pub fn counts(&self) -> BuildingCounts {
        let mut counts = BuildingCounts::default();
        for (_, _, tile) in self.iter() {
            if !tile.is_empty() {
                counts.add(tile.building);
            }
        }
        counts
    }

    /// Tiles a disaster may strike: occupied, not a road, not yet rubble.
    pub fn damageable_positions(&self) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|(_, _, tile)| {
                !tile.is_empty() && tile.building != BuildingType::Road && tile.health > 0
            })
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// True when every row has the same non-zero length as the row count.
    pub fn is_square(&self) -> bool {
        let size = self.rows.len();
        size > 0 && self.rows.iter().all(|row| row.len() == size)
    }

    /// Clamp out-of-range tile health carried in from an untrusted record.
    pub fn sanitize(&mut self) {
        for row in &mut self.rows {
            for tile in row {
                tile.health = tile.health.min(FULL_HEALTH);
            }
        }
    }
}

/// Occupancy counts per building type, computed fresh each tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingCounts {
    counts: std::collections::HashMap<BuildingType, u32>,
}

impl BuildingCounts {
    pub fn add(&mut self, kind: BuildingType) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    pub fn get(&self, kind: BuildingType) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_empty_and_square() {
        let grid = Grid::new(DEFAULT_GRID_SIZE);
        assert_eq!(grid.size(), DEFAULT_GRID_SIZE);
        assert!(grid.is_square());
        assert!(grid.iter().all(|(_, _, tile)| *tile == Tile::EMPTY));
    }

    #[test]
    fn out_of_bounds_access_is_none() {
        let mut grid = Grid::new(4);
        assert!(grid.get(4, 0).is_none());
        assert!(grid.get(0, 4).is_none());
        assert!(grid.get_mut(9, 9).is_none());
        assert!(grid.get(3, 3).is_some());
    }

    #[test]
    fn counts_skip_empty_tiles() {
        let mut grid = Grid::new(4);
        grid.get_mut(0, 0).unwrap().building = BuildingType::Residential;
        grid.get_mut(1, 0).unwrap().building = BuildingType::Residential;
        grid.get_mut(2, 2).unwrap().building = BuildingType::Park;
        let counts = grid.counts();
        assert_eq!(counts.get(BuildingType::Residential), 2);
        assert_eq!(counts.get(BuildingType::Park), 1);
        assert_eq!(counts.get(BuildingType::None), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn damageable_excludes_roads_and_rubble() {
        let mut grid = Grid::new(3);
        grid.get_mut(0, 0).unwrap().building = BuildingType::Road;
        grid.get_mut(1, 0).unwrap().building = BuildingType::Commercial;
        let ruined = grid.get_mut(2, 0).unwrap();
        ruined.building = BuildingType::Industrial;
        ruined.health = 0;
        assert_eq!(grid.damageable_positions(), vec![(1, 0)]);
    }
}
