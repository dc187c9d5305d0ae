//! Static building catalog: per-type costs, upkeep, and resource
//! coefficients. Read-only after process start.

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    #[default]
    None,
    Road,
    Residential,
    Commercial,
    Industrial,
    MixedUse,
    Park,
    PowerPlant,
    WaterPump,
    School,
    Hospital,
    PoliceStation,
    Stadium,
    Airport,
}

pub const ALL_BUILDING_TYPES: [BuildingType; 14] = [
    BuildingType::None,
    BuildingType::Road,
    BuildingType::Residential,
    BuildingType::Commercial,
    BuildingType::Industrial,
    BuildingType::MixedUse,
    BuildingType::Park,
    BuildingType::PowerPlant,
    BuildingType::WaterPump,
    BuildingType::School,
    BuildingType::Hospital,
    BuildingType::PoliceStation,
    BuildingType::Stadium,
    BuildingType::Airport,
];

/// Funded service categories, one per budget slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetCategory {
    Infrastructure,
    Power,
    Water,
    Education,
    Healthcare,
    Safety,
    Environment,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingConfig {
    pub cost: f64,
    pub maintenance: f64,
    pub pop_gen: f64,
    pub income_gen: f64,
    pub power_usage: f64,
    pub power_gen: f64,
    pub water_usage: f64,
    pub water_gen: f64,
    pub education_gen: f64,
    pub healthcare_gen: f64,
    pub goods_gen: f64,
    pub goods_usage: f64,
    pub safety_gen: f64,
}

const EMPTY: BuildingConfig = BuildingConfig {
    cost: 0.0,
    maintenance: 0.0,
    pop_gen: 0.0,
    income_gen: 0.0,
    power_usage: 0.0,
    power_gen: 0.0,
    water_usage: 0.0,
    water_gen: 0.0,
    education_gen: 0.0,
    healthcare_gen: 0.0,
    goods_gen: 0.0,
    goods_usage: 0.0,
    safety_gen: 0.0,
};

const ROAD: BuildingConfig = BuildingConfig {
    cost: 10.0,
    maintenance: 1.0,
    ..EMPTY
};

const RESIDENTIAL: BuildingConfig = BuildingConfig {
    cost: 100.0,
    pop_gen: 5.0,
    power_usage: 1.0,
    water_usage: 1.0,
    goods_usage: 1.0,
    ..EMPTY
};

const COMMERCIAL: BuildingConfig = BuildingConfig {
    cost: 150.0,
    maintenance: 2.0,
    income_gen: 15.0,
    power_usage: 2.0,
    water_usage: 1.0,
    goods_usage: 2.0,
    ..EMPTY
};

const INDUSTRIAL: BuildingConfig = BuildingConfig {
    cost: 200.0,
    maintenance: 3.0,
    income_gen: 25.0,
    power_usage: 4.0,
    water_usage: 2.0,
    goods_gen: 10.0,
    ..EMPTY
};

const MIXED_USE: BuildingConfig = BuildingConfig {
    cost: 250.0,
    maintenance: 2.0,
    pop_gen: 10.0,
    income_gen: 10.0,
    power_usage: 3.0,
    water_usage: 2.0,
    goods_usage: 2.0,
    ..EMPTY
};

const PARK: BuildingConfig = BuildingConfig {
    cost: 50.0,
    maintenance: 1.0,
    ..EMPTY
};

const POWER_PLANT: BuildingConfig = BuildingConfig {
    cost: 300.0,
    maintenance: 20.0,
    power_gen: 50.0,
    ..EMPTY
};

const WATER_PUMP: BuildingConfig = BuildingConfig {
    cost: 200.0,
    maintenance: 15.0,
    power_usage: 2.0,
    water_gen: 50.0,
    ..EMPTY
};

const SCHOOL: BuildingConfig = BuildingConfig {
    cost: 250.0,
    maintenance: 10.0,
    power_usage: 2.0,
    water_usage: 1.0,
    education_gen: 30.0,
    ..EMPTY
};

const HOSPITAL: BuildingConfig = BuildingConfig {
    cost: 350.0,
    maintenance: 15.0,
    power_usage: 3.0,
    water_usage: 2.0,
    healthcare_gen: 40.0,
    ..EMPTY
};

const POLICE_STATION: BuildingConfig = BuildingConfig {
    cost: 250.0,
    maintenance: 12.0,
    power_usage: 2.0,
    water_usage: 1.0,
    safety_gen: 35.0,
    ..EMPTY
};

const STADIUM: BuildingConfig = BuildingConfig {
    cost: 500.0,
    maintenance: 25.0,
    income_gen: 30.0,
    power_usage: 5.0,
    water_usage: 3.0,
    ..EMPTY
};

const AIRPORT: BuildingConfig = BuildingConfig {
    cost: 1000.0,
    maintenance: 50.0,
    income_gen: 60.0,
    power_usage: 8.0,
    water_usage: 4.0,
    goods_usage: 5.0,
    ..EMPTY
};

impl BuildingType {
    pub fn config(self) -> &'static BuildingConfig {
        match self {
            BuildingType::None => &EMPTY,
            BuildingType::Road => &ROAD,
            BuildingType::Residential => &RESIDENTIAL,
            BuildingType::Commercial => &COMMERCIAL,
            BuildingType::Industrial => &INDUSTRIAL,
            BuildingType::MixedUse => &MIXED_USE,
            BuildingType::Park => &PARK,
            BuildingType::PowerPlant => &POWER_PLANT,
            BuildingType::WaterPump => &WATER_PUMP,
            BuildingType::School => &SCHOOL,
            BuildingType::Hospital => &HOSPITAL,
            BuildingType::PoliceStation => &POLICE_STATION,
            BuildingType::Stadium => &STADIUM,
            BuildingType::Airport => &AIRPORT,
        }
    }

    /// The budget slider funding this building, if any. Zoned buildings are
    /// privately funded and unaffected by the budget.
    pub fn budget_category(self) -> Option<BudgetCategory> {
        match self {
            BuildingType::Road | BuildingType::Airport => Some(BudgetCategory::Infrastructure),
            BuildingType::PowerPlant => Some(BudgetCategory::Power),
            BuildingType::WaterPump => Some(BudgetCategory::Water),
            BuildingType::School => Some(BudgetCategory::Education),
            BuildingType::Hospital => Some(BudgetCategory::Healthcare),
            BuildingType::PoliceStation => Some(BudgetCategory::Safety),
            BuildingType::Park | BuildingType::Stadium => Some(BudgetCategory::Environment),
            _ => None,
        }
    }

    /// Road-network load the building generates per tick.
    pub fn traffic_load(self) -> f64 {
        match self {
            BuildingType::Residential
            | BuildingType::Commercial
            | BuildingType::Industrial
            | BuildingType::MixedUse
            | BuildingType::School
            | BuildingType::Hospital => 1.0,
            BuildingType::Stadium => 4.0,
            BuildingType::Airport => 12.0,
            _ => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BuildingType::None => "empty lot",
            BuildingType::Road => "road",
            BuildingType::Residential => "residential zone",
            BuildingType::Commercial => "commercial zone",
            BuildingType::Industrial => "industrial zone",
            BuildingType::MixedUse => "mixed-use block",
            BuildingType::Park => "park",
            BuildingType::PowerPlant => "power plant",
            BuildingType::WaterPump => "water pump",
            BuildingType::School => "school",
            BuildingType::Hospital => "hospital",
            BuildingType::PoliceStation => "police station",
            BuildingType::Stadium => "stadium",
            BuildingType::Airport => "airport",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficients_are_non_negative() {
        for kind in ALL_BUILDING_TYPES {
            let cfg = kind.config();
            for value in [
                cfg.cost,
                cfg.maintenance,
                cfg.pop_gen,
                cfg.income_gen,
                cfg.power_usage,
                cfg.power_gen,
                cfg.water_usage,
                cfg.water_gen,
                cfg.education_gen,
                cfg.healthcare_gen,
                cfg.goods_gen,
                cfg.goods_usage,
                cfg.safety_gen,
            ] {
                assert!(value >= 0.0, "{kind:?} has a negative coefficient");
            }
        }
    }

    #[test]
    fn budget_mapping() {
        assert_eq!(
            BuildingType::Road.budget_category(),
            Some(BudgetCategory::Infrastructure)
        );
        assert_eq!(
            BuildingType::Stadium.budget_category(),
            Some(BudgetCategory::Environment)
        );
        assert_eq!(BuildingType::Residential.budget_category(), None);
        assert_eq!(BuildingType::None.budget_category(), None);
    }

    #[test]
    fn traffic_weights() {
        assert_eq!(BuildingType::Airport.traffic_load(), 12.0);
        assert_eq!(BuildingType::Stadium.traffic_load(), 4.0);
        assert_eq!(BuildingType::Residential.traffic_load(), 1.0);
        assert_eq!(BuildingType::Park.traffic_load(), 0.0);
        assert_eq!(BuildingType::Road.traffic_load(), 0.0);
    }
}
