//! Aggregate city statistics. Rewritten once per tick by the growth system
//! and synchronously by player economic actions.
//!
//! Every field added after the first release carries a serde default so old
//! save records keep loading.

use serde::{Deserialize, Serialize};

use crate::catalog::{BudgetCategory, BuildingType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Sunny,
    Rainy,
    Snowy,
}

pub const SLIDER_MAX: u32 = 100;

fn full_slider() -> u32 {
    SLIDER_MAX
}

/// Seven per-category funding sliders, 0-100. A slider scales its category's
/// generation only; demand is never budget-scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSliders {
    #[serde(default = "full_slider")]
    pub infrastructure: u32,
    #[serde(default = "full_slider")]
    pub power: u32,
    #[serde(default = "full_slider")]
    pub water: u32,
    #[serde(default = "full_slider")]
    pub education: u32,
    #[serde(default = "full_slider")]
    pub healthcare: u32,
    #[serde(default = "full_slider")]
    pub safety: u32,
    #[serde(default = "full_slider")]
    pub environment: u32,
}

impl Default for BudgetSliders {
    fn default() -> Self {
        Self {
            infrastructure: SLIDER_MAX,
            power: SLIDER_MAX,
            water: SLIDER_MAX,
            education: SLIDER_MAX,
            healthcare: SLIDER_MAX,
            safety: SLIDER_MAX,
            environment: SLIDER_MAX,
        }
    }
}

impl BudgetSliders {
    pub fn level(&self, category: BudgetCategory) -> u32 {
        match category {
            BudgetCategory::Infrastructure => self.infrastructure,
            BudgetCategory::Power => self.power,
            BudgetCategory::Water => self.water,
            BudgetCategory::Education => self.education,
            BudgetCategory::Healthcare => self.healthcare,
            BudgetCategory::Safety => self.safety,
            BudgetCategory::Environment => self.environment,
        }
    }

    pub fn set(&mut self, category: BudgetCategory, value: u32) {
        let value = value.min(SLIDER_MAX);
        match category {
            BudgetCategory::Infrastructure => self.infrastructure = value,
            BudgetCategory::Power => self.power = value,
            BudgetCategory::Water => self.water = value,
            BudgetCategory::Education => self.education = value,
            BudgetCategory::Healthcare => self.healthcare = value,
            BudgetCategory::Safety => self.safety = value,
            BudgetCategory::Environment => self.environment = value,
        }
    }

    /// Generation multiplier for a building: its category slider / 100,
    /// or 1.0 for buildings no slider funds.
    pub fn multiplier(&self, kind: BuildingType) -> f64 {
        match kind.budget_category() {
            Some(category) => f64::from(self.level(category)) / f64::from(SLIDER_MAX),
            None => 1.0,
        }
    }
}

fn default_happiness() -> u32 {
    100
}

fn default_coverage() -> u32 {
    100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityStats {
    pub money: f64,
    pub population: u32,
    pub day: u64,
    #[serde(default = "default_happiness")]
    pub happiness: u32,
    #[serde(default)]
    pub pollution: u32,
    #[serde(default)]
    pub weather: Weather,
    #[serde(default)]
    pub power_supply: f64,
    #[serde(default)]
    pub power_demand: f64,
    #[serde(default)]
    pub water_supply: f64,
    #[serde(default)]
    pub water_demand: f64,
    #[serde(default = "default_coverage")]
    pub education_coverage: u32,
    #[serde(default = "default_coverage")]
    pub healthcare_coverage: u32,
    #[serde(default)]
    pub goods_supply: f64,
    #[serde(default)]
    pub goods_demand: f64,
    #[serde(default = "default_coverage")]
    pub safety_coverage: u32,
    #[serde(default)]
    pub traffic_congestion: u32,
    #[serde(default)]
    pub budget: BudgetSliders,
}

impl CityStats {
    pub fn new(starting_money: f64) -> Self {
        Self {
            money: starting_money,
            population: 0,
            day: 0,
            happiness: default_happiness(),
            pollution: 0,
            weather: Weather::default(),
            power_supply: 0.0,
            power_demand: 0.0,
            water_supply: 0.0,
            water_demand: 0.0,
            education_coverage: default_coverage(),
            healthcare_coverage: default_coverage(),
            goods_supply: 0.0,
            goods_demand: 0.0,
            safety_coverage: default_coverage(),
            traffic_congestion: 0,
            budget: BudgetSliders::default(),
        }
    }

    /// Clamp percent-valued fields carried in from an untrusted record.
    pub fn sanitize(&mut self) {
        self.happiness = self.happiness.min(100);
        self.pollution = self.pollution.min(100);
        self.education_coverage = self.education_coverage.min(100);
        self.healthcare_coverage = self.healthcare_coverage.min(100);
        self.safety_coverage = self.safety_coverage.min(100);
        self.traffic_congestion = self.traffic_congestion.min(100);
        self.budget.infrastructure = self.budget.infrastructure.min(SLIDER_MAX);
        self.budget.power = self.budget.power.min(SLIDER_MAX);
        self.budget.water = self.budget.water.min(SLIDER_MAX);
        self.budget.education = self.budget.education.min(SLIDER_MAX);
        self.budget.healthcare = self.budget.healthcare.min(SLIDER_MAX);
        self.budget.safety = self.budget.safety.min(SLIDER_MAX);
        self.budget.environment = self.budget.environment.min(SLIDER_MAX);
    }
}
