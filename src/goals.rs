//! Externally supplied objectives and their completion predicates.

use serde::{Deserialize, Serialize};

use crate::catalog::BuildingType;
use crate::grid::BuildingCounts;
use crate::stats::CityStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalTarget {
    Population,
    Money,
    BuildingCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiGoal {
    pub description: String,
    pub target_type: GoalTarget,
    pub target_value: f64,
    /// Which building to count for `BuildingCount` goals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_type: Option<BuildingType>,
    pub reward: f64,
    #[serde(default)]
    pub completed: bool,
}

impl AiGoal {
    pub fn is_satisfied(&self, stats: &CityStats, counts: &BuildingCounts) -> bool {
        match self.target_type {
            GoalTarget::Money => stats.money >= self.target_value,
            GoalTarget::Population => f64::from(stats.population) >= self.target_value,
            GoalTarget::BuildingCount => self
                .building_type
                .map_or(false, |kind| f64::from(counts.get(kind)) >= self.target_value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target_type: GoalTarget, target_value: f64) -> AiGoal {
        AiGoal {
            description: "test".into(),
            target_type,
            target_value,
            building_type: None,
            reward: 100.0,
            completed: false,
        }
    }

    #[test]
    fn money_goal_is_a_threshold() {
        let mut stats = CityStats::new(29_999.0);
        let counts = BuildingCounts::default();
        let goal = goal(GoalTarget::Money, 30_000.0);
        assert!(!goal.is_satisfied(&stats, &counts));
        stats.money = 30_000.0;
        assert!(goal.is_satisfied(&stats, &counts));
    }

    #[test]
    fn building_goal_needs_a_type() {
        let stats = CityStats::new(0.0);
        let mut counts = BuildingCounts::default();
        counts.add(BuildingType::Park);
        counts.add(BuildingType::Park);

        let mut goal = goal(GoalTarget::BuildingCount, 2.0);
        // No building type named: never satisfied, never panics.
        assert!(!goal.is_satisfied(&stats, &counts));
        goal.building_type = Some(BuildingType::Park);
        assert!(goal.is_satisfied(&stats, &counts));
    }
}
