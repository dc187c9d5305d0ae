//! Goal tracker: latches completion of the active objective once the tick's
//! stats satisfy its predicate.

use anyhow::Result;
use tracing::info;

use crate::engine::{System, TickContext};
use crate::news::NewsKind;
use crate::rng::SystemRng;
use crate::session::CityState;

pub struct GoalSystem;

impl GoalSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GoalSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for GoalSystem {
    fn name(&self) -> &'static str {
        "goal"
    }

    fn run(
        &mut self,
        _ctx: &TickContext,
        state: &mut CityState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let completed = match state.goal.as_mut() {
            Some(goal)
                if !goal.completed
                    && goal.is_satisfied(&state.stats, &state.ledger.counts) =>
            {
                goal.completed = true;
                Some(goal.description.clone())
            }
            _ => None,
        };
        if let Some(description) = completed {
            state.ledger.goal_completed = true;
            state
                .news
                .push(NewsKind::Positive, format!("Goal complete: {description}"));
            info!(goal = %description, "goal completed");
        }
        Ok(())
    }
}
