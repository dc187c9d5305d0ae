//! Tick engine: runs the simulation systems in a fixed order against the
//! session, one discrete tick at a time.

use anyhow::Result;
use serde::Serialize;

use crate::rng::{RngManager, SystemRng};
use crate::session::{CityState, DisasterReport, ResourceLedger};
use crate::systems::{DisasterSystem, GoalSystem, GrowthSystem, ResourceSystem};

pub struct TickContext {
    /// Day counter at the start of the tick.
    pub day: u64,
}

pub trait System {
    fn name(&self) -> &'static str;
    fn run(&mut self, ctx: &TickContext, state: &mut CityState, rng: &mut SystemRng<'_>)
        -> Result<()>;
}

pub struct EngineBuilder {
    seed: u64,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.seed),
            systems: self.systems,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
}

impl Engine {
    /// The canonical system ordering: resource accounting, then disasters,
    /// then growth, then goal tracking. Order matters; the later systems
    /// consume what the earlier ones wrote into the ledger.
    pub fn standard(seed: u64) -> Engine {
        EngineBuilder::new(seed)
            .with_system(ResourceSystem::new())
            .with_system(DisasterSystem::new())
            .with_system(GrowthSystem::new())
            .with_system(GoalSystem::new())
            .build()
    }

    pub fn tick(&mut self, state: &mut CityState) -> Result<TickSummary> {
        state.ledger = ResourceLedger::default();
        let ctx = TickContext {
            day: state.stats.day,
        };
        for system in &mut self.systems {
            let mut stream = self.rng.stream(system.name());
            system.run(&ctx, state, &mut stream)?;
        }
        state.stats.day += 1;
        Ok(TickSummary {
            day: state.stats.day,
            net_income: state.ledger.income - state.ledger.maintenance,
            population: state.stats.population,
            happiness: state.stats.happiness,
            disaster: state.ledger.disaster,
            goal_completed: state.ledger.goal_completed,
        })
    }

    pub fn run(&mut self, state: &mut CityState, ticks: u64) -> Result<()> {
        self.run_with_hook(state, ticks, |_| {})
    }

    pub fn run_with_hook(
        &mut self,
        state: &mut CityState,
        ticks: u64,
        mut hook: impl FnMut(&TickSummary),
    ) -> Result<()> {
        for _ in 0..ticks {
            let summary = self.tick(state)?;
            hook(&summary);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TickSummary {
    pub day: u64,
    pub net_income: f64,
    pub population: u32,
    pub happiness: u32,
    pub disaster: Option<DisasterReport>,
    pub goal_completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSystem {
        calls: u32,
    }

    impl System for CountingSystem {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn run(
            &mut self,
            _ctx: &TickContext,
            _state: &mut CityState,
            _rng: &mut SystemRng<'_>,
        ) -> Result<()> {
            self.calls += 1;
            Ok(())
        }
    }

    #[test]
    fn tick_advances_the_day() {
        let mut engine = EngineBuilder::new(1)
            .with_system(CountingSystem { calls: 0 })
            .build();
        let mut state = CityState::new(4, 0.0);
        let first = engine.tick(&mut state).unwrap();
        let second = engine.tick(&mut state).unwrap();
        assert_eq!(first.day, 1);
        assert_eq!(second.day, 2);
        assert_eq!(state.stats.day, 2);
    }

    #[test]
    fn hook_sees_every_tick() {
        let mut engine = Engine::standard(9);
        let mut state = CityState::new(4, 0.0);
        let mut days = Vec::new();
        engine
            .run_with_hook(&mut state, 5, |summary| days.push(summary.day))
            .unwrap();
        assert_eq!(days, vec![1, 2, 3, 4, 5]);
    }
}
