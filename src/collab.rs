//! External collaborator seam: goal and news generation.
//!
//! Generators run off the simulation thread; results come back through a
//! channel the runner drains between ticks, so a slow or failed call can
//! never stall the clock. At most one goal request is in flight at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tracing::warn;

use crate::catalog::BuildingType;
use crate::goals::{AiGoal, GoalTarget};
use crate::grid::Grid;
use crate::news::{NewsItem, NewsKind};
use crate::session::CityState;
use crate::stats::CityStats;

pub trait GoalGenerator: Send + Sync {
    fn generate_goal(&self, stats: &CityStats, grid: &Grid) -> Result<Option<AiGoal>>;
}

pub trait NewsGenerator: Send + Sync {
    /// `context` is a short free-form hint about what prompted the fetch
    /// (e.g. "daily bulletin", "goal claimed").
    fn generate_news(&self, stats: &CityStats, context: &str) -> Result<Option<NewsItem>>;
}

#[derive(Debug, Clone)]
pub enum CollabMessage {
    Goal(AiGoal),
    News(NewsItem),
}

pub fn apply_message(state: &mut CityState, message: CollabMessage) {
    match message {
        CollabMessage::Goal(goal) => {
            state.offer_goal(goal);
        }
        CollabMessage::News(item) => state.news.push_item(item),
    }
}

/// Owns the worker side of the collaborator seam. Requests spawn blocking
/// tasks on the tokio runtime; `drain` applies whatever has arrived.
pub struct CollabHub {
    goal_gen: Arc<dyn GoalGenerator>,
    news_gen: Arc<dyn NewsGenerator>,
    tx: mpsc::UnboundedSender<CollabMessage>,
    rx: mpsc::UnboundedReceiver<CollabMessage>,
    goal_in_flight: Arc<AtomicBool>,
}

impl CollabHub {
    pub fn new(goal_gen: Arc<dyn GoalGenerator>, news_gen: Arc<dyn NewsGenerator>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            goal_gen,
            news_gen,
            tx,
            rx,
            goal_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn goal_request_pending(&self) -> bool {
        self.goal_in_flight.load(Ordering::SeqCst)
    }

    /// Kick off a goal request unless one is already running.
    pub fn request_goal(&self, stats: CityStats, grid: Grid) {
        if self
            .goal_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }
        let generator = self.goal_gen.clone();
        let tx = self.tx.clone();
        let flag = self.goal_in_flight.clone();
        tokio::task::spawn_blocking(move || {
            match generator.generate_goal(&stats, &grid) {
                Ok(Some(goal)) => {
                    let _ = tx.send(CollabMessage::Goal(goal));
                }
                Ok(None) => {}
                Err(err) => warn!(%err, "goal generation failed; will retry later"),
            }
            flag.store(false, Ordering::SeqCst);
        });
    }

    /// News requests are not deduplicated; appends are idempotent enough.
    pub fn request_news(&self, stats: CityStats, context: String) {
        let generator = self.news_gen.clone();
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            match generator.generate_news(&stats, &context) {
                Ok(Some(item)) => {
                    let _ = tx.send(CollabMessage::News(item));
                }
                Ok(None) => {}
                Err(err) => warn!(%err, "news generation failed; skipping"),
            }
        });
    }

    /// Apply every result that has arrived. Called between ticks only.
    pub fn drain(&mut self, state: &mut CityState) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            apply_message(state, message);
            applied += 1;
        }
        applied
    }
}

/// Offline goal generator: derives a reachable objective from current stats.
pub struct LocalGoalGenerator {
    rng: Mutex<ChaCha8Rng>,
}

impl LocalGoalGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

const COUNT_GOAL_KINDS: [BuildingType; 5] = [
    BuildingType::Park,
    BuildingType::School,
    BuildingType::Hospital,
    BuildingType::PoliceStation,
    BuildingType::Residential,
];

impl GoalGenerator for LocalGoalGenerator {
    fn generate_goal(&self, stats: &CityStats, grid: &Grid) -> Result<Option<AiGoal>> {
        let mut rng = self.rng.lock().expect("goal rng lock poisoned");
        let goal = match rng.gen_range(0..3u8) {
            0 => {
                let target = ((stats.money.max(0.0) * 1.5 + 1_000.0) / 100.0).ceil() * 100.0;
                AiGoal {
                    description: format!("Grow the treasury to ${target:.0}"),
                    target_type: GoalTarget::Money,
                    target_value: target,
                    building_type: None,
                    reward: (target * 0.05).round(),
                    completed: false,
                }
            }
            1 => {
                let target = f64::from(stats.population) + f64::from(rng.gen_range(25u32..=75));
                AiGoal {
                    description: format!("Reach a population of {target:.0}"),
                    target_type: GoalTarget::Population,
                    target_value: target,
                    building_type: None,
                    reward: f64::from(rng.gen_range(3..=8u32)) * 100.0,
                    completed: false,
                }
            }
            _ => {
                let kind = COUNT_GOAL_KINDS[rng.gen_range(0..COUNT_GOAL_KINDS.len())];
                let target = f64::from(grid.counts().get(kind) + rng.gen_range(1..=3u32));
                AiGoal {
                    description: format!("Operate {target:.0} {}s", kind.label()),
                    target_type: GoalTarget::BuildingCount,
                    target_value: target,
                    building_type: Some(kind),
                    reward: kind.config().cost * target,
                    completed: false,
                }
            }
        };
        Ok(Some(goal))
    }
}

/// Offline news generator: flavor lines keyed off the city's worst stat.
pub struct LocalNewsGenerator {
    rng: Mutex<ChaCha8Rng>,
}

impl LocalNewsGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl NewsGenerator for LocalNewsGenerator {
    fn generate_news(&self, stats: &CityStats, _context: &str) -> Result<Option<NewsItem>> {
        let mut candidates: Vec<(NewsKind, &str)> = Vec::new();
        if stats.pollution > 60 {
            candidates.push((NewsKind::Negative, "Smog warning issued for the valley"));
        }
        if stats.traffic_congestion > 70 {
            candidates.push((NewsKind::Negative, "Gridlock reported on every arterial"));
        }
        if stats.happiness > 80 {
            candidates.push((NewsKind::Positive, "Residents rate the city best in the region"));
        }
        if stats.money < 0.0 {
            candidates.push((NewsKind::Negative, "Auditors flag the city's mounting debt"));
        }
        candidates.push((NewsKind::Neutral, "Farmers market returns to the plaza"));
        candidates.push((NewsKind::Neutral, "Transit authority publishes annual report"));

        let mut rng = self.rng.lock().expect("news rng lock poisoned");
        let (kind, text) = candidates[rng.gen_range(0..candidates.len())];
        Ok(Some(NewsItem {
            id: 0,
            text: text.to_string(),
            kind,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_goals_are_beyond_current_stats() {
        let generator = LocalGoalGenerator::new(5);
        let stats = CityStats::new(1_000.0);
        let grid = Grid::new(4);
        for _ in 0..20 {
            let goal = generator.generate_goal(&stats, &grid).unwrap().unwrap();
            assert!(!goal.completed);
            assert!(goal.reward > 0.0);
            assert!(!goal.is_satisfied(&stats, &grid.counts()));
        }
    }

    #[test]
    fn duplicate_goal_messages_do_not_replace_the_active_goal() {
        let mut state = CityState::new(4, 0.0);
        let first = AiGoal {
            description: "first".into(),
            target_type: GoalTarget::Money,
            target_value: 10.0,
            building_type: None,
            reward: 1.0,
            completed: false,
        };
        let mut second = first.clone();
        second.description = "second".into();
        apply_message(&mut state, CollabMessage::Goal(first));
        apply_message(&mut state, CollabMessage::News(NewsItem {
            id: 0,
            text: "x".into(),
            kind: NewsKind::Neutral,
        }));
        apply_message(&mut state, CollabMessage::Goal(second));
        assert_eq!(state.goal.as_ref().unwrap().description, "first");
    }

    #[test]
    fn local_news_always_produces_an_item() {
        let generator = LocalNewsGenerator::new(9);
        let stats = CityStats::new(0.0);
        for _ in 0..10 {
            let item = generator
                .generate_news(&stats, "daily bulletin")
                .unwrap()
                .unwrap();
            assert!(!item.text.is_empty());
        }
    }
}
