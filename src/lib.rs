pub mod actions;
pub mod catalog;
pub mod collab;
pub mod engine;
pub mod goals;
pub mod grid;
pub mod news;
pub mod rng;
pub mod save;
pub mod session;
pub mod settings;
pub mod stats;
pub mod systems;
pub mod web;

pub use engine::{Engine, EngineBuilder, System, TickSummary};
pub use session::CityState;
pub use settings::GameSettings;
