use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use microcity::{
    collab::{CollabHub, LocalGoalGenerator, LocalNewsGenerator},
    engine::Engine,
    news::NewsKind,
    save::{self, Autosave},
    settings::{GameSettings, SettingsLoader},
    web::{self, CityFrame},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "microcity headless simulation runner")]
struct Cli {
    /// Path to a city settings YAML file (built-in defaults when omitted)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Override tick count (runs until Ctrl-C when neither this nor the
    /// settings file give one)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Load a previously saved city before running
    #[arg(long)]
    load: Option<PathBuf>,

    /// Where autosaves are written
    #[arg(long, default_value = "city_save.json")]
    save_path: PathBuf,

    /// Serve the read-only observer feed
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,
}

/// Odds per tick of asking the news generator for a flavor item.
const NEWS_FETCH_CHANCE: f64 = 0.15;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => SettingsLoader::new(".").load(path)?,
        None => GameSettings::default_city(),
    };
    let seed = cli.seed.unwrap_or(settings.seed);

    let mut state = settings.build_state();
    if let Some(path) = &cli.load {
        match save::load_from_path(path) {
            Ok(record) => {
                record.restore(&mut state);
                info!(path = %path.display(), day = state.stats.day, "city restored");
            }
            Err(err) => warn!(%err, "could not load save; starting fresh"),
        }
    }

    let mut engine = Engine::standard(seed);
    let mut hub = CollabHub::new(
        Arc::new(LocalGoalGenerator::new(seed ^ 0xA5A5)),
        Arc::new(LocalNewsGenerator::new(seed ^ 0x5A5A)),
    );
    let autosave = Autosave::new(cli.save_path.clone(), settings.autosave_every_ticks);
    let mut fetch_rng = ChaCha8Rng::seed_from_u64(seed ^ 0x0F0F);

    let observer = if cli.serve {
        let (handle, serve) = web::observer(settings.name.clone(), cli.host.clone(), cli.port);
        tokio::spawn(async move {
            if let Err(err) = serve.await {
                warn!(%err, "observer feed stopped");
            }
        });
        Some(handle)
    } else {
        None
    };

    let total_ticks = settings.ticks(cli.ticks);
    let mut interval = tokio::time::interval(Duration::from_millis(settings.tick_interval_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut completed = 0u64;
    loop {
        if let Some(total) = total_ticks {
            if completed >= total {
                break;
            }
        }
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted; stopping");
                break;
            }
        }

        // Collaborator results land only at this safe point between ticks.
        hub.drain(&mut state);
        if state.goal.as_ref().is_some_and(|goal| goal.completed) {
            let _ = state.claim_goal();
        }

        let summary = engine.tick(&mut state)?;
        completed += 1;

        if state.ai_enabled {
            if state.goal.is_none() && !hub.goal_request_pending() {
                hub.request_goal(state.stats.clone(), state.grid.clone());
            }
            // Disasters own the headlines on the tick they strike.
            if summary.disaster.is_none() && fetch_rng.gen::<f64>() < NEWS_FETCH_CHANCE {
                hub.request_news(state.stats.clone(), "daily bulletin".to_string());
            }
        }

        if let Some(Err(_)) = autosave.maybe_save(summary.day, &state) {
            state.news.push(
                NewsKind::Negative,
                "City archive failed to record the latest census",
            );
        }

        if let Some(handle) = &observer {
            handle.publish(CityFrame::capture(&state, summary.clone()));
        }
    }

    println!(
        "City '{}' simulated {} days. Population {}, happiness {}, treasury ${:.0}.",
        settings.name,
        state.stats.day,
        state.stats.population,
        state.stats.happiness,
        state.stats.money
    );
    Ok(())
}
