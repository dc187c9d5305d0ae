//! Read-only observer feed for external renderers: the latest city frame as
//! JSON plus a server-sent event stream of frames. Never mutates the
//! simulation; player intent comes back through the action handlers only.

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Result;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::info;

use crate::engine::TickSummary;
use crate::grid::Grid;
use crate::news::NewsItem;
use crate::session::CityState;
use crate::stats::CityStats;

/// Everything a renderer needs to draw one tick.
#[derive(Clone, Serialize)]
pub struct CityFrame {
    pub summary: TickSummary,
    pub stats: CityStats,
    pub grid: Grid,
    pub news: Vec<NewsItem>,
}

impl CityFrame {
    pub fn capture(state: &CityState, summary: TickSummary) -> Self {
        Self {
            summary,
            stats: state.stats.clone(),
            grid: state.grid.clone(),
            news: state.news.items().cloned().collect(),
        }
    }
}

#[derive(Clone, Serialize)]
pub struct StateEnvelope {
    pub city: String,
    pub frame: Option<CityFrame>,
}

struct AppState {
    city_name: String,
    broadcaster: broadcast::Sender<String>,
    latest_frame: Arc<Mutex<Option<CityFrame>>>,
}

/// Handle the runner publishes frames through after each tick.
#[derive(Clone)]
pub struct ObserverHandle {
    broadcaster: broadcast::Sender<String>,
    latest_frame: Arc<Mutex<Option<CityFrame>>>,
}

impl ObserverHandle {
    pub fn publish(&self, frame: CityFrame) {
        {
            let mut guard = self.latest_frame.lock().expect("latest frame lock poisoned");
            *guard = Some(frame.clone());
        }
        if let Ok(payload) = serde_json::to_string(&frame) {
            let _ = self.broadcaster.send(payload);
        }
    }
}

/// Build the observer server. Returns the publish handle and the serve
/// future; the caller decides whether to spawn or await it.
pub fn observer(
    city_name: String,
    host: String,
    port: u16,
) -> (ObserverHandle, impl std::future::Future<Output = Result<()>>) {
    let (tx, _) = broadcast::channel::<String>(256);
    let latest_frame: Arc<Mutex<Option<CityFrame>>> = Arc::new(Mutex::new(None));
    let handle = ObserverHandle {
        broadcaster: tx.clone(),
        latest_frame: latest_frame.clone(),
    };
    let state = Arc::new(AppState {
        city_name,
        broadcaster: tx,
        latest_frame,
    });
    let serve = async move {
        let router = Router::new()
            .route("/api/state", get(latest_state))
            .route("/api/events", get(stream_events))
            .with_state(state);
        let addr: SocketAddr = format!("{host}:{port}").parse()?;
        info!(%addr, "observer feed listening");
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;
        Ok(())
    };
    (handle, serve)
}

async fn latest_state(State(state): State<Arc<AppState>>) -> Json<StateEnvelope> {
    let frame = state
        .latest_frame
        .lock()
        .expect("latest frame lock poisoned")
        .clone();
    Json(StateEnvelope {
        city: state.city_name.clone(),
        frame,
    })
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}
