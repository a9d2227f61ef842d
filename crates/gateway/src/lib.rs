//! HTTP API gateway for RunCoach.
//!
//! Serves the chat, profile, reset and knowledge search endpoints used by
//! the web frontend. Built on Axum.

pub mod api;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use runcoach_agent::{Coach, CoachSession};
use runcoach_config::AppConfig;
use runcoach_core::UserProfile;

/// Session used when a request names none.
pub const DEFAULT_SESSION: &str = "default";

/// Maximum number of live chat sessions before the least recently used is
/// evicted.
pub const MAX_SESSIONS: usize = 1_000;

struct SessionEntry {
    session: Arc<CoachSession>,
    last_used: u64,
}

/// Shared application state for the gateway.
pub struct GatewayState {
    pub coach: Arc<Coach>,
    pub allowed_origins: Vec<String>,
    sessions: Mutex<HashMap<String, SessionEntry>>,
    max_sessions: usize,
    clock: AtomicU64,
    profile: RwLock<Option<UserProfile>>,
}

fn session_key(id: Option<&str>) -> &str {
    id.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SESSION)
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    pub fn new(coach: Arc<Coach>, allowed_origins: Vec<String>) -> Self {
        Self {
            coach,
            allowed_origins,
            sessions: Mutex::new(HashMap::new()),
            max_sessions: MAX_SESSIONS,
            clock: AtomicU64::new(0),
            profile: RwLock::new(None),
        }
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    /// The session with this id, created on first use.
    ///
    /// Opening a session when the cap is reached evicts the one that has
    /// gone unused the longest.
    pub async fn session(&self, id: Option<&str>) -> Arc<CoachSession> {
        let id = session_key(id);
        let mut sessions = self.sessions.lock().await;

        if let Some(entry) = sessions.get_mut(id) {
            entry.last_used = self.tick();
            return entry.session.clone();
        }

        if sessions.len() >= self.max_sessions {
            if let Some(stale) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone())
            {
                sessions.remove(&stale);
                info!(session = %stale, "Evicted least recently used chat session");
            }
        }

        info!(session = %id, "Opening chat session");
        let session = Arc::new(self.coach.session());
        sessions.insert(
            id.to_string(),
            SessionEntry {
                session: session.clone(),
                last_used: self.tick(),
            },
        );
        session
    }

    /// Clear a session's memory and drop it.
    pub async fn reset_session(&self, id: Option<&str>) {
        let removed = self.sessions.lock().await.remove(session_key(id));
        if let Some(entry) = removed {
            entry.session.reset_memory().await;
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of live chat sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn profile(&self) -> Option<UserProfile> {
        self.profile.read().await.clone()
    }

    pub async fn set_profile(&self, profile: UserProfile) {
        *self.profile.write().await = Some(profile);
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route("/", get(api::health_handler))
        .route("/api/chat", post(api::chat_handler))
        .route("/api/profile", get(api::get_profile_handler).post(api::save_profile_handler))
        .route("/api/reset", post(api::reset_handler))
        .route("/api/search", get(api::search_handler))
        .route("/api/quick-questions", get(api::quick_questions_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
///
/// The knowledge index is prepared before the listener opens. A setup
/// failure is logged and the server still starts; chat turns then report
/// the error until documents are added.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let coach = Arc::new(Coach::from_config(&config)?);
    if let Err(e) = coach.initialize().await {
        warn!(error = %e, "Knowledge base not ready at startup");
    }

    let state = Arc::new(GatewayState::new(coach, config.gateway.allowed_origins.clone()));
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
