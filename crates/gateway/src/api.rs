//! Route handlers.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use runcoach_agent::ChatReply;
use runcoach_core::UserProfile;
use runcoach_knowledge::IndexStatus;

use crate::SharedState;

/// Conversation starters offered by the frontend.
pub const QUICK_QUESTIONS: [&str; 6] = [
    "🏃 How do I start running as a beginner?",
    "🍎 What should I eat before a run?",
    "💪 Create a training plan for me",
    "🤕 How can I prevent injuries?",
    "⏱️ What's a good warm-up routine?",
    "🎯 Help me prepare for a 5K",
];

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: &'static str,
    knowledge: IndexStatus,
}

pub async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "RunCoach AI is running! 🏃",
        knowledge: state.coach.index().status().await,
    })
}

#[derive(Deserialize)]
pub struct ChatRequest {
    message: String,
    #[serde(default)]
    user_profile: Option<UserProfile>,
    #[serde(default)]
    session_id: Option<String>,
}

pub async fn chat_handler(State(state): State<SharedState>, Json(payload): Json<ChatRequest>) -> Json<ChatReply> {
    let profile = match payload.user_profile {
        Some(profile) => Some(profile),
        None => state.profile().await,
    };

    let session = state.session(payload.session_id.as_deref()).await;
    Json(session.chat(&payload.message, profile.as_ref()).await)
}

#[derive(Serialize)]
pub struct ProfileSaved {
    message: &'static str,
    profile: UserProfile,
}

pub async fn save_profile_handler(
    State(state): State<SharedState>,
    Json(profile): Json<UserProfile>,
) -> Json<ProfileSaved> {
    info!(goal = ?profile.goal(), "Profile saved");
    state.set_profile(profile.clone()).await;
    Json(ProfileSaved { message: "Profile saved!", profile })
}

pub async fn get_profile_handler(State(state): State<SharedState>) -> Json<serde_json::Value> {
    let profile = state
        .profile()
        .await
        .and_then(|p| serde_json::to_value(p).ok())
        .unwrap_or_else(|| serde_json::json!({}));
    Json(profile)
}

#[derive(Default, Deserialize)]
struct ResetRequest {
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    message: &'static str,
}

/// The body is optional: an empty request resets the default session.
pub async fn reset_handler(State(state): State<SharedState>, body: Bytes) -> Response {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ResetRequest::default()
    } else {
        match serde_json::from_slice::<ResetRequest>(&body) {
            Ok(request) => request,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": e.to_string() })))
                    .into_response();
            }
        }
    };

    state.reset_session(request.session_id.as_deref()).await;
    Json(MessageResponse { message: "Chat history cleared!" }).into_response()
}

#[derive(Deserialize)]
pub struct SearchParams {
    query: String,
    #[serde(default)]
    k: Option<usize>,
}

#[derive(Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: String,
    pub sources: Vec<String>,
}

pub async fn search_handler(State(state): State<SharedState>, Query(params): Query<SearchParams>) -> Response {
    let k = params
        .k
        .filter(|k| *k > 0)
        .unwrap_or(state.coach.index().config().search_top_k);

    match state.coach.direct_search(&params.query, k).await {
        Ok(found) => Json(SearchResponse {
            results: found.context,
            sources: found.sources,
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "Knowledge search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn quick_questions_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "questions": QUICK_QUESTIONS }))
}
