use std::sync::Arc;
use axum::{
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::warn;
use crate::coordinator::{Coordinator, InboundMessage};
use crate::directory::StaticDirectory;
use crate::member::MemberId;
use crate::session::{ChallengeSession, SessionState};
use crate::stats::MemberStats;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub directory: Arc<StaticDirectory>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub notifications: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RosterRequest {
    pub members: Vec<MemberId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub state: SessionState,
    pub session: Option<ChallengeSession>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Webhook-style transport: the chat integration posts each message and
/// relays the returned notifications to the channel, in order.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/messages", post(handle_message))
        .route("/channels/{channel}/members", put(set_members))
        .route("/stats/{member}", get(get_stats))
        .route("/session", get(get_session))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "kartbot",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "handle_message": "POST /messages",
            "set_members": "PUT /channels/{channel}/members",
            "get_stats": "GET /stats/{member}",
            "get_session": "GET /session"
        }
    }))
}

async fn handle_message(
    AxumState(state): AxumState<AppState>,
    Json(message): Json<InboundMessage>,
) -> Json<MessageResponse> {
    let notifications = state.coordinator.handle(&message).await;
    Json(MessageResponse { notifications })
}

async fn set_members(
    AxumState(state): AxumState<AppState>,
    Path(channel): Path<String>,
    Json(request): Json<RosterRequest>,
) -> StatusCode {
    state.directory.set_members(&channel, request.members);
    StatusCode::NO_CONTENT
}

async fn get_stats(
    AxumState(state): AxumState<AppState>,
    Path(member): Path<String>,
) -> Result<Json<MemberStats>, (StatusCode, Json<ErrorResponse>)> {
    let member = MemberId::new(&member);
    state
        .coordinator
        .ledger()
        .get_stats(&member)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(error = %e, member = %member, "stats lookup failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse { error: e.to_string() }),
            )
        })
}

async fn get_session(AxumState(state): AxumState<AppState>) -> Json<SessionResponse> {
    let session = state.coordinator.session().await;
    Json(SessionResponse {
        state: SessionState::of(session.as_ref()),
        session,
    })
}
