use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    feed::{FeedState, FeedView, PlayerEvent},
    middleware::RequestId,
    models::VideoRecord,
    services::{AuthProvider, Route, User},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SelectVideoRequest {
    pub video: VideoRecord,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub user_id: String,
    pub email: Option<String>,
}

/// The feed as a renderer needs it
#[derive(Debug, Serialize)]
pub struct FeedSnapshot {
    pub state: FeedState,
    pub view: FeedView,
    /// Latest navigation intent, if any
    pub redirect: Option<Route>,
}

async fn snapshot(state: &AppState) -> FeedSnapshot {
    let feed = state.controller.snapshot().await;
    FeedSnapshot {
        view: feed.view(),
        state: feed,
        redirect: state.routes.latest(),
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Current feed state and view
pub async fn get_feed(State(state): State<AppState>) -> Json<FeedSnapshot> {
    Json(snapshot(&state).await)
}

/// A card was clicked; the selection lands after the transition delay
pub async fn select_video(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SelectVideoRequest>,
) -> (StatusCode, Json<FeedSnapshot>) {
    tracing::info!(
        request_id = %request_id,
        video_id = ?request.video.id,
        "Video selected"
    );
    state.controller.select_video(request.video).await;
    (StatusCode::ACCEPTED, Json(snapshot(&state).await))
}

/// Back to the grid after the transition delay
pub async fn go_back(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> (StatusCode, Json<FeedSnapshot>) {
    tracing::info!(request_id = %request_id, "Back to feed");
    state.controller.go_back().await;
    (StatusCode::ACCEPTED, Json(snapshot(&state).await))
}

/// Notification from the embedded player
pub async fn player_event(
    State(state): State<AppState>,
    Json(event): Json<PlayerEvent>,
) -> Json<FeedSnapshot> {
    state.controller.player_event(event).await;
    Json(snapshot(&state).await)
}

/// Start a demo session
pub async fn sign_in(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SignInRequest>,
) -> AppResult<StatusCode> {
    let user_id = request.user_id.trim();
    if user_id.is_empty() {
        tracing::warn!(request_id = %request_id, "Sign-in without a user id");
        return Err(AppError::InvalidInput("user_id cannot be empty".to_string()));
    }

    tracing::info!(request_id = %request_id, user_id = %user_id, "Signing in");

    state.auth.sign_in(User {
        id: user_id.to_string(),
        email: request.email,
    });
    Ok(StatusCode::OK)
}

/// End the current session
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<StatusCode> {
    let Some(user) = state.auth.current_user().await else {
        tracing::warn!(request_id = %request_id, "Sign-out without a session");
        return Err(AppError::Unauthenticated);
    };

    tracing::info!(request_id = %request_id, user_id = %user.id, "Signing out");

    state.controller.sign_out().await?;
    Ok(StatusCode::OK)
}
