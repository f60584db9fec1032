//! Registration and login endpoints.
//!
//! Both are reachable without credentials. Every other endpoint takes the
//! user from HTTP Basic credentials, so `login` only checks them.

use api_types::user::{Credentials, UserSession};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Credentials>,
) -> Result<Json<UserSession>, ServerError> {
    let user = state
        .engine
        .register(&payload.username, &payload.password)
        .await?;
    tracing::info!("registered user {}", user.username);

    Ok(Json(UserSession {
        message: "User registered successfully".to_string(),
        user_id: user.id,
        username: user.username,
    }))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<Credentials>,
) -> Result<Json<UserSession>, ServerError> {
    let user = state
        .engine
        .authenticate(&payload.username, &payload.password)
        .await?;

    Ok(Json(UserSession {
        message: "Login successful".to_string(),
        user_id: user.id,
        username: user.username,
    }))
}
