use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::Identity;
use crate::state::AppState;

#[derive(Serialize)]
pub struct TokenResponse {
    token: String,
}

// POST /jwt
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Identity>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(identity) = payload?;
    tracing::info!(email = %identity.email, "issuing access token");

    let token = state.tokens.issue(identity)?;
    Ok(Json(TokenResponse { token }))
}
