//! Login endpoint

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::Credentials;

/// Token issued on successful login
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /login - exchange credentials for a bearer token
///
/// A credential mismatch is answered with 401 and no token.
async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(credentials) = body?;

    if !state.credentials.verify(&credentials) {
        tracing::warn!(username = %credentials.username, "login rejected");
        return Err(ApiError::Unauthorized {
            message: "invalid username or password".into(),
        });
    }

    let token = state.tokens.issue(&credentials.username)?;
    tracing::info!(username = %credentials.username, "login succeeded");
    Ok(Json(TokenResponse { token }))
}

/// Login routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}
