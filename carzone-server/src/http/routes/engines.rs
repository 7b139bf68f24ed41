//! Engine endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};

use super::bounded;
use crate::http::error::ApiError;
use crate::http::extractors::ValidUuid;
use crate::http::middleware::AuthenticatedUser;
use crate::http::server::AppState;
use crate::models::{Engine, EnginePatch, EngineRequest};

/// GET /engine/{id}
async fn get_engine(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Engine>, ApiError> {
    let engine = bounded(state.request_timeout, state.engines.get_engine(id)).await?;
    Ok(Json(engine))
}

/// POST /engine - validated create
async fn create_engine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<EngineRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Engine>), ApiError> {
    let Json(req) = body?;
    let engine = bounded(state.request_timeout, state.engines.create_engine(&req)).await?;

    tracing::info!(user = %user.username, engine_id = %engine.engine_id, "engine created");
    Ok((StatusCode::CREATED, Json(engine)))
}

/// PUT /engine/{id} - validated partial update
async fn update_engine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidUuid(id): ValidUuid,
    body: Result<Json<EnginePatch>, JsonRejection>,
) -> Result<Json<Engine>, ApiError> {
    let Json(patch) = body?;
    let engine = bounded(
        state.request_timeout,
        state.engines.update_engine(id, &patch),
    )
    .await?;

    tracing::info!(user = %user.username, engine_id = %id, "engine updated");
    Ok(Json(engine))
}

/// DELETE /engine/{id} - returns the deleted engine
async fn delete_engine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Engine>, ApiError> {
    let engine = bounded(state.request_timeout, state.engines.delete_engine(id)).await?;

    tracing::info!(user = %user.username, engine_id = %id, "engine deleted");
    Ok(Json(engine))
}

/// Engine routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/engine", post(create_engine)).route(
        "/engine/{id}",
        get(get_engine).put(update_engine).delete(delete_engine),
    )
}
