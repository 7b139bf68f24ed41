//! Car endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;

use super::bounded;
use crate::http::error::ApiError;
use crate::http::extractors::{parse_bool, ValidUuid};
use crate::http::middleware::AuthenticatedUser;
use crate::http::server::AppState;
use crate::models::{Car, CarPatch, CarRequest, ValidationError};

/// Query string of `GET /cars`
#[derive(Debug, Deserialize)]
pub struct ListCarsParams {
    pub brand: Option<String>,
    #[serde(rename = "isEngine")]
    pub is_engine: Option<String>,
}

impl ListCarsParams {
    /// Brand (required, non-empty) and the engine-join flag.
    fn parse(&self) -> Result<(&str, bool), ValidationError> {
        let brand = self
            .brand
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .ok_or(ValidationError::Empty { field: "brand" })?;

        let include_engine = self
            .is_engine
            .as_deref()
            .and_then(parse_bool)
            .ok_or(ValidationError::InvalidFormat {
                field: "isEngine",
                reason: "please provide the valid isEngine (true or false)",
            })?;

        Ok((brand, include_engine))
    }
}

/// GET /car/{id} - one car with its engine
async fn get_car(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Car>, ApiError> {
    let car = bounded(state.request_timeout, state.cars.get_car(id)).await?;
    Ok(Json(car))
}

/// GET /cars?brand=&isEngine= - cars of a brand
async fn list_cars(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListCarsParams>,
) -> Result<Json<Vec<Car>>, ApiError> {
    let (brand, include_engine) = params.parse()?;
    let cars = bounded(
        state.request_timeout,
        state.cars.list_by_brand(brand, include_engine),
    )
    .await?;
    Ok(Json(cars))
}

/// POST /car - create a car for an existing engine
async fn create_car(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<CarRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Car>), ApiError> {
    let Json(req) = body?;
    let car = bounded(state.request_timeout, state.cars.create_car(&req)).await?;

    tracing::info!(user = %user.username, car_id = %car.id, "car created");
    Ok((StatusCode::CREATED, Json(car)))
}

/// PUT /car/{id} - partial update
async fn update_car(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidUuid(id): ValidUuid,
    body: Result<Json<CarPatch>, JsonRejection>,
) -> Result<Json<Car>, ApiError> {
    let Json(patch) = body?;
    let car = bounded(state.request_timeout, state.cars.update_car(id, &patch)).await?;

    tracing::info!(user = %user.username, car_id = %id, "car updated");
    Ok(Json(car))
}

/// DELETE /car/{id} - returns the deleted car
async fn delete_car(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Car>, ApiError> {
    let car = bounded(state.request_timeout, state.cars.delete_car(id)).await?;

    tracing::info!(user = %user.username, car_id = %id, "car deleted");
    Ok(Json(car))
}

/// Car routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/car", post(create_car))
        .route("/car/{id}", get(get_car).put(update_car).delete(delete_car))
        .route("/cars", get(list_cars))
}
