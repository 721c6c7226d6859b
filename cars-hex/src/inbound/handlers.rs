//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use utoipa::OpenApi;

use cars_types::{
    AppError, Car, CarId, CarStore, CreateCarRequest, CurrencyQuery, HealthResponse, RateClient,
    RateError,
};

use crate::CarService;
use crate::openapi::ApiDoc;

/// Application state shared across handlers.
pub struct AppState<S: CarStore, C: RateClient> {
    pub service: CarService<S, C>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Rate(RateError::InvalidPair { .. })
            | AppError::Rate(RateError::UnsupportedCurrency(_)) => StatusCode::BAD_REQUEST,
            AppError::Rate(RateError::Upstream { .. }) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.0.to_string(),
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Keeps extractor failures in the JSON error shape.
fn rejection_error(status: StatusCode, message: String) -> ApiError {
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        ApiError(AppError::Validation(message))
    } else {
        ApiError(AppError::BadRequest(message))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        rejection_error(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        rejection_error(rejection.status(), rejection.body_text())
    }
}

fn parse_car_id(id: &str) -> Result<CarId, AppError> {
    id.parse()
        .map_err(|_| AppError::BadRequest("Invalid car ID".into()))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".into(),
    })
}

/// List all cars, optionally converted.
#[tracing::instrument(skip(state))]
pub async fn list_cars<S: CarStore, C: RateClient>(
    State(state): State<Arc<AppState<S, C>>>,
    query: Result<Query<CurrencyQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let cars = state.service.get_cars(query.code()).await?;
    Ok(Json(cars))
}

/// Get car by ID, optionally converted.
#[tracing::instrument(skip(state), fields(car_id = %id))]
pub async fn get_car<S: CarStore, C: RateClient>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(id): Path<String>,
    query: Result<Query<CurrencyQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let car_id = parse_car_id(&id)?;
    let car = state.service.get_car_by_id(car_id, query.code()).await?;
    Ok(Json(car))
}

#[tracing::instrument(skip(state))]
pub async fn create_car<S: CarStore, C: RateClient>(
    State(state): State<Arc<AppState<S, C>>>,
    req: Result<Json<CreateCarRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req?;
    let car = state.service.add_car(req).await?;
    tracing::info!(car_id = %car.id, "Car added");
    Ok((StatusCode::CREATED, Json(car)))
}

/// Replace a car by the id in the body.
#[tracing::instrument(skip(state))]
pub async fn update_car<S: CarStore, C: RateClient>(
    State(state): State<Arc<AppState<S, C>>>,
    car: Result<Json<Car>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(car) = car?;
    let car = state.service.update_car(car).await?;
    Ok(Json(car))
}

#[tracing::instrument(skip(state), fields(car_id = %id))]
pub async fn delete_car<S: CarStore, C: RateClient>(
    State(state): State<Arc<AppState<S, C>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let car_id = parse_car_id(&id)?;
    state.service.delete_car(car_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Serves the OpenAPI document.
pub async fn swagger_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
