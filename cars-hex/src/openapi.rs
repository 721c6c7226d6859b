//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use cars_types::domain::{Car, CarId};
use cars_types::dto::{CreateCarRequest, CurrencyQuery, HealthResponse};
use cars_types::CurrencyCode;
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse, example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// List all cars
#[utoipa::path(
    get,
    path = "/cars",
    tag = "cars",
    params(CurrencyQuery),
    responses(
        (status = 200, description = "List of cars, prices in the requested currency", body = Vec<Car>),
        (status = 400, description = "Unsupported currency, or the base currency was requested"),
        (status = 502, description = "Currency server could not provide a rate")
    )
)]
async fn list_cars() {}

/// Get car by ID
#[utoipa::path(
    get,
    path = "/cars/{id}",
    tag = "cars",
    params(
        ("id" = u64, Path, description = "Car ID"),
        CurrencyQuery
    ),
    responses(
        (status = 200, description = "Car found", body = Car),
        (status = 400, description = "Invalid ID or unsupported currency"),
        (status = 404, description = "Car not found"),
        (status = 502, description = "Currency server could not provide a rate")
    )
)]
async fn get_car() {}

/// Add a new car
#[utoipa::path(
    post,
    path = "/cars",
    tag = "cars",
    request_body = CreateCarRequest,
    responses(
        (status = 201, description = "Car added", body = Car),
        (status = 422, description = "Validation failed")
    )
)]
async fn create_car() {}

/// Replace an existing car
#[utoipa::path(
    put,
    path = "/cars",
    tag = "cars",
    request_body = Car,
    responses(
        (status = 200, description = "Car updated", body = Car),
        (status = 404, description = "Car not found"),
        (status = 422, description = "Validation failed")
    )
)]
async fn update_car() {}

/// Delete a car
#[utoipa::path(
    delete,
    path = "/cars/{id}",
    tag = "cars",
    params(
        ("id" = u64, Path, description = "Car ID")
    ),
    responses(
        (status = 204, description = "Car deleted"),
        (status = 404, description = "Car not found")
    )
)]
async fn delete_car() {}

/// OpenAPI documentation for the Cars API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cars Service API",
        version = "1.0.0",
        description = "Car catalogue with prices stored in the base currency.\n\nRead endpoints accept an optional `currency` query parameter; prices are then converted using rates pushed by the currency server.",
        license(name = "MIT"),
    ),
    paths(
        health,
        list_cars,
        get_car,
        create_car,
        update_car,
        delete_car,
    ),
    components(
        schemas(
            Car,
            CarId,
            CreateCarRequest,
            CurrencyCode,
            HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "cars", description = "Car catalogue operations"),
    )
)]
pub struct ApiDoc;
