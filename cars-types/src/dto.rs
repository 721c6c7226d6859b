//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::car::validate_fields;
use crate::error::DomainError;

/// Request to add a new car. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateCarRequest {
    /// Model name
    #[schema(example = "Celta")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "Red")]
    pub color: String,
    #[serde(default)]
    #[schema(example = "Economic car")]
    pub description: String,
    /// Price in the base currency
    #[schema(example = 837.37)]
    pub price: f64,
    #[schema(example = "ABC-4321")]
    pub license_plate: String,
}

impl CreateCarRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_fields(&self.name, &self.description, self.price, &self.license_plate)
    }
}

/// Optional currency selector for read endpoints.
///
/// An absent or blank value returns prices in the base currency.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CurrencyQuery {
    /// Three-letter code of the currency prices should be converted into
    #[param(example = "USD")]
    pub currency: Option<String>,
}

impl CurrencyQuery {
    /// Returns the requested code, or an empty string when none was given.
    pub fn code(&self) -> &str {
        self.currency.as_deref().unwrap_or("")
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
}
