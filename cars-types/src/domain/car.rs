//! Car domain model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

/// Maximum length accepted for free-text fields.
pub const MAX_TEXT_LEN: usize = 255;

/// Unique identifier for a Car.
///
/// Identifiers are positive and assigned by the store on insert.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct CarId(u64);

impl CarId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns the identifier that follows this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for CarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CarId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A car in the catalogue.
///
/// `price` is always denominated in the service's base currency while
/// stored; converted copies are produced with [`Car::converted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Car {
    /// Unique identifier
    #[schema(value_type = u64, example = 1)]
    pub id: CarId,
    /// Model name
    #[schema(example = "Cruze")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "Blue")]
    pub color: String,
    #[serde(default)]
    #[schema(example = "A family car")]
    pub description: String,
    /// Price in the base currency (or the requested currency in responses)
    #[schema(example = 12461.85)]
    pub price: f64,
    /// Plate in the `ABC-1234` format
    #[schema(example = "IVP-5464")]
    pub license_plate: String,
}

impl Car {
    /// Returns a copy of this car with its price multiplied by `rate`.
    pub fn converted(&self, rate: f64) -> Car {
        Car {
            price: self.price * rate,
            ..self.clone()
        }
    }

    /// Validates the mutable fields of the car.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_fields(&self.name, &self.description, self.price, &self.license_plate)
    }
}

/// Checks the car field rules, collecting every violation.
///
/// # Validation
/// - Name is required and at most 255 characters
/// - Description is at most 255 characters
/// - Price must be a finite value greater than zero
/// - License plate must match `[A-Z]{3}-[0-9]{4}`
pub fn validate_fields(
    name: &str,
    description: &str,
    price: f64,
    license_plate: &str,
) -> Result<(), DomainError> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push("name is required".to_string());
    } else if name.chars().count() > MAX_TEXT_LEN {
        errors.push(format!("name must be at most {} characters", MAX_TEXT_LEN));
    }

    if description.chars().count() > MAX_TEXT_LEN {
        errors.push(format!(
            "description must be at most {} characters",
            MAX_TEXT_LEN
        ));
    }

    if !price.is_finite() || price <= 0.0 {
        errors.push("price must be greater than zero".to_string());
    }

    if !is_license_plate(license_plate) {
        errors.push("license_plate must match the format ABC-1234".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::ValidationError(errors.join("; ")))
    }
}

fn is_license_plate(plate: &str) -> bool {
    let bytes = plate.as_bytes();
    bytes.len() == 8
        && bytes[..3].iter().all(u8::is_ascii_uppercase)
        && bytes[3] == b'-'
        && bytes[4..].iter().all(u8::is_ascii_digit)
}
