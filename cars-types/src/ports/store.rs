//! Car store port trait.
//!
//! Adapters (in-memory today) implement this trait and are injected into
//! the application service.

use crate::domain::{Car, CarId};
use crate::dto::CreateCarRequest;
use crate::error::RepoError;

/// Storage for car records.
///
/// Stored prices are always in the base currency.
#[async_trait::async_trait]
pub trait CarStore: Send + Sync + 'static {
    /// Lists all cars ordered by id.
    async fn list(&self) -> Result<Vec<Car>, RepoError>;

    /// Gets a car by id.
    async fn find_by_id(&self, id: CarId) -> Result<Option<Car>, RepoError>;

    /// Adds a car, assigning the next unused id.
    async fn add(&self, req: CreateCarRequest) -> Result<Car, RepoError>;

    /// Replaces the car with the same id.
    ///
    /// Returns `RepoError::NotFound` when no car has that id.
    async fn update(&self, car: Car) -> Result<Car, RepoError>;

    /// Removes a car by id.
    ///
    /// Returns `RepoError::NotFound` when no car has that id.
    async fn delete(&self, id: CarId) -> Result<(), RepoError>;
}
