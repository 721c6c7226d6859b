//! Car Application Service
//!
//! Orchestrates the car store and currency conversion.
//! Contains NO transport logic - pure orchestration.

use cars_types::{
    AppError, Car, CarId, CarStore, CreateCarRequest, CurrencyCode, RateClient, RepoError,
};

use crate::rates::{CurrencyConverter, RateCache, ReaderExit};

/// Application service for car operations.
///
/// Generic over `S: CarStore` and `C: RateClient` - the adapters are
/// injected at compile time. Read operations accept an optional currency
/// code; prices in responses are converted copies and the stored prices are
/// never touched.
pub struct CarService<S: CarStore, C: RateClient> {
    store: S,
    converter: CurrencyConverter<C>,
}

impl<S: CarStore, C: RateClient> CarService<S, C> {
    /// Creates the service and starts the rate subscription reader.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(store: S, rate_client: C, base: CurrencyCode) -> Self {
        Self {
            store,
            converter: CurrencyConverter::start(rate_client, base),
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn rate_cache(&self) -> &RateCache {
        self.converter.cache()
    }

    pub fn base_currency(&self) -> CurrencyCode {
        self.converter.base()
    }

    /// Whether pushed rate updates are currently being received.
    pub fn rate_subscription_active(&self) -> bool {
        self.converter.is_subscribed()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists all cars, with prices converted into `currency` unless it is blank.
    #[tracing::instrument(skip(self))]
    pub async fn get_cars(&self, currency: &str) -> Result<Vec<Car>, AppError> {
        let cars = self.store.list().await?;

        let Some(rate) = self.rate(currency).await? else {
            return Ok(cars);
        };
        Ok(cars.iter().map(|car| car.converted(rate)).collect())
    }

    /// Gets one car, with its price converted into `currency` unless it is blank.
    #[tracing::instrument(skip(self), fields(car_id = %id))]
    pub async fn get_car_by_id(&self, id: CarId, currency: &str) -> Result<Car, AppError> {
        let car = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car {}", id)))?;

        match self.rate(currency).await? {
            Some(rate) => Ok(car.converted(rate)),
            None => Ok(car),
        }
    }

    async fn rate(&self, currency: &str) -> Result<Option<f64>, AppError> {
        self.converter.rate_for(currency).await.map_err(|err| {
            tracing::error!(currency = %currency, error = %err, "Unable to get rate");
            err.into()
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────────

    /// Adds a new car. Prices are taken to be in the base currency.
    pub async fn add_car(&self, req: CreateCarRequest) -> Result<Car, AppError> {
        req.validate()?;
        self.store.add(req).await.map_err(Into::into)
    }

    /// Replaces the car with the same id.
    pub async fn update_car(&self, car: Car) -> Result<Car, AppError> {
        car.validate()?;
        let id = car.id;
        self.store.update(car).await.map_err(|err| match err {
            RepoError::NotFound => AppError::NotFound(format!("Car {}", id)),
            other => other.into(),
        })
    }

    /// Deletes a car by id.
    pub async fn delete_car(&self, id: CarId) -> Result<(), AppError> {
        self.store.delete(id).await.map_err(|err| match err {
            RepoError::NotFound => AppError::NotFound(format!("Car {}", id)),
            other => other.into(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────────

    /// Stops the rate subscription reader. Safe to call more than once.
    pub async fn shutdown(&self) -> Option<ReaderExit> {
        let exit = self.converter.shutdown().await;
        if let Some(exit) = &exit {
            tracing::info!(?exit, "Rate subscription reader stopped");
        }
        exit
    }
}
