//! In-memory car store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use cars_types::{Car, CarId, CarStore, CreateCarRequest, RepoError};

/// The catalogue the service starts with.
pub fn seed_cars() -> Vec<Car> {
    vec![
        Car {
            id: CarId::new(1),
            name: "Cruze".into(),
            color: "Blue".into(),
            description: "A family car".into(),
            price: 12461.85,
            license_plate: "IVP-5464".into(),
        },
        Car {
            id: CarId::new(2),
            name: "Celta".into(),
            color: "Red".into(),
            description: "Economic car".into(),
            price: 837.37,
            license_plate: "ABC-4321".into(),
        },
    ]
}

struct StoreState {
    cars: Vec<Car>,
    next_id: CarId,
}

impl StoreState {
    fn position(&self, id: CarId) -> Option<usize> {
        self.cars.iter().position(|car| car.id == id)
    }
}

/// `CarStore` backed by a vector behind an async RwLock.
///
/// Ids are never reused: the next id only ever grows, even after the car
/// with the highest id is deleted.
pub struct InMemoryCarStore {
    state: RwLock<StoreState>,
}

impl Default for InMemoryCarStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCarStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_cars(Vec::new())
    }

    /// Creates a store holding the seed catalogue.
    pub fn seeded() -> Self {
        Self::with_cars(seed_cars())
    }

    /// Creates a store holding `cars`, kept ordered by id.
    pub fn with_cars(mut cars: Vec<Car>) -> Self {
        cars.sort_by_key(|car| car.id);
        let next_id = cars
            .last()
            .map(|car| car.id.next())
            .unwrap_or_else(|| CarId::new(1));

        Self {
            state: RwLock::new(StoreState { cars, next_id }),
        }
    }
}

#[async_trait]
impl CarStore for InMemoryCarStore {
    async fn list(&self) -> Result<Vec<Car>, RepoError> {
        Ok(self.state.read().await.cars.clone())
    }

    async fn find_by_id(&self, id: CarId) -> Result<Option<Car>, RepoError> {
        let state = self.state.read().await;
        Ok(state.position(id).map(|i| state.cars[i].clone()))
    }

    async fn add(&self, req: CreateCarRequest) -> Result<Car, RepoError> {
        let mut state = self.state.write().await;
        let car = Car {
            id: state.next_id,
            name: req.name,
            color: req.color,
            description: req.description,
            price: req.price,
            license_plate: req.license_plate,
        };
        state.next_id = car.id.next();
        state.cars.push(car.clone());

        tracing::debug!(car_id = %car.id, "Car added");
        Ok(car)
    }

    async fn update(&self, car: Car) -> Result<Car, RepoError> {
        let mut state = self.state.write().await;
        let i = state.position(car.id).ok_or(RepoError::NotFound)?;
        state.cars[i] = car.clone();

        tracing::debug!(car_id = %car.id, "Car updated");
        Ok(car)
    }

    async fn delete(&self, id: CarId) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        let i = state.position(id).ok_or(RepoError::NotFound)?;
        state.cars.remove(i);

        tracing::debug!(car_id = %id, "Car deleted");
        Ok(())
    }
}
