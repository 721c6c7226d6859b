//! # Cars Repository
//!
//! Concrete adapters for the cars service ports:
//! - `memory` - `InMemoryCarStore`, the `CarStore` used by the service
//! - `quotes` - `SimulatedRateClient`, an in-process stand-in for the
//!   currency-quoting service used in development and tests

pub mod memory;
pub mod quotes;


pub use memory::{InMemoryCarStore, seed_cars};
pub use quotes::SimulatedRateClient;
