//! Domain models for the cars service.

pub mod car;

pub use car::{Car, CarId};
