//! # Cars Hex
//!
//! Application service layer and HTTP adapter for the cars service.
//!
//! ## Architecture
//!
//! - `rates/` - Currency conversion: rate cache, subscription reader and
//!   the per-request conversion lookup
//! - `service/` - Application service (orchestrates store and conversion)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `S: CarStore` and `C: RateClient`, allowing
//! different adapters to be injected.

pub mod inbound;
pub mod openapi;
pub mod rates;
pub mod service;


pub use rates::{CurrencyConverter, RateCache, ReaderExit};
pub use service::CarService;
