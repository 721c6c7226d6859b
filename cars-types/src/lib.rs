//! # Cars Types
//!
//! Domain types and port traits for the cars catalogue service.
//! This crate has no IO of its own - only data structures, validation
//! rules, and the trait definitions adapters implement.
//!
//! ## Architecture
//!
//! - `domain/` - Pure domain types (Car, CarId)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain, repository, rate and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use currency_rates::CurrencyCode;
pub use domain::{Car, CarId};
pub use dto::*;
pub use error::{AppError, DomainError, RateError, RepoError};
pub use ports::{
    CarStore, RateClient, RateClientError, RateQuote, RateRequest, RateStreamError,
    RateSubscription, RateUpdate, SUBSCRIPTION_BUFFER, SubscriptionPeer, SubscriptionSender,
    SubscriptionUpdates,
};
