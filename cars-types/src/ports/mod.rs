//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod rates;
mod store;

pub use rates::{
    RateClient, RateClientError, RateQuote, RateRequest, RateStreamError, RateSubscription,
    RateUpdate, SUBSCRIPTION_BUFFER, SubscriptionPeer, SubscriptionSender, SubscriptionUpdates,
};
pub use store::CarStore;
