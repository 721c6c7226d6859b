//! Currency conversion for car prices.
//!
//! - `cache` - `RateCache`, destination currency → rate
//! - `subscription` - background reader applying pushed rates to the cache
//! - `lookup` - per-request resolution: cache, then one-shot fetch
//!
//! [`CurrencyConverter`] wires the three together and owns the reader task.

mod cache;
mod lookup;
mod subscription;

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use cars_types::{CurrencyCode, RateClient, RateError};

pub use cache::RateCache;
pub use lookup::ConversionLookup;
pub use subscription::{ReaderExit, SubscriptionReader, SubscriptionSlot};

/// Converts base-currency prices using a push-fed rate cache.
///
/// Dropping the converter cancels its subscription reader.
pub struct CurrencyConverter<C: RateClient> {
    lookup: ConversionLookup<C>,
    cache: Arc<RateCache>,
    slot: SubscriptionSlot,
    shutdown: CancellationToken,
    reader: Mutex<Option<JoinHandle<ReaderExit>>>,
}

impl<C: RateClient> CurrencyConverter<C> {
    /// Creates the converter and spawns its subscription reader.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(client: C, base: CurrencyCode) -> Self {
        let client = Arc::new(client);
        let cache = Arc::new(RateCache::new());
        let slot = SubscriptionSlot::new();
        let shutdown = CancellationToken::new();

        let reader = SubscriptionReader::new(client.clone(), cache.clone(), slot.clone(), base)
            .spawn(shutdown.child_token());

        Self {
            lookup: ConversionLookup::new(base, client, cache.clone(), slot.clone()),
            cache,
            slot,
            shutdown,
            reader: Mutex::new(Some(reader)),
        }
    }

    pub fn base(&self) -> CurrencyCode {
        self.lookup.base()
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Whether the subscription stream is open and still accepts requests.
    pub fn is_subscribed(&self) -> bool {
        self.slot.get().is_some_and(|sender| !sender.is_closed())
    }

    /// See [`ConversionLookup::rate_for`].
    pub async fn rate_for(&self, code: &str) -> Result<Option<f64>, RateError> {
        self.lookup.rate_for(code).await
    }

    /// Cancels the subscription reader and waits for it to stop.
    ///
    /// Returns `None` if the reader was already collected by an earlier call.
    pub async fn shutdown(&self) -> Option<ReaderExit> {
        self.shutdown.cancel();

        let handle = self.reader.lock().ok().and_then(|mut reader| reader.take())?;
        match handle.await {
            Ok(exit) => Some(exit),
            Err(err) => {
                tracing::error!(error = %err, "Rate subscription reader panicked");
                None
            }
        }
    }
}

impl<C: RateClient> Drop for CurrencyConverter<C> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
