//! Background reader for the rate subscription stream.
//!
//! Opens the stream once, publishes its sending half for the request path,
//! and applies every pushed rate to the cache until the stream ends or the
//! reader is cancelled.

use std::sync::{Arc, OnceLock};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use cars_types::{
    CurrencyCode, RateClient, RateClientError, RateRequest, RateSubscription, RateUpdate,
    SubscriptionSender,
};

use super::cache::RateCache;

/// Holds the sending half of the subscription once the stream is open.
///
/// Written once by the reader, read by every lookup.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionSlot {
    sender: Arc<OnceLock<SubscriptionSender>>,
}

impl SubscriptionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&SubscriptionSender> {
        self.sender.get()
    }

    fn publish(&self, sender: SubscriptionSender) -> bool {
        self.sender.set(sender).is_ok()
    }
}

/// Why the reader stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum ReaderExit {
    /// The stream could not be opened; no pushes will ever arrive.
    InitFailed(RateClientError),
    /// The service ended the stream.
    Closed,
    /// The stream failed while receiving.
    Failed(RateClientError),
    /// Shutdown was requested.
    Cancelled,
}

/// Drains the subscription stream into the rate cache.
pub struct SubscriptionReader<C: RateClient> {
    client: Arc<C>,
    cache: Arc<RateCache>,
    slot: SubscriptionSlot,
    base: CurrencyCode,
}

impl<C: RateClient> SubscriptionReader<C> {
    pub fn new(
        client: Arc<C>,
        cache: Arc<RateCache>,
        slot: SubscriptionSlot,
        base: CurrencyCode,
    ) -> Self {
        Self {
            client,
            cache,
            slot,
            base,
        }
    }

    /// Spawns the reader onto the current Tokio runtime.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<ReaderExit> {
        tokio::spawn(self.run(shutdown))
    }

    pub async fn run(self, shutdown: CancellationToken) -> ReaderExit {
        let subscription = tokio::select! {
            _ = shutdown.cancelled() => return ReaderExit::Cancelled,
            result = self.client.subscribe_rates() => match result {
                Ok(subscription) => subscription,
                Err(err) => {
                    tracing::error!(error = %err, "Unable to subscribe for rates");
                    return ReaderExit::InitFailed(err);
                }
            },
        };

        let RateSubscription {
            sender,
            mut updates,
        } = subscription;

        if !self.slot.publish(sender.clone()) {
            tracing::warn!("Rate subscription already published, keeping the first stream");
        }
        tracing::info!(base = %self.base, "Rate subscription open");

        // Currencies fetched before the stream opened could not register.
        self.register_cached(&sender).await;

        loop {
            let message = tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Rate subscription cancelled");
                    return ReaderExit::Cancelled;
                }
                message = updates.recv() => message,
            };

            match message {
                None => {
                    tracing::warn!("Rate subscription stream closed by the server");
                    return ReaderExit::Closed;
                }
                Some(Err(err)) => {
                    tracing::error!(error = %err, "Error receiving message");
                    return ReaderExit::Failed(err);
                }
                Some(Ok(RateUpdate::Error(err))) => {
                    tracing::error!(
                        base = %err.request.base,
                        destination = %err.request.destination,
                        error = %err.message,
                        "Error subscribing for rates"
                    );
                }
                Some(Ok(RateUpdate::Rate(quote))) => {
                    if quote.base != self.base {
                        tracing::warn!(
                            base = %quote.base,
                            destination = %quote.destination,
                            "Ignoring update for a foreign base currency"
                        );
                        continue;
                    }
                    if !quote.rate.is_finite() || quote.rate <= 0.0 {
                        tracing::warn!(
                            destination = %quote.destination,
                            rate = quote.rate,
                            "Ignoring invalid pushed rate"
                        );
                        continue;
                    }
                    tracing::info!(
                        destination = %quote.destination,
                        rate = quote.rate,
                        "Update received"
                    );
                    self.cache.set(quote.destination, quote.rate);
                }
            }
        }
    }

    async fn register_cached(&self, sender: &SubscriptionSender) {
        for destination in self.cache.codes() {
            let request = RateRequest::new(self.base, destination);
            if let Err(err) = sender.send(request).await {
                tracing::warn!(
                    error = %err,
                    destination = %destination,
                    "Unable to subscribe to rates update"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use cars_types::{RateQuote, RateStreamError};

    use crate::service_tests::tests::{MockRateClient, eventually};

    fn reader(client: &Arc<MockRateClient>, cache: &Arc<RateCache>) -> SubscriptionReader<MockRateClient> {
        SubscriptionReader::new(
            client.clone(),
            cache.clone(),
            SubscriptionSlot::new(),
            CurrencyCode::BRL,
        )
    }

    fn quote(destination: CurrencyCode, rate: f64) -> RateUpdate {
        RateUpdate::Rate(RateQuote {
            base: CurrencyCode::BRL,
            destination,
            rate,
        })
    }

    #[tokio::test]
    async fn test_init_failure_terminates_reader() {
        let client = Arc::new(MockRateClient::new().failing_subscribe());
        let cache = Arc::new(RateCache::new());

        let exit = reader(&client, &cache).run(CancellationToken::new()).await;

        assert!(matches!(exit, ReaderExit::InitFailed(_)));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_pushes_are_applied_in_order() {
        let client = Arc::new(MockRateClient::new());
        let cache = Arc::new(RateCache::new());
        let handle = reader(&client, &cache).spawn(CancellationToken::new());
        let peer = client.next_peer().await;

        for rate in [0.20, 0.21, 0.22] {
            peer.updates.send(Ok(quote(CurrencyCode::USD, rate))).await.unwrap();
        }
        drop(peer);

        assert_eq!(handle.await.unwrap(), ReaderExit::Closed);
        assert_eq!(cache.get(CurrencyCode::USD), Some(0.22));
    }

    #[tokio::test]
    async fn test_error_payload_does_not_stop_reader() {
        let client = Arc::new(MockRateClient::new());
        let cache = Arc::new(RateCache::new());
        let handle = reader(&client, &cache).spawn(CancellationToken::new());
        let peer = client.next_peer().await;

        let request = RateRequest::new(CurrencyCode::BRL, CurrencyCode::BRL);
        peer.updates
            .send(Ok(RateUpdate::Error(RateStreamError {
                request,
                message: "same currency".into(),
            })))
            .await
            .unwrap();
        peer.updates.send(Ok(quote(CurrencyCode::EUR, 0.18))).await.unwrap();

        assert!(eventually(|| cache.get(CurrencyCode::EUR) == Some(0.18)).await);
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn test_stream_error_terminates_reader() {
        let client = Arc::new(MockRateClient::new());
        let cache = Arc::new(RateCache::new());
        let handle = reader(&client, &cache).spawn(CancellationToken::new());
        let peer = client.next_peer().await;

        peer.updates
            .send(Err(RateClientError::Unavailable("reset".into())))
            .await
            .unwrap();

        assert!(matches!(handle.await.unwrap(), ReaderExit::Failed(_)));
    }

    #[tokio::test]
    async fn test_foreign_base_is_ignored() {
        let client = Arc::new(MockRateClient::new());
        let cache = Arc::new(RateCache::new());
        let handle = reader(&client, &cache).spawn(CancellationToken::new());
        let peer = client.next_peer().await;

        let foreign = RateUpdate::Rate(RateQuote {
            base: CurrencyCode::USD,
            destination: CurrencyCode::EUR,
            rate: 0.92,
        });
        peer.updates.send(Ok(foreign)).await.unwrap();
        drop(peer);

        assert_eq!(handle.await.unwrap(), ReaderExit::Closed);
        assert_eq!(cache.get(CurrencyCode::EUR), None);
    }

    #[tokio::test]
    async fn test_invalid_pushed_rates_keep_previous_rate() {
        let client = Arc::new(MockRateClient::new());
        let cache = Arc::new(RateCache::new());
        let handle = reader(&client, &cache).spawn(CancellationToken::new());
        let peer = client.next_peer().await;

        for rate in [0.20, 0.0, -1.0, f64::NAN, f64::INFINITY] {
            peer.updates.send(Ok(quote(CurrencyCode::USD, rate))).await.unwrap();
        }
        drop(peer);

        assert_eq!(handle.await.unwrap(), ReaderExit::Closed);
        assert_eq!(cache.get(CurrencyCode::USD), Some(0.20));
    }

    #[tokio::test]
    async fn test_cancellation_unblocks_receive() {
        let client = Arc::new(MockRateClient::new());
        let cache = Arc::new(RateCache::new());
        let shutdown = CancellationToken::new();
        let handle = reader(&client, &cache).spawn(shutdown.clone());
        let _peer = client.next_peer().await;

        shutdown.cancel();

        let exit = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(exit, ReaderExit::Cancelled);
    }

    #[tokio::test]
    async fn test_cached_currencies_are_registered_when_stream_opens() {
        let client = Arc::new(MockRateClient::new());
        let cache = Arc::new(RateCache::new());
        cache.set(CurrencyCode::USD, 0.20);
        let slot = SubscriptionSlot::new();
        let handle = SubscriptionReader::new(client.clone(), cache.clone(), slot.clone(), CurrencyCode::BRL)
            .spawn(CancellationToken::new());

        let mut peer = client.next_peer().await;
        let request = tokio::time::timeout(Duration::from_secs(2), peer.requests.recv())
            .await
            .unwrap();

        assert_eq!(
            request,
            Some(RateRequest::new(CurrencyCode::BRL, CurrencyCode::USD))
        );
        assert!(slot.get().is_some());
        handle.abort();
    }
}
