//! Rate client port.
//!
//! This trait defines the interface to the currency-quoting service: a
//! one-shot rate call and a bidirectional subscription stream. The stream is
//! modelled as two halves connected by channels, so any transport can back
//! it by pumping a [`SubscriptionPeer`].

use tokio::sync::mpsc;

use crate::CurrencyCode;

/// Default buffer size for each direction of a subscription.
pub const SUBSCRIPTION_BUFFER: usize = 64;

/// A base/destination pair, used both for one-shot calls and subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RateRequest {
    pub base: CurrencyCode,
    pub destination: CurrencyCode,
}

impl RateRequest {
    pub fn new(base: CurrencyCode, destination: CurrencyCode) -> Self {
        Self { base, destination }
    }
}

/// A rate pushed by the service: one `base` buys `rate` units of `destination`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateQuote {
    pub base: CurrencyCode,
    pub destination: CurrencyCode,
    pub rate: f64,
}

/// Error payload carried on the stream for a rejected subscribe-request.
#[derive(Debug, Clone, PartialEq)]
pub struct RateStreamError {
    pub request: RateRequest,
    pub message: String,
}

/// One inbound message on the subscription stream.
#[derive(Debug, Clone, PartialEq)]
pub enum RateUpdate {
    Rate(RateQuote),
    Error(RateStreamError),
}

/// Transport-level failures reported by a rate client.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateClientError {
    #[error("Invalid argument for {base} -> {destination}: {message}")]
    InvalidArgument {
        base: CurrencyCode,
        destination: CurrencyCode,
        message: String,
    },

    #[error("Rate service unavailable: {0}")]
    Unavailable(String),

    #[error("Subscription stream closed")]
    Closed,
}

/// Sending half of a subscription. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SubscriptionSender {
    inner: mpsc::Sender<RateRequest>,
}

impl SubscriptionSender {
    /// Asks the service to push future rates for `request`.
    pub async fn send(&self, request: RateRequest) -> Result<(), RateClientError> {
        self.inner
            .send(request)
            .await
            .map_err(|_| RateClientError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

/// Receiving half of a subscription.
#[derive(Debug)]
pub struct SubscriptionUpdates {
    inner: mpsc::Receiver<Result<RateUpdate, RateClientError>>,
}

impl SubscriptionUpdates {
    /// Waits for the next message. `None` means the stream ended.
    pub async fn recv(&mut self) -> Option<Result<RateUpdate, RateClientError>> {
        self.inner.recv().await
    }
}

/// Client side of an open subscription stream.
#[derive(Debug)]
pub struct RateSubscription {
    pub sender: SubscriptionSender,
    pub updates: SubscriptionUpdates,
}

/// Service side of an open subscription stream, driven by the adapter.
#[derive(Debug)]
pub struct SubscriptionPeer {
    /// Subscribe-requests sent by the client.
    pub requests: mpsc::Receiver<RateRequest>,
    /// Messages delivered to the client, in order.
    pub updates: mpsc::Sender<Result<RateUpdate, RateClientError>>,
}

impl RateSubscription {
    /// Creates a connected client/service pair with `buffer` slots per direction.
    pub fn channel(buffer: usize) -> (RateSubscription, SubscriptionPeer) {
        let (request_tx, request_rx) = mpsc::channel(buffer);
        let (update_tx, update_rx) = mpsc::channel(buffer);

        let subscription = RateSubscription {
            sender: SubscriptionSender { inner: request_tx },
            updates: SubscriptionUpdates { inner: update_rx },
        };
        let peer = SubscriptionPeer {
            requests: request_rx,
            updates: update_tx,
        };
        (subscription, peer)
    }
}

/// Port trait for the currency-quoting service.
#[async_trait::async_trait]
pub trait RateClient: Send + Sync + 'static {
    /// Returns how many units of `destination` one unit of `base` buys.
    async fn get_rate(&self, request: RateRequest) -> Result<f64, RateClientError>;

    /// Opens the bidirectional subscription stream.
    async fn subscribe_rates(&self) -> Result<RateSubscription, RateClientError>;

    /// Checks that the service is reachable, returning its status message.
    async fn health_check(&self) -> Result<String, RateClientError>;
}

#[async_trait::async_trait]
impl<T: RateClient + ?Sized> RateClient for std::sync::Arc<T> {
    async fn get_rate(&self, request: RateRequest) -> Result<f64, RateClientError> {
        (**self).get_rate(request).await
    }

    async fn subscribe_rates(&self) -> Result<RateSubscription, RateClientError> {
        (**self).subscribe_rates().await
    }

    async fn health_check(&self) -> Result<String, RateClientError> {
        (**self).health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_round_trip_both_directions() {
        let (mut subscription, mut peer) = RateSubscription::channel(4);
        let request = RateRequest::new(CurrencyCode::BRL, CurrencyCode::USD);

        subscription.sender.send(request).await.unwrap();
        assert_eq!(peer.requests.recv().await, Some(request));

        let quote = RateQuote {
            base: CurrencyCode::BRL,
            destination: CurrencyCode::USD,
            rate: 0.2,
        };
        peer.updates.send(Ok(RateUpdate::Rate(quote))).await.unwrap();
        assert_eq!(
            subscription.updates.recv().await,
            Some(Ok(RateUpdate::Rate(quote)))
        );
    }

    #[tokio::test]
    async fn test_dropped_peer_closes_both_halves() {
        let (mut subscription, peer) = RateSubscription::channel(4);
        drop(peer);

        assert!(subscription.sender.is_closed());
        let err = subscription
            .sender
            .send(RateRequest::new(CurrencyCode::BRL, CurrencyCode::EUR))
            .await
            .unwrap_err();
        assert_eq!(err, RateClientError::Closed);
        assert!(subscription.updates.recv().await.is_none());
    }
}
