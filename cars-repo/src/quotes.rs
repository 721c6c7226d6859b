//! Simulated currency-quoting service.
//!
//! Serves quotes from the `currency-rates` reference table and pushes a fresh
//! quote for every subscribed pair on a fixed interval. Behaves like the real
//! service at the edges that matter to the client: same-currency pairs are
//! rejected, with a status on the one-shot call and with an error payload on
//! the stream.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::MissedTickBehavior;

use cars_types::{
    CurrencyCode, RateClient, RateClientError, RateQuote, RateRequest, RateStreamError,
    RateSubscription, RateUpdate, SUBSCRIPTION_BUFFER, SubscriptionPeer,
};
use currency_rates::RateTable;

const SAME_CURRENCY_MESSAGE: &str = "Base currency can not be the same as the destination currency";

/// In-process `RateClient` adapter.
#[derive(Debug, Clone)]
pub struct SimulatedRateClient {
    table: RateTable,
    push_interval: Duration,
}

impl SimulatedRateClient {
    pub fn new(table: RateTable, push_interval: Duration) -> Self {
        Self {
            table,
            push_interval,
        }
    }
}

#[async_trait]
impl RateClient for SimulatedRateClient {
    async fn get_rate(&self, request: RateRequest) -> Result<f64, RateClientError> {
        if request.base == request.destination {
            return Err(RateClientError::InvalidArgument {
                base: request.base,
                destination: request.destination,
                message: SAME_CURRENCY_MESSAGE.into(),
            });
        }
        Ok(self.table.quote(request.base, request.destination))
    }

    async fn subscribe_rates(&self) -> Result<RateSubscription, RateClientError> {
        let (subscription, peer) = RateSubscription::channel(SUBSCRIPTION_BUFFER);
        tokio::spawn(serve_subscription(self.table, self.push_interval, peer));
        Ok(subscription)
    }

    async fn health_check(&self) -> Result<String, RateClientError> {
        Ok("SERVING".into())
    }
}

/// Drives one subscription until the client goes away.
async fn serve_subscription(table: RateTable, push_interval: Duration, mut peer: SubscriptionPeer) {
    let mut pairs: BTreeSet<(CurrencyCode, CurrencyCode)> = BTreeSet::new();
    let mut ticker = tokio::time::interval(push_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            request = peer.requests.recv() => {
                let Some(request) = request else { break };

                if request.base == request.destination {
                    let payload = RateUpdate::Error(RateStreamError {
                        request,
                        message: SAME_CURRENCY_MESSAGE.into(),
                    });
                    if peer.updates.send(Ok(payload)).await.is_err() {
                        break;
                    }
                    continue;
                }

                if pairs.insert((request.base, request.destination)) {
                    tracing::debug!(
                        base = %request.base,
                        destination = %request.destination,
                        "Subscription registered"
                    );
                }
            }
            _ = ticker.tick() => {
                for &(base, destination) in &pairs {
                    let quote = RateQuote {
                        base,
                        destination,
                        rate: table.quote(base, destination),
                    };
                    if peer.updates.send(Ok(RateUpdate::Rate(quote))).await.is_err() {
                        return;
                    }
                }
            }
            _ = peer.updates.closed() => break,
        }
    }

    tracing::debug!("Subscription stream finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    fn client() -> SimulatedRateClient {
        SimulatedRateClient::new(RateTable::fixed(), Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_get_rate_uses_reference_table() {
        let rate = client()
            .get_rate(RateRequest::new(CurrencyCode::BRL, CurrencyCode::USD))
            .await
            .unwrap();

        assert!((rate - 0.20).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_get_rate_same_currency_is_invalid() {
        let err = client()
            .get_rate(RateRequest::new(CurrencyCode::BRL, CurrencyCode::BRL))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RateClientError::InvalidArgument {
                base: CurrencyCode::BRL,
                destination: CurrencyCode::BRL,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_subscription_pushes_subscribed_pairs() {
        let mut subscription = client().subscribe_rates().await.unwrap();
        subscription
            .sender
            .send(RateRequest::new(CurrencyCode::BRL, CurrencyCode::EUR))
            .await
            .unwrap();

        let update = timeout(Duration::from_secs(2), subscription.updates.recv())
            .await
            .unwrap()
            .unwrap()
            .unwrap();

        match update {
            RateUpdate::Rate(quote) => {
                assert_eq!(quote.base, CurrencyCode::BRL);
                assert_eq!(quote.destination, CurrencyCode::EUR);
                assert!(quote.rate > 0.0);
            }
            other => panic!("unexpected update: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_subscription_rejects_same_currency_with_error_payload() {
        let mut subscription = client().subscribe_rates().await.unwrap();
        let request = RateRequest::new(CurrencyCode::USD, CurrencyCode::USD);
        subscription.sender.send(request).await.unwrap();

        let update = timeout(Duration::from_secs(2), subscription.updates.recv())
            .await
            .unwrap()
            .unwrap()
            .unwrap();

        assert!(matches!(update, RateUpdate::Error(err) if err.request == request));
    }

    #[tokio::test]
    async fn test_health_check() {
        assert_eq!(client().health_check().await.unwrap(), "SERVING");
    }
}
