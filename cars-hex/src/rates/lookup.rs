//! Per-request rate resolution.

use std::sync::Arc;

use cars_types::{CurrencyCode, RateClient, RateClientError, RateError, RateRequest};

use super::cache::RateCache;
use super::subscription::SubscriptionSlot;

/// Resolves the rate for a requested currency: cache first, then a one-shot
/// fetch that also registers the currency for future pushes.
pub struct ConversionLookup<C: RateClient> {
    base: CurrencyCode,
    client: Arc<C>,
    cache: Arc<RateCache>,
    slot: SubscriptionSlot,
}

impl<C: RateClient> ConversionLookup<C> {
    pub fn new(
        base: CurrencyCode,
        client: Arc<C>,
        cache: Arc<RateCache>,
        slot: SubscriptionSlot,
    ) -> Self {
        Self {
            base,
            client,
            cache,
            slot,
        }
    }

    pub fn base(&self) -> CurrencyCode {
        self.base
    }

    /// Returns the multiplier for `code`, or `None` when `code` is blank and
    /// prices should stay in the base currency.
    pub async fn rate_for(&self, code: &str) -> Result<Option<f64>, RateError> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }

        let destination: CurrencyCode = code
            .parse()
            .map_err(|_| RateError::UnsupportedCurrency(code.to_string()))?;

        if let Some(rate) = self.cache.get(destination) {
            return Ok(Some(rate));
        }

        self.fetch(destination).await.map(Some)
    }

    async fn fetch(&self, destination: CurrencyCode) -> Result<f64, RateError> {
        let base = self.base;
        let request = RateRequest::new(base, destination);

        let rate = self
            .client
            .get_rate(request)
            .await
            .map_err(|err| match err {
                RateClientError::InvalidArgument { .. } => {
                    RateError::InvalidPair { base, destination }
                }
                other => RateError::Upstream {
                    base,
                    destination,
                    reason: other.to_string(),
                },
            })?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(RateError::Upstream {
                base,
                destination,
                reason: format!("invalid rate {}", rate),
            });
        }

        // Cache before registering: a reader that opens its stream after this
        // point re-registers everything it finds in the cache.
        if !self.cache.populate(destination, rate) {
            tracing::debug!(destination = %destination, "Rate already cached by a concurrent update");
        }
        self.register(request).await;

        Ok(rate)
    }

    /// Best-effort subscription for future pushes of `request`.
    async fn register(&self, request: RateRequest) {
        let Some(sender) = self.slot.get() else {
            tracing::warn!(
                destination = %request.destination,
                "Rate subscription not open, skipping registration"
            );
            return;
        };

        if let Err(err) = sender.send(request).await {
            tracing::error!(
                error = %err,
                destination = %request.destination,
                "Unable to subscribe to rates update"
            );
        }
    }
}
