//! Rate cache shared by the subscription reader and the request path.
//!
//! Uses `DashMap` so readers on the request path never wait on the whole
//! map; writers are serialized per shard. No guard escapes this module, so
//! no lock can be held across a network call.

use cars_types::CurrencyCode;
use dashmap::DashMap;

/// Destination currency → multiplier from the base currency.
///
/// Entries are never evicted: a currency that stops receiving pushes keeps
/// serving its last known rate.
#[derive(Debug, Default)]
pub struct RateCache {
    rates: DashMap<CurrencyCode, f64>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: CurrencyCode) -> Option<f64> {
        self.rates.get(&code).map(|rate| *rate)
    }

    /// Overwrites the rate for `code` (last write wins).
    pub fn set(&self, code: CurrencyCode, rate: f64) {
        self.rates.insert(code, rate);
    }

    /// Inserts `rate` only if `code` has no entry yet.
    ///
    /// Returns `false` when an entry was already present, e.g. a push that
    /// landed while the one-shot fetch was in flight.
    pub fn populate(&self, code: CurrencyCode, rate: f64) -> bool {
        let mut inserted = false;
        self.rates.entry(code).or_insert_with(|| {
            inserted = true;
            rate
        });
        inserted
    }

    /// Currencies currently cached.
    pub fn codes(&self) -> Vec<CurrencyCode> {
        self.rates.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_get_missing() {
        let cache = RateCache::new();
        assert_eq!(cache.get(CurrencyCode::USD), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let cache = RateCache::new();
        cache.set(CurrencyCode::USD, 0.20);
        cache.set(CurrencyCode::USD, 0.21);

        assert_eq!(cache.get(CurrencyCode::USD), Some(0.21));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_populate_does_not_clobber_existing_entry() {
        let cache = RateCache::new();

        assert!(cache.populate(CurrencyCode::EUR, 0.18));
        assert!(!cache.populate(CurrencyCode::EUR, 0.17));
        assert_eq!(cache.get(CurrencyCode::EUR), Some(0.18));
    }

    #[test]
    fn test_codes() {
        let cache = RateCache::new();
        cache.set(CurrencyCode::USD, 0.20);
        cache.populate(CurrencyCode::GBP, 0.16);

        let mut codes = cache.codes();
        codes.sort();
        assert_eq!(codes, vec![CurrencyCode::USD, CurrencyCode::GBP]);
    }

    #[test]
    fn test_concurrent_writers_leave_one_entry() {
        let cache = Arc::new(RateCache::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for j in 0..1000 {
                        if (i + j) % 2 == 0 {
                            cache.set(CurrencyCode::USD, 0.20);
                        } else {
                            cache.populate(CurrencyCode::USD, 0.21);
                        }
                        let _ = cache.get(CurrencyCode::USD);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 1);
        let rate = cache.get(CurrencyCode::USD).unwrap();
        assert!(rate == 0.20 || rate == 0.21);
    }
}
