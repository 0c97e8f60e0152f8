//! Oracle price ingestion with freshness and sign guards.
//!
//! [`OracleAdapter`] wraps a [`PriceFeed`] and is the only path by which a
//! price enters the engine. A reading that is stale or non-positive is
//! rejected before any computation sees it; a feed with the wrong decimal
//! precision is rejected once at configuration time, not per call. The
//! adapter performs exactly one synchronous read per [`OracleAdapter::fetch`]
//! and never retries; the caller decides whether to abort or fall back.

use core::fmt::Debug;

use alloy_primitives::{I256, U256};
use auto_impl::auto_impl;

use crate::{constants, ConfigError, OracleError};

/// A raw reading as reported by an external price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReading {
    /// The signed raw answer, at the feed's native decimal precision.
    pub value: I256,
    /// Timestamp the answer was last updated at, in seconds.
    pub updated_at: u64,
}

/// An external price feed, e.g. a reader of an on-chain aggregator.
///
/// Feeds must report values with the fixed, pre-agreed precision of
/// [`constants::oracle::FEED_DECIMALS`] decimals; [`OracleAdapter::new`]
/// rejects any other precision.
#[auto_impl(&, Box, Arc)]
pub trait PriceFeed: Debug {
    /// Returns the latest raw reading of the feed.
    fn latest_reading(&self) -> RawReading;

    /// The decimal precision of [`Self::latest_reading`] values.
    fn decimals(&self) -> u8;
}

/// A price reading that passed the adapter's guards, normalized to
/// [`constants::oracle::PRICE_DECIMALS`] decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceReading {
    /// The 18-decimal normalized, strictly positive price.
    pub value: U256,
    /// Timestamp the underlying raw answer was updated at.
    pub as_of: u64,
}

/// Guards a [`PriceFeed`] with the engine's freshness and sign invariants.
#[derive(Debug, Clone)]
pub struct OracleAdapter<F> {
    feed: F,
    staleness_threshold: u64,
}

impl<F: PriceFeed> OracleAdapter<F> {
    /// Wraps `feed`, rejecting it up front if it does not report the
    /// pre-agreed decimal precision.
    pub fn new(feed: F, staleness_threshold: u64) -> Result<Self, ConfigError> {
        let actual = feed.decimals();
        if actual != constants::oracle::FEED_DECIMALS {
            return Err(ConfigError::OracleDecimalsMismatch {
                expected: constants::oracle::FEED_DECIMALS,
                actual,
            });
        }
        Ok(Self { feed, staleness_threshold })
    }

    /// Performs a single synchronous read of the feed and normalizes it.
    ///
    /// Fails with [`OracleError::StalePrice`] when the reading is older than
    /// the staleness threshold (a reading exactly at the threshold is still
    /// accepted) and with [`OracleError::NonPositivePrice`] when the raw
    /// value is zero or negative. `now` is the monotonic clock supplied by
    /// the host environment.
    pub fn fetch(&self, now: u64) -> Result<PriceReading, OracleError> {
        let raw = self.feed.latest_reading();

        if raw.value <= I256::ZERO {
            return Err(OracleError::NonPositivePrice { value: raw.value });
        }

        let age = now.saturating_sub(raw.updated_at);
        if age > self.staleness_threshold {
            return Err(OracleError::StalePrice { age, threshold: self.staleness_threshold });
        }

        let value = raw
            .value
            .unsigned_abs()
            .checked_mul(U256::from(constants::oracle::FEED_TO_PRICE_SCALE))
            .ok_or(OracleError::ValueOutOfRange { value: raw.value })?;

        Ok(PriceReading { value, as_of: raw.updated_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockFeed;

    const NOW: u64 = 1_700_000_000;
    const THRESHOLD: u64 = 300;

    fn adapter(feed: MockFeed) -> OracleAdapter<MockFeed> {
        OracleAdapter::new(feed, THRESHOLD).unwrap()
    }

    #[test]
    fn accepts_fresh_reading_and_normalizes() {
        // 2000.00000000 at 8 decimals
        let oracle = adapter(MockFeed::new(200_000_000_000, NOW));
        let reading = oracle.fetch(NOW).unwrap();
        assert_eq!(reading.value, U256::from(2000u64) * U256::from(10u64).pow(U256::from(18)));
        assert_eq!(reading.as_of, NOW);
    }

    #[test]
    fn accepts_reading_exactly_at_staleness_boundary() {
        let oracle = adapter(MockFeed::new(100_000_000, NOW - THRESHOLD));
        assert!(oracle.fetch(NOW).is_ok());
    }

    #[test]
    fn rejects_reading_one_second_past_boundary() {
        let oracle = adapter(MockFeed::new(100_000_000, NOW - THRESHOLD - 1));
        assert_eq!(
            oracle.fetch(NOW),
            Err(OracleError::StalePrice { age: THRESHOLD + 1, threshold: THRESHOLD })
        );
    }

    #[test]
    fn rejects_zero_value() {
        let oracle = adapter(MockFeed::new(0, NOW));
        assert_eq!(
            oracle.fetch(NOW),
            Err(OracleError::NonPositivePrice { value: I256::ZERO })
        );
    }

    #[test]
    fn rejects_negative_value() {
        let oracle = adapter(MockFeed::new(-1, NOW));
        assert_eq!(
            oracle.fetch(NOW),
            Err(OracleError::NonPositivePrice { value: I256::MINUS_ONE })
        );
    }

    #[test]
    fn sign_guard_runs_before_staleness_guard() {
        let oracle = adapter(MockFeed::new(-5, NOW - THRESHOLD - 100));
        assert!(matches!(oracle.fetch(NOW), Err(OracleError::NonPositivePrice { .. })));
    }

    #[test]
    fn future_timestamp_counts_as_fresh() {
        let oracle = adapter(MockFeed::new(100_000_000, NOW + 10));
        assert!(oracle.fetch(NOW).is_ok());
    }

    #[test]
    fn rejects_feed_with_wrong_decimals_at_setup() {
        let feed = MockFeed::with_decimals(100_000_000, NOW, 18);
        assert_eq!(
            OracleAdapter::new(feed, THRESHOLD).unwrap_err(),
            ConfigError::OracleDecimalsMismatch { expected: 8, actual: 18 }
        );
    }
}
