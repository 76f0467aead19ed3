//! Sequential run over a list of product numbers.
//!
//! Products are processed one at a time in input order. A courtesy pause
//! follows every product, whatever its outcome; it spreads load over time
//! and is not a retry mechanism.

use std::time::Duration;

use docscrape_core::{AppConfig, Pzn, Record};
use rand::Rng;

use crate::extract::RecordExtractor;
use crate::fetch::PageFetcher;

/// Randomized pause between two requests, in milliseconds (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourtesyDelay {
    min_ms: u64,
    max_ms: u64,
}

impl CourtesyDelay {
    /// Bounds are swapped if given in the wrong order.
    #[must_use]
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.delay_min_ms, config.delay_max_ms)
    }

    /// No pause at all; used by tests and offline runs.
    #[must_use]
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    /// Draws the next pause.
    #[must_use]
    pub fn next_duration(&self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(self.min_ms..=self.max_ms))
    }

    pub async fn wait(&self) {
        let pause = self.next_duration();
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }
}

/// Extracts one record per product number, in order.
///
/// Never fails: fetch and status failures become degraded records, so the
/// output always has exactly one record per input.
pub async fn run_pipeline<F: PageFetcher>(
    extractor: &RecordExtractor<F>,
    pzns: &[Pzn],
    delay: &CourtesyDelay,
) -> Vec<Record> {
    let total = pzns.len();
    let mut records = Vec::with_capacity(total);

    for (index, pzn) in pzns.iter().enumerate() {
        let record = extractor.extract(pzn).await;
        tracing::info!(
            pzn = %pzn,
            position = index + 1,
            total,
            name = record.name().unwrap_or_default(),
            "product processed"
        );
        records.push(record);
        delay.wait().await;
    }

    records
}
