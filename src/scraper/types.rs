// src/scraper/types.rs
use serde::{Deserialize, Serialize};

/// Retry/timing knobs for the fetcher. Timing is injectable so tests can
/// run the full retry loop without real sleeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchPolicy {
    pub max_attempts: u32,
    /// Multiplied by the upcoming attempt number before attempts 2 and 3.
    pub base_delay_ms: u64,
    /// Center of the jitter band; actual jitter is 0.5x-1.5x this value.
    pub jitter_ms: u64,
    /// Per-profile request timeouts, most to least browser-like.
    pub timeouts_secs: [u64; 3],
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            jitter_ms: 1000,
            timeouts_secs: [15, 25, 30],
        }
    }
}

impl FetchPolicy {
    /// Zero-delay policy for tests.
    pub fn for_tests() -> Self {
        Self {
            base_delay_ms: 0,
            jitter_ms: 0,
            timeouts_secs: [5, 5, 5],
            ..Self::default()
        }
    }
}

/// Batch processing knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPolicy {
    /// Chunk size = number of concurrent fetch+extract pipelines.
    pub concurrency: usize,
    /// Hard cap on URLs per batch request.
    pub max_batch_size: usize,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            concurrency: 5,
            max_batch_size: 50,
        }
    }
}
