//! Request counters and a sliding window of recent retrieval latencies.

use std::collections::VecDeque;
use std::time::Duration;

/// Number of most recent retrievals kept for latency statistics.
pub const DEFAULT_LATENCY_WINDOW: usize = 1024;

/// Fixed-capacity ring of latency samples in microseconds.
///
/// Once full, each new sample evicts the oldest one. The running sum keeps
/// the mean O(1); percentiles sort a copy of at most `capacity` samples.
#[derive(Debug, Clone)]
pub struct LatencyWindow {
    samples: VecDeque<u64>,
    capacity: usize,
    sum: u128,
}

impl LatencyWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0,
        }
    }

    pub fn push(&mut self, micros: u64) {
        if self.samples.len() == self.capacity {
            if let Some(evicted) = self.samples.pop_front() {
                self.sum -= u128::from(evicted);
            }
        }
        self.samples.push_back(micros);
        self.sum += u128::from(micros);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.sum as f64 / self.samples.len() as f64
    }

    /// Nearest-rank percentile over the window, `percentile` in 0..=100.
    pub fn percentile(&self, percentile: f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut sorted: Vec<u64> = self.samples.iter().copied().collect();
        sorted.sort_unstable();

        let last = sorted.len() - 1;
        let index = ((percentile.clamp(0.0, 100.0) / 100.0) * last as f64).round() as usize;
        sorted[index.min(last)] as f64
    }
}

/// Counters for the HTTP surface. Totals cover the process lifetime;
/// latency figures cover only the last [`DEFAULT_LATENCY_WINDOW`] retrievals.
#[derive(Debug)]
pub struct MetricsCollector {
    retrieve_latency: LatencyWindow,
    total_retrieves: u64,
    total_stores: u64,
    embedding_failures: u64,
    persistence_failures: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::with_latency_window(DEFAULT_LATENCY_WINDOW)
    }

    pub fn with_latency_window(capacity: usize) -> Self {
        Self {
            retrieve_latency: LatencyWindow::new(capacity),
            total_retrieves: 0,
            total_stores: 0,
            embedding_failures: 0,
            persistence_failures: 0,
        }
    }

    pub fn record_retrieve(&mut self, duration: Duration) {
        self.total_retrieves += 1;
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        self.retrieve_latency.push(micros);
    }

    pub fn record_store(&mut self) {
        self.total_stores += 1;
    }

    pub fn record_embedding_failure(&mut self) {
        self.embedding_failures += 1;
    }

    pub fn record_persistence_failure(&mut self) {
        self.persistence_failures += 1;
    }

    pub fn total_retrieves(&self) -> u64 {
        self.total_retrieves
    }

    pub fn total_stores(&self) -> u64 {
        self.total_stores
    }

    pub fn embedding_failures(&self) -> u64 {
        self.embedding_failures
    }

    pub fn persistence_failures(&self) -> u64 {
        self.persistence_failures
    }

    pub fn retrieve_latency(&self) -> &LatencyWindow {
        &self.retrieve_latency
    }

    pub fn avg_retrieve_latency_us(&self) -> f64 {
        self.retrieve_latency.mean()
    }

    pub fn percentile_retrieve_latency_us(&self, percentile: f64) -> f64 {
        self.retrieve_latency.percentile(percentile)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
