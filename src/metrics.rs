//! Index Metrics
//!
//! Operation counters and latency tracking.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Index operations that are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddDocuments,
    Search,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::AddDocuments => write!(f, "add_documents"),
            Operation::Search => write!(f, "search"),
        }
    }
}

/// Metrics collector
#[derive(Debug)]
pub struct IndexMetrics {
    /// Total operations count
    total_ops: AtomicU64,

    /// Operations per kind
    ops_by_kind: RwLock<HashMap<Operation, u64>>,

    documents_added: AtomicU64,
    results_returned: AtomicU64,

    /// Latency tracking (simplified)
    latency_sum_us: AtomicU64,
    latency_count: AtomicU64,
    latency_min_us: AtomicU64,
    latency_max_us: AtomicU64,
}

impl Default for IndexMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            total_ops: AtomicU64::new(0),
            ops_by_kind: RwLock::new(HashMap::new()),
            documents_added: AtomicU64::new(0),
            results_returned: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
            latency_count: AtomicU64::new(0),
            latency_min_us: AtomicU64::new(u64::MAX),
            latency_max_us: AtomicU64::new(0),
        }
    }

    /// Record an operation
    pub fn record_operation(&self, op: Operation, latency: Duration) {
        self.total_ops.fetch_add(1, Ordering::Relaxed);
        *self.ops_by_kind.write().entry(op).or_insert(0) += 1;

        let latency_us = latency.as_micros() as u64;
        self.latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);
        self.latency_min_us.fetch_min(latency_us, Ordering::Relaxed);
        self.latency_max_us.fetch_max(latency_us, Ordering::Relaxed);
    }

    pub fn record_documents_added(&self, count: usize) {
        self.documents_added.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_results(&self, count: usize) {
        self.results_returned.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Get total operations count
    pub fn total_ops(&self) -> u64 {
        self.total_ops.load(Ordering::Relaxed)
    }

    /// Count for a single operation kind
    pub fn ops(&self, op: Operation) -> u64 {
        self.ops_by_kind.read().get(&op).copied().unwrap_or(0)
    }

    pub fn documents_added(&self) -> u64 {
        self.documents_added.load(Ordering::Relaxed)
    }

    pub fn results_returned(&self) -> u64 {
        self.results_returned.load(Ordering::Relaxed)
    }

    /// Get average latency in microseconds
    pub fn avg_latency_us(&self) -> f64 {
        let count = self.latency_count.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        sum as f64 / count as f64
    }

    /// Get min latency in microseconds
    pub fn min_latency_us(&self) -> u64 {
        let min = self.latency_min_us.load(Ordering::Relaxed);
        if min == u64::MAX {
            0
        } else {
            min
        }
    }

    /// Get max latency in microseconds
    pub fn max_latency_us(&self) -> u64 {
        self.latency_max_us.load(Ordering::Relaxed)
    }

    /// Get a summary of metrics
    pub fn summary(&self) -> String {
        format!(
            "Operations: {} ({}={}, {}={}) | Documents: {} | Results: {} | \
             Latency (µs): avg={:.1}, min={}, max={}",
            self.total_ops(),
            Operation::AddDocuments,
            self.ops(Operation::AddDocuments),
            Operation::Search,
            self.ops(Operation::Search),
            self.documents_added(),
            self.results_returned(),
            self.avg_latency_us(),
            self.min_latency_us(),
            self.max_latency_us()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = IndexMetrics::new();

        metrics.record_operation(Operation::Search, Duration::from_micros(100));
        metrics.record_operation(Operation::Search, Duration::from_micros(200));
        metrics.record_operation(Operation::AddDocuments, Duration::from_micros(150));

        assert_eq!(metrics.total_ops(), 3);
        assert_eq!(metrics.min_latency_us(), 100);
        assert_eq!(metrics.max_latency_us(), 200);
        assert!((metrics.avg_latency_us() - 150.0).abs() < 0.1);

        assert_eq!(metrics.ops(Operation::Search), 2);
        assert_eq!(metrics.ops(Operation::AddDocuments), 1);
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = IndexMetrics::new();
        assert_eq!(metrics.min_latency_us(), 0);
        assert_eq!(metrics.avg_latency_us(), 0.0);
        assert!(metrics.summary().starts_with("Operations: 0"));
    }

    #[test]
    fn test_summary_names_operations() {
        let metrics = IndexMetrics::new();
        metrics.record_operation(Operation::AddDocuments, Duration::from_micros(10));

        assert_eq!(Operation::Search.to_string(), "search");
        let summary = metrics.summary();
        assert!(summary.contains("add_documents=1"), "{summary}");
        assert!(summary.contains("search=0"), "{summary}");
    }

    #[test]
    fn test_counters() {
        let metrics = IndexMetrics::new();
        metrics.record_documents_added(3);
        metrics.record_results(2);
        assert_eq!(metrics.documents_added(), 3);
        assert_eq!(metrics.results_returned(), 2);
    }
}
