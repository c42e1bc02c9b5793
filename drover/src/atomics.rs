use metrics_util::AtomicBucket;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// Lock-free counters for one label, shared by every user of a swarm.
pub(crate) struct LabelAtomics {
    success: AtomicU64,
    error: AtomicU64,
    latency: AtomicBucket<Duration>,
}

impl LabelAtomics {
    fn new() -> Self {
        Self {
            success: AtomicU64::new(0),
            error: AtomicU64::new(0),
            latency: AtomicBucket::new(),
        }
    }

    pub fn record(&self, ok: bool, elapsed: Duration) {
        if ok {
            self.success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.error.fetch_add(1, Ordering::Relaxed);
        }
        self.latency.push(elapsed);
    }

    fn collect(&self) -> Collected {
        let success = self.success.swap(0, Ordering::Relaxed);
        let error = self.error.swap(0, Ordering::Relaxed);
        let mut latency = vec![];
        self.latency.clear_with(|dur| {
            latency.extend_from_slice(dur);
        });

        Collected {
            success,
            error,
            latency,
        }
    }
}

/// Everything recorded for a label since the previous collection.
#[derive(Debug)]
pub(crate) struct Collected {
    pub success: u64,
    pub error: u64,
    pub latency: Vec<Duration>,
}

impl Collected {
    pub fn count(&self) -> u64 {
        self.success + self.error
    }
}

#[derive(Default)]
pub(crate) struct StatsCollector {
    labels: RwLock<HashMap<String, Arc<LabelAtomics>>>,
}

impl StatsCollector {
    pub fn record(&self, label: &str, ok: bool, elapsed: Duration) {
        self.atomics(label).record(ok, elapsed);
    }

    fn atomics(&self, label: &str) -> Arc<LabelAtomics> {
        let existing = self
            .labels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(label)
            .cloned();

        match existing {
            Some(atomics) => atomics,
            None => self
                .labels
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(label.to_string())
                .or_insert_with(|| Arc::new(LabelAtomics::new()))
                .clone(),
        }
    }

    /// Drain every label, resetting its counters.
    pub fn collect(&self) -> Vec<(String, Collected)> {
        self.labels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(label, atomics)| (label.clone(), atomics.collect()))
            .collect()
    }
}
