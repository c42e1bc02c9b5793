use drover_core::LatencyDigest;
use std::fmt;
use std::time::Duration;

/// Throughput, error rate and latency for one report interval.
#[derive(Debug, Clone)]
pub(crate) struct Measurement {
    pub rps: f64,
    pub error_rate: f64,
    pub elapsed: Duration,
    pub users: usize,
    latency: LatencyDigest,
}

impl Measurement {
    pub fn new(success: u64, error: u64, elapsed: Duration, users: usize) -> Self {
        let total = success + error;
        let rps = if elapsed.is_zero() {
            0.
        } else {
            total as f64 / elapsed.as_secs_f64()
        };
        let error_rate = if total == 0 {
            0.
        } else {
            error as f64 / total as f64
        };
        Self {
            rps,
            error_rate,
            elapsed,
            users,
            latency: LatencyDigest::new(),
        }
    }

    pub fn populate_latencies(&mut self, dur: &[Duration]) {
        self.latency.extend(dur);
    }

    pub fn latency(&self, quantile: f64) -> Duration {
        self.latency.quantile(quantile)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Users={}, Interval={:.2?}, RPS={:.2}, ErrorRate={:.2}, p50={:.2?}, p90={:.2?}, p99={:.2?}",
            self.users,
            self.elapsed,
            self.rps,
            self.error_rate,
            self.latency(0.5),
            self.latency(0.90),
            self.latency(0.99),
        )
    }
}
