use crate::LatencyDigest;
use std::fmt;
use std::time::Duration;

/// Success/error counts and latency for one named transaction or task.
#[derive(Debug, Clone)]
pub struct LabelStats {
    name: String,
    success: u64,
    error: u64,
    latency: LatencyDigest,
}

impl LabelStats {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            success: 0,
            error: 0,
            latency: LatencyDigest::new(),
        }
    }

    pub fn record(&mut self, success: u64, error: u64, latencies: &[Duration]) {
        self.success += success;
        self.error += error;
        self.latency.extend(latencies);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn success(&self) -> u64 {
        self.success
    }

    pub fn error(&self) -> u64 {
        self.error
    }

    pub fn total(&self) -> u64 {
        self.success + self.error
    }

    pub fn error_rate(&self) -> f64 {
        match self.total() {
            0 => 0.,
            total => self.error as f64 / total as f64,
        }
    }

    pub fn latency(&self, quantile: f64) -> Duration {
        self.latency.quantile(quantile)
    }

    pub fn mean_latency(&self) -> Duration {
        self.latency.mean()
    }

    pub fn max_latency(&self) -> Duration {
        self.latency.max()
    }
}

/// Statistics for a completed swarm run.
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub name: String,
    pub users: usize,
    pub elapsed: Duration,
    /// Mean requests per second across report intervals.
    pub rps_mean: f64,
    /// Standard deviation of requests per second across report intervals.
    pub rps_std: f64,
    pub requests: Vec<LabelStats>,
    pub tasks: Vec<LabelStats>,
}

impl RunStatistics {
    pub fn request(&self, name: &str) -> Option<&LabelStats> {
        self.requests.iter().find(|s| s.name() == name)
    }

    pub fn task(&self, name: &str) -> Option<&LabelStats> {
        self.tasks.iter().find(|s| s.name() == name)
    }

    pub fn total_requests(&self) -> u64 {
        self.requests.iter().map(LabelStats::total).sum()
    }

    pub fn total_errors(&self) -> u64 {
        self.requests.iter().map(LabelStats::error).sum()
    }

    pub fn error_rate(&self) -> f64 {
        match self.total_requests() {
            0 => 0.,
            total => self.total_errors() as f64 / total as f64,
        }
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} users, {:.2?} elapsed, {:.2} req/s (std {:.2}), error rate {:.2}%",
            self.name,
            self.users,
            self.elapsed,
            self.rps_mean,
            self.rps_std,
            self.error_rate() * 100.,
        )?;
        write_table(f, "Requests", &self.requests)?;
        write_table(f, "Tasks", &self.tasks)
    }
}

fn write_table(f: &mut fmt::Formatter<'_>, title: &str, rows: &[LabelStats]) -> fmt::Result {
    writeln!(f)?;
    writeln!(
        f,
        "{:<20} {:>9} {:>9} {:>10} {:>10} {:>10} {:>10} {:>10}",
        title, "# ok", "# fails", "avg", "p50", "p90", "p99", "max"
    )?;
    for row in rows {
        writeln!(
            f,
            "{:<20} {:>9} {:>9} {:>10.2?} {:>10.2?} {:>10.2?} {:>10.2?} {:>10.2?}",
            row.name(),
            row.success(),
            row.error(),
            row.mean_latency(),
            row.latency(0.5),
            row.latency(0.9),
            row.latency(0.99),
            row.max_latency(),
        )?;
    }
    Ok(())
}
