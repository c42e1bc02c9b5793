//! Swarm coordination: spawning simulated users and aggregating their statistics.
use crate::atomics::StatsCollector;
use crate::error::DroverError;
use crate::http::HttpClient;
use crate::measurement::Measurement;
use crate::task::{BoxFuture, TaskSet};
use crate::timer::Timer;
use crate::transaction::{TransactionData, TRANSACTION_HOOK};
use crate::user::{run_user, VirtualUser};
use drover_core::{LabelStats, RunStatistics, SwarmConfig};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::future::{pending, IntoFuture};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};

/// A load test: one task set driven by a number of concurrent simulated users.
///
/// Awaiting a `Swarm` runs it and yields the final [`RunStatistics`].
///
/// # Example
/// ```no_run
/// use drover::prelude::*;
/// use std::time::Duration;
///
/// # async fn run(task_set: TaskSet) -> Result<(), DroverError> {
/// let stats = Swarm::new(task_set)
///     .host("http://localhost:3002")
///     .users(50)
///     .hatch_rate(std::num::NonZeroU32::new(5).unwrap())
///     .duration(Duration::from_secs(300))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Swarm {
    task_set: TaskSet,
    config: SwarmConfig,
}

impl Swarm {
    pub fn new(task_set: TaskSet) -> Self {
        let config = SwarmConfig::new(task_set.name());
        Self { task_set, config }
    }

    /// Base URL every request path is resolved against.
    pub fn host(mut self, host: &str) -> Self {
        self.config.host = Some(host.to_string());
        self
    }

    /// Number of simulated users to run concurrently.
    pub fn users(mut self, users: usize) -> Self {
        self.config.users = users;
        self
    }

    /// Users spawned per second until `users` are running.
    pub fn hatch_rate(mut self, hatch_rate: NonZeroU32) -> Self {
        self.config.hatch_rate = hatch_rate;
        self
    }

    /// Stop after this long. Without a duration the swarm runs until Ctrl-C.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.config.duration = Some(duration);
        self
    }

    /// Cap the number of transactions per second across all users.
    pub fn max_tps(mut self, max_tps: NonZeroU32) -> Self {
        self.config.max_tps = Some(max_tps);
        self
    }

    /// How often interval measurements are logged.
    pub fn report_interval(mut self, report_interval: Duration) -> Self {
        self.config.report_interval = report_interval;
        self
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub async fn run(self) -> Result<RunStatistics, DroverError> {
        run_swarm(self.task_set, self.config).await
    }
}

impl IntoFuture for Swarm {
    type Output = Result<RunStatistics, DroverError>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.run())
    }
}

#[instrument(name = "swarm", skip_all, fields(name = %config.name))]
async fn run_swarm(task_set: TaskSet, config: SwarmConfig) -> Result<RunStatistics, DroverError> {
    config.validate()?;
    task_set.validate()?;
    let host = config.host.as_deref().ok_or(DroverError::MissingHost)?;
    let client = HttpClient::new(host)?;

    info!("Running {} with config {:?}", config.name, &config);

    let task_set = Arc::new(task_set);
    let atomics = SwarmAtomics::new(config.max_tps);
    let mut totals = Totals::default();
    let mut users: Vec<JoinHandle<()>> = Vec::with_capacity(config.users);

    let start = Instant::now();
    let mut timer = Timer::new(config.report_interval);
    let mut hatch = interval(config.hatch_period());
    hatch.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let deadline = config.duration.map(|duration| start + duration);
    let stop = async move {
        match deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => pending().await,
        }
    };
    tokio::pin!(stop);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    debug!("Reporting every {timer}");

    // NOTE: Measurements are taken on the timer tick; keep every branch short.
    loop {
        tokio::select! {
            _ = hatch.tick(), if users.len() < config.users => {
                let user = VirtualUser::new(users.len(), client.clone());
                users.push(atomics.spawn_user(user, task_set.clone()));
                if users.len() == config.users {
                    info!("All {} users hatched.", users.len());
                }
            }
            elapsed = timer.tick() => {
                let measurement = totals.absorb(&atomics, elapsed, users.len());
                totals.rps.push(measurement.rps);
                info!("{measurement}");
            }
            _ = &mut stop => {
                debug!("Duration elapsed.");
                break;
            }
            res = &mut ctrl_c => {
                if let Err(err) = res {
                    error!("Unable to listen for Ctrl-C: {err}");
                }
                info!("Interrupted; stopping users.");
                break;
            }
        }
    }

    for handle in &users {
        handle.abort();
    }
    for handle in users.iter_mut() {
        // NOTE: Aborted users resolve to a cancelled JoinError.
        if let Err(err) = handle.await {
            if err.is_panic() {
                error!("User panicked: {err}");
            }
        }
    }
    // NOTE: The trailing partial interval is tallied but kept out of the throughput series.
    let measurement = totals.absorb(&atomics, timer.since_last_tick(), users.len());
    debug!("Final interval: {measurement}");

    info!("Swarm complete");

    Ok(totals.into_statistics(config.name, users.len(), start.elapsed()))
}

/// Shared state handed to every user of one swarm.
struct SwarmAtomics {
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
    requests: Arc<StatsCollector>,
    tasks: Arc<StatsCollector>,
}

impl SwarmAtomics {
    fn new(max_tps: Option<NonZeroU32>) -> Self {
        Self {
            limiter: max_tps.map(|tps| Arc::new(rate_limiter(tps))),
            requests: Arc::new(StatsCollector::default()),
            tasks: Arc::new(StatsCollector::default()),
        }
    }

    fn clone_to_transaction_data(&self) -> TransactionData {
        TransactionData {
            limiter: self.limiter.clone(),
            requests: self.requests.clone(),
        }
    }

    fn spawn_user(&self, user: VirtualUser, task_set: Arc<TaskSet>) -> JoinHandle<()> {
        let transaction_data = self.clone_to_transaction_data();
        let tasks = self.tasks.clone();
        let id = user.id();

        tokio::spawn(
            TRANSACTION_HOOK
                .scope(
                    transaction_data,
                    run_user(user, task_set, tasks, SmallRng::from_entropy()),
                )
                .instrument(tracing::debug_span!("user", id)),
        )
    }
}

/// Cumulative statistics across every report interval, plus the throughput of each full one.
#[derive(Default)]
struct Totals {
    requests: BTreeMap<String, LabelStats>,
    tasks: BTreeMap<String, LabelStats>,
    rps: Vec<f64>,
}

impl Totals {
    fn absorb(&mut self, atomics: &SwarmAtomics, elapsed: Duration, users: usize) -> Measurement {
        let (mut success, mut error) = (0, 0);
        let mut latencies = vec![];

        for (label, collected) in atomics.requests.collect() {
            trace!("{label}: {} transactions", collected.count());
            success += collected.success;
            error += collected.error;
            latencies.extend_from_slice(&collected.latency);
            self.requests
                .entry(label)
                .or_insert_with_key(|label| LabelStats::new(label))
                .record(collected.success, collected.error, &collected.latency);
        }

        for (label, collected) in atomics.tasks.collect() {
            self.tasks
                .entry(label)
                .or_insert_with_key(|label| LabelStats::new(label))
                .record(collected.success, collected.error, &collected.latency);
        }

        let mut measurement = Measurement::new(success, error, elapsed, users);
        measurement.populate_latencies(&latencies);
        measurement
    }

    fn into_statistics(self, name: String, users: usize, elapsed: Duration) -> RunStatistics {
        let rps_mean = if self.rps.is_empty() {
            0.
        } else {
            statistical::mean(&self.rps)
        };
        let rps_std = if self.rps.len() < 2 {
            0.
        } else {
            statistical::standard_deviation(&self.rps, Some(rps_mean))
        };

        RunStatistics {
            name,
            users,
            elapsed,
            rps_mean,
            rps_std,
            requests: self.requests.into_values().collect(),
            tasks: self.tasks.into_values().collect(),
        }
    }
}

fn rate_limiter(tps_limit: NonZeroU32) -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_second(tps_limit).allow_burst(NonZeroU32::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, TaskError};
    use crate::transaction::transaction_hook;
    use drover_core::TransactionLabels;

    const LABELS: TransactionLabels = TransactionLabels {
        name: "sleep_1ms",
        success: "sleep_1ms_success",
        error: "sleep_1ms_error",
        latency: "sleep_1ms_latency",
    };

    fn task_set() -> TaskSet {
        TaskSet::new("mock")
            .set_wait_time(Duration::from_millis(1), Duration::from_millis(3))
            .unwrap()
            .register_task(
                Task::new("request", |_user| {
                    Box::pin(async {
                        transaction_hook::<_, (), ()>(LABELS, async {
                            tokio::time::sleep(Duration::from_millis(1)).await;
                            Ok(())
                        })
                        .await
                        .map_err(|_| TaskError::failed("unreachable"))
                    })
                })
                .set_weight(3)
                .unwrap(),
            )
            .register_task(Task::new("failing", |_user| {
                Box::pin(async { Err(TaskError::failed("always fails")) })
            }))
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn swarm_runs_users_for_duration() {
        let started = Instant::now();
        let stats = Swarm::new(task_set())
            .host("http://127.0.0.1:9")
            .users(3)
            .hatch_rate(NonZeroU32::new(100).unwrap())
            .report_interval(Duration::from_millis(100))
            .duration(Duration::from_millis(600))
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(600));
        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(stats.users, 3);
        assert_eq!(stats.name, "mock");

        let request = stats.task("request").unwrap();
        assert!(request.success() > 10);
        assert_eq!(request.error(), 0);

        let failing = stats.task("failing").unwrap();
        assert!(failing.error() > 0);
        assert_eq!(failing.success(), 0);

        let sleep = stats.request("sleep_1ms").unwrap();
        assert!(sleep.success() >= request.success());
        assert!(sleep.latency(0.5) >= Duration::from_millis(1));
        assert!(stats.rps_mean > 0.);
    }

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn max_tps_limits_transactions() {
        let stats = Swarm::new(task_set())
            .host("http://127.0.0.1:9")
            .users(4)
            .hatch_rate(NonZeroU32::new(100).unwrap())
            .max_tps(NonZeroU32::new(20).unwrap())
            .report_interval(Duration::from_millis(250))
            .duration(Duration::from_secs(1))
            .await
            .unwrap();

        let sleep = stats.request("sleep_1ms").unwrap();
        assert!(sleep.total() <= 30, "{} transactions", sleep.total());
    }

    #[tokio::test]
    async fn missing_host_is_an_error() {
        let res = Swarm::new(task_set())
            .duration(Duration::from_millis(10))
            .await;
        assert!(matches!(res, Err(DroverError::MissingHost)));
    }

    #[tokio::test]
    async fn empty_task_set_is_an_error() {
        let res = Swarm::new(TaskSet::new("empty"))
            .host("http://127.0.0.1:9")
            .duration(Duration::from_millis(10))
            .await;
        assert!(matches!(res, Err(DroverError::EmptyTaskSet(_))));
    }

    #[tokio::test]
    async fn zero_users_is_an_error() {
        let res = Swarm::new(task_set())
            .host("http://127.0.0.1:9")
            .users(0)
            .await;
        assert!(matches!(res, Err(DroverError::Config(_))));
    }
}
