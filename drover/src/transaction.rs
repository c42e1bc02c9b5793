use crate::atomics::StatsCollector;
use drover_core::TransactionLabels;
use governor::DefaultDirectRateLimiter;
use std::{future::Future, sync::Arc, time::Instant};

/// Transaction hook used by the `#[transaction]` macro. Not intended to be used manually.
///
/// Outside of a swarm (no hook in scope) the wrapped future simply runs.
pub async fn transaction_hook<T, R, E>(labels: TransactionLabels, func: T) -> T::Output
where
    T: Future<Output = Result<R, E>>,
{
    if let Ok(hook) = TRANSACTION_HOOK.try_with(|v| v.clone()) {
        if let Some(limiter) = &hook.limiter {
            limiter.until_ready().await;
        }

        let start = Instant::now();
        let res = func.await;
        let elapsed = start.elapsed();

        hook.requests.record(labels.name, res.is_ok(), elapsed);

        #[cfg(feature = "metrics")]
        {
            metrics::histogram!(labels.latency).record(elapsed.as_secs_f64());
            if res.is_ok() {
                metrics::counter!(labels.success).increment(1);
            } else {
                metrics::counter!(labels.error).increment(1);
            }
        }

        res
    } else {
        tracing::trace!("No hook available for {}.", labels.name);
        func.await
    }
}

#[derive(Clone)]
pub(crate) struct TransactionData {
    pub limiter: Option<Arc<DefaultDirectRateLimiter>>,
    pub requests: Arc<StatsCollector>,
}

tokio::task_local! {
    pub(crate) static TRANSACTION_HOOK: TransactionData;
}
