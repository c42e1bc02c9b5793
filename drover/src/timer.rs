use std::fmt;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Reporting clock for a swarm.
///
/// Ticks once per report interval, starting one full interval after creation. Every tick and
/// the final [`Timer::since_last_tick`] hand out the exact span they cover, so consecutive
/// measurements tile the run without gaps.
pub(crate) struct Timer {
    interval: Interval,
    last_tick: Instant,
}

impl Timer {
    pub fn new(period: Duration) -> Self {
        let now = Instant::now();
        let mut interval = interval_at(now + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            last_tick: now,
        }
    }

    /// Wait for the next report and return the span since the previous one.
    pub async fn tick(&mut self) -> Duration {
        self.interval.tick().await;
        let now = Instant::now();
        let span = now - self.last_tick;
        self.last_tick = now;
        span
    }

    /// Span not yet covered by a tick; used for the trailing partial interval.
    pub fn since_last_tick(&self) -> Duration {
        self.last_tick.elapsed()
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", humantime::format_duration(self.interval.period()))
    }
}
