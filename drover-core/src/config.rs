use crate::{
    DEFAULT_HATCH_RATE, DEFAULT_MAX_WAIT, DEFAULT_MIN_WAIT, DEFAULT_REPORT_INTERVAL,
    DEFAULT_USERS,
};
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Wait time minimum ({min:?}) is greater than the maximum ({max:?})")]
    InvalidWaitTime { min: Duration, max: Duration },

    #[error("A swarm needs at least one user")]
    ZeroUsers,

    #[error("The report interval must be non-zero")]
    ZeroReportInterval,
}

/// Inclusive range a simulated user sleeps for between two tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitTime {
    min: Duration,
    max: Duration,
}

impl WaitTime {
    pub fn new(min: Duration, max: Duration) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidWaitTime { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

impl Default for WaitTime {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_WAIT,
            max: DEFAULT_MAX_WAIT,
        }
    }
}

// TODO: Have a separate builder
#[doc(hidden)]
#[derive(Clone, Debug)]
pub struct SwarmConfig {
    pub name: String,
    pub host: Option<String>,
    pub users: usize,
    pub hatch_rate: NonZeroU32,
    pub duration: Option<Duration>,
    pub max_tps: Option<NonZeroU32>,
    pub report_interval: Duration,
}

impl SwarmConfig {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            host: None,
            users: DEFAULT_USERS,
            hatch_rate: DEFAULT_HATCH_RATE,
            duration: None,
            max_tps: None,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.users == 0 {
            return Err(ConfigError::ZeroUsers);
        }
        if self.report_interval.is_zero() {
            return Err(ConfigError::ZeroReportInterval);
        }
        Ok(())
    }

    /// Delay between two user spawns. Never zero, even for rates above one per nanosecond.
    pub fn hatch_period(&self) -> Duration {
        (Duration::from_secs(1) / self.hatch_rate.get()).max(Duration::from_nanos(1))
    }
}
