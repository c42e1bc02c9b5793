use std::num::NonZeroU32;
use std::time::Duration;

/// Lower bound of the pause a user takes between two tasks.
pub const DEFAULT_MIN_WAIT: Duration = Duration::from_millis(5_000);

/// Upper bound of the pause a user takes between two tasks.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(9_000);

pub const DEFAULT_USERS: usize = 1;

/// Users spawned per second until the configured count is reached.
pub const DEFAULT_HATCH_RATE: NonZeroU32 = NonZeroU32::MIN;

pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(5);
