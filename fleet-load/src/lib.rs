//! Car-fleet API load test: fixtures, per-request transactions and the weighted task set.
use drover::task::TaskSet;

pub mod api;
pub mod fixtures;
pub mod tasks;

/// Name of the fleet task set, reported in the final statistics.
pub const TASK_SET_NAME: &str = "UserBehavior";

/// Admin login on start, then car_register(8), car_list(5), user_list(4) and
/// user_register(3). Waits default to 5-9s.
pub fn task_set() -> TaskSet {
    TaskSet::new(TASK_SET_NAME)
        .register_on_start(tasks::on_start())
        .register_task(tasks::car_register())
        .register_task(tasks::car_list())
        .register_task(tasks::user_list())
        .register_task(tasks::user_register())
}
