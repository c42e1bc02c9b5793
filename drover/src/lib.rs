#![cfg_attr(docsrs, feature(doc_cfg))]
//! Drover is a weighted-task HTTP load generator.
//!
//! A [`TaskSet`](task::TaskSet) registers async tasks with integer weights. A
//! [`Swarm`](swarm::Swarm) spawns simulated users that repeatedly pick a task at random
//! (proportionally to its weight), run it, then pause for a random wait time. Requests made
//! through `#[transaction]` functions are timed and tallied into the final
//! [`RunStatistics`](drover_core::RunStatistics).
//!
//! ```no_run
//! use drover::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DroverError> {
//!     let task_set = TaskSet::new("WebsiteUser")
//!         .set_wait_time(Duration::from_secs(5), Duration::from_secs(9))?
//!         .register_task(index());
//!
//!     let stats = Swarm::new(task_set)
//!         .host("http://localhost:3002")
//!         .users(10)
//!         .duration(Duration::from_secs(60))
//!         .await?;
//!     println!("{stats}");
//!     Ok(())
//! }
//!
//! #[task(2)]
//! async fn index(user: &mut VirtualUser) -> TaskResult {
//!     get_index(user.client()).await?;
//!     Ok(())
//! }
//!
//! #[transaction]
//! async fn get_index(client: &HttpClient) -> Result<Reply, HttpError> {
//!     client.send(client.get("/")).await?.error_for_status()
//! }
//! ```

pub mod error;
pub mod http;
pub mod session;
pub mod swarm;
pub mod task;
#[doc(hidden)]
pub mod transaction;
pub mod user;

pub(crate) mod atomics;
pub(crate) mod measurement;
pub(crate) mod timer;

#[doc(hidden)]
pub use drover_core as core;
#[doc(hidden)]
pub use drover_core::generate_labels;
pub use drover_core::{LabelStats, RunStatistics, WaitTime};
pub use drover_macros::{task, transaction};
pub use swarm::Swarm;

pub mod prelude {
    pub use crate::error::DroverError;
    pub use crate::http::{HttpClient, HttpError, Reply};
    pub use crate::session::Session;
    pub use crate::swarm::Swarm;
    pub use crate::task::{Task, TaskError, TaskResult, TaskSet};
    pub use crate::user::VirtualUser;
    pub use drover_core::{LabelStats, RunStatistics, WaitTime};
    pub use drover_macros::{task, transaction};
}
