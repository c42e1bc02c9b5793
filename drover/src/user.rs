//! The simulated user and its task loop.
use crate::atomics::StatsCollector;
use crate::http::HttpClient;
use crate::session::Session;
use crate::task::{Task, TaskSet};
use rand::rngs::SmallRng;
use std::sync::Arc;
use std::time::Instant;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

/// One concurrent simulated user: an HTTP client plus its own session.
#[derive(Debug)]
pub struct VirtualUser {
    id: usize,
    client: HttpClient,
    session: Session,
}

impl VirtualUser {
    pub fn new(id: usize, client: HttpClient) -> Self {
        Self {
            id,
            client,
            session: Session::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

/// Runs on-start tasks once, then weighted tasks forever. The swarm aborts the surrounding
/// tokio task to stop the user.
pub(crate) async fn run_user(
    mut user: VirtualUser,
    task_set: Arc<TaskSet>,
    tasks: Arc<StatsCollector>,
    mut rng: SmallRng,
) {
    debug!(user = user.id, "User started");

    for task in task_set.on_start() {
        run_task(task, &mut user, &tasks).await;
    }

    loop {
        let Some(task) = task_set.pick(&mut rng) else {
            error!("Task set {} has no tasks to pick from.", task_set.name());
            return;
        };
        run_task(task, &mut user, &tasks).await;

        let wait = task_set.sample_wait(&mut rng);
        trace!(user = user.id, "Waiting {wait:?}");
        tokio::time::sleep(wait).await;
    }
}

async fn run_task(task: &Task, user: &mut VirtualUser, tasks: &StatsCollector) {
    let start = Instant::now();
    let res = task.run(user).await;
    tasks.record(task.name(), res.is_ok(), start.elapsed());

    if let Err(err) = res {
        debug!(user = user.id, task = task.name(), "Task failed: {err}");
    }
}
