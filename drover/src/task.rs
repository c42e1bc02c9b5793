//! Task registry: named, weighted units of simulated user behavior.
use crate::error::DroverError;
use crate::http::HttpError;
use crate::user::VirtualUser;
use drover_core::WaitTime;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::num::NonZeroU32;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type TaskResult = Result<(), TaskError>;

type TaskFunction =
    Arc<dyn for<'a> Fn(&'a mut VirtualUser) -> BoxFuture<'a, TaskResult> + Send + Sync>;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("{0}")]
    Failed(String),
}

impl TaskError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// A named async function with a selection weight.
///
/// Usually created with the `#[task]` attribute rather than by hand.
#[derive(Clone)]
pub struct Task {
    name: Cow<'static, str>,
    weight: NonZeroU32,
    func: TaskFunction,
}

impl Task {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: for<'a> Fn(&'a mut VirtualUser) -> BoxFuture<'a, TaskResult> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            weight: NonZeroU32::MIN,
            func: Arc::new(func),
        }
    }

    pub fn with_weight(mut self, weight: NonZeroU32) -> Self {
        self.weight = weight;
        self
    }

    /// Set the weight, rejecting zero.
    pub fn set_weight(self, weight: u32) -> Result<Self, DroverError> {
        match NonZeroU32::new(weight) {
            Some(weight) => Ok(self.with_weight(weight)),
            None => Err(DroverError::ZeroWeight(self.name.into_owned())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> NonZeroU32 {
        self.weight
    }

    pub(crate) fn run<'a>(&self, user: &'a mut VirtualUser) -> BoxFuture<'a, TaskResult> {
        (self.func)(user)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// The behavior of one kind of simulated user.
///
/// On-start tasks run once per user, in registration order. Afterwards the user repeatedly
/// picks a weighted task and sleeps for a random duration within the wait time.
#[derive(Clone, Debug)]
pub struct TaskSet {
    name: String,
    tasks: Vec<Task>,
    on_start: Vec<Task>,
    wait_time: WaitTime,
    index: Option<WeightedIndex<u32>>,
}

impl TaskSet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tasks: vec![],
            on_start: vec![],
            wait_time: WaitTime::default(),
            index: None,
        }
    }

    pub fn register_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self.index = WeightedIndex::new(self.tasks.iter().map(|t| t.weight.get())).ok();
        self
    }

    pub fn register_on_start(mut self, task: Task) -> Self {
        self.on_start.push(task);
        self
    }

    pub fn set_wait_time(mut self, min: Duration, max: Duration) -> Result<Self, DroverError> {
        self.wait_time = WaitTime::new(min, max)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn on_start(&self) -> &[Task] {
        &self.on_start
    }

    pub fn wait_time(&self) -> WaitTime {
        self.wait_time
    }

    pub(crate) fn validate(&self) -> Result<(), DroverError> {
        if self.index.is_none() {
            return Err(DroverError::EmptyTaskSet(self.name.clone()));
        }
        Ok(())
    }

    /// Pick a task with probability proportional to its weight.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Task> {
        let index = self.index.as_ref()?;
        self.tasks.get(index.sample(rng))
    }

    /// A random pause within the wait time.
    pub fn sample_wait<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        rng.gen_range(self.wait_time.min()..=self.wait_time.max())
    }
}
