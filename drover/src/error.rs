use drover_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DroverError {
    #[error("Task \"{0}\" must have a weight greater than zero")]
    ZeroWeight(String),

    #[error("Task set \"{0}\" has no weighted tasks")]
    EmptyTaskSet(String),

    #[error("No host configured; use `.host()`")]
    MissingHost,

    #[error("Invalid host \"{host}\": {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build the HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
