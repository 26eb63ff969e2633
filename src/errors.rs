// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("Unknown language code: {0}")]
    UnknownLocale(String),

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Unknown field '{field}' for dataset {dataset}")]
    UnknownField { dataset: String, field: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Task '{task}' rejected its input: {message}")]
    TaskInput { task: String, message: String },

    #[error("TOML serialization error: {0}")]
    TomlSerializationError(#[from] toml::ser::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerializationError(#[from] serde_json::Error),
}

impl GuardError {
    pub fn task_input(task: &str, message: impl Into<String>) -> Self {
        GuardError::TaskInput {
            task: task.to_string(),
            message: message.into(),
        }
    }
}
