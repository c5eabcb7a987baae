//! Error types for the edit engine

use thiserror::Error;

/// Main error type for the engine
///
/// Only selection failures and budget overflow escape a running operation.
/// Per-block failures (invalid type, mask rejection, resource denial) are
/// absorbed by the scheduler and show up as "no change".
#[derive(Debug, Error)]
pub enum Error {
    #[error("Incomplete selection: {0}")]
    IncompleteSelection(String),

    #[error("Maximum number of changed blocks exceeded ({limit})")]
    ChangeLimitExceeded { limit: usize },

    #[error("Brush radius {radius} exceeds the maximum of {max}")]
    BrushTooLarge { radius: f64, max: f64 },

    #[error("Operation '{operation}' cannot run from state {state}")]
    InvalidState { operation: &'static str, state: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
