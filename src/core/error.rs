//! Error types for MergeMedian.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Say which operator instance and which input they concern
//! - Carry host fetch failures through unchanged
//! - Be serializable where they describe configuration, for sending to a host UI

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for an operator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a node ID from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Top-level error type for MergeMedian.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Configuration errors caught at validation time.
///
/// When validation fails the operator performs no computation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Node {node_id} needs at least {minimum} inputs, {connected} connected")]
    TooFewInputs {
        node_id: NodeId,
        connected: usize,
        minimum: usize,
    },

    #[error("Node {node_id} accepts at most {maximum} inputs, {connected} connected")]
    TooManyInputs {
        node_id: NodeId,
        connected: usize,
        maximum: usize,
    },

    #[error("Input {input} of node {node_id} is not connected")]
    MissingInput { node_id: NodeId, input: usize },
}

/// Failures reported by the host while reading samples from an input.
///
/// The engine never retries or recovers from these; they are handed back
/// to the caller as the host reported them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Input {input} does not exist ({count} inputs connected)")]
    NoSuchInput { input: usize, count: usize },

    #[error("Row buffer holds {got} samples, request spans {expected}")]
    RangeMismatch { expected: usize, got: usize },

    #[error("{0}")]
    Source(String),
}

/// Errors while producing output rows.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Fetching input {input} failed: {source}")]
    Fetch {
        input: usize,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Columns {x}..{r} fall outside the output row {row_x}..{row_r}")]
    RowOutOfRange { x: i32, r: i32, row_x: i32, row_r: i32 },

    #[error("Could not start render threads: {0}")]
    ThreadPool(String),

    #[error("Render cancelled")]
    Cancelled,
}

/// Errors from the configuration surface.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parameter '{parameter}' has no option '{value}': {reason}")]
    UnknownOption {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Error Utilities
// ============================================================================

impl ValidationError {
    /// Node the error concerns.
    pub fn node_id(&self) -> NodeId {
        match self {
            ValidationError::TooFewInputs { node_id, .. }
            | ValidationError::TooManyInputs { node_id, .. }
            | ValidationError::MissingInput { node_id, .. } => *node_id,
        }
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> String {
        match self {
            ValidationError::TooFewInputs { minimum, connected, .. } => {
                format!("Connect {} more input(s)", minimum - connected)
            }
            ValidationError::TooManyInputs { maximum, connected, .. } => {
                format!("Disconnect {} input(s)", connected - maximum)
            }
            ValidationError::MissingInput { input, .. } => {
                format!("Connect an image to input {}", input)
            }
        }
    }
}

impl RenderError {
    /// Index of the input whose fetch failed, if this is a fetch failure.
    pub fn failed_input(&self) -> Option<usize> {
        match self {
            RenderError::Fetch { input, .. } => Some(*input),
            _ => None,
        }
    }
}

/// Result type alias for MergeMedian operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Result type alias for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type alias for row rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
