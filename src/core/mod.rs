//! Core types and traits for the MergeMedian operator.
//!
//! This module contains the foundational pieces the operator is built from:
//! - Geometry and channel types
//! - The row-buffer shim engines write into
//! - Parameter definitions and constraints
//! - The operator trait and its metadata
//! - The host input interface
//! - Error types

pub mod types;
pub mod row;
pub mod port;
pub mod error;
pub mod context;
pub mod node;

// Re-export commonly used types
pub use types::{span, BBox, Channel, ChannelSet, Format, ImageInfo};
pub use row::Row;
pub use port::{Constraint, ParameterDefinition, UiHint};
pub use error::{ConfigError, FetchError, MergeError, NodeId, RenderError, ValidationError};
pub use context::InputContext;
pub use node::{Category, NodeMetadata, Operator};
