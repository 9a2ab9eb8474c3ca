//! Region rendering.
//!
//! Drives an operator over whole regions, row by row, with progress
//! reporting and cancellation.

pub mod engine;
pub mod output;
pub mod progress;

pub use engine::{RenderEngine, RenderOptions, RenderOutput, RenderStats};
pub use output::RenderedImage;
pub use progress::{ProgressCallback, ProgressTracker, ProgressUpdate};
