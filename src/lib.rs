//! # MergeMedian - per-pixel median of many images
//!
//! MergeMedian is a scanline image operator that combines between 2 and 100
//! input images into one by taking, at every pixel and for every channel,
//! the median of the inputs' values. A typical use is removing transient
//! objects from a stack of aligned plates.
//!
//! ## Features
//!
//! - **Bounding-box policies**: union of all inputs, input A's box, or input B's box
//! - **Row engine**: median computed per row with reused scratch buffers
//! - **Parallel rendering**: whole regions rendered row-parallel with rayon
//! - **Host binding**: in-memory inputs built from decoded image files
//! - **Configuration**: operator and renderer settings from TOML or JSON
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mergemedian::prelude::*;
//!
//! let mut inputs = ImageInputs::new();
//! inputs.push_file("plate_0.tiff", (0, 0))?;
//! inputs.push_file("plate_1.tiff", (0, 0))?;
//! inputs.push_file("plate_2.tiff", (0, 0))?;
//!
//! let operator = MergeMedian::with_bbox(BBoxPolicy::Union);
//! let output = RenderEngine::new().render(&operator, &inputs, None)?;
//! let median = image::DynamicImage::ImageRgba32F(output.image.to_rgba32f());
//! median.to_rgba8().save("median.png")?;
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: geometry, channels, rows, errors, and the `Operator` / `InputContext` traits
//! - [`filters`]: bounding-box resolution, the median engine, and the `MergeMedian` operator
//! - [`execution`]: region renderer with progress tracking and cancellation
//! - [`host`]: `InputContext` over in-memory images
//! - [`config`]: serializable configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod execution;
pub mod filters;
pub mod host;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use mergemedian::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{BBox, Channel, ChannelSet, Format, ImageInfo};
    pub use crate::core::row::Row;

    // Operator traits and metadata
    pub use crate::core::context::InputContext;
    pub use crate::core::node::{Category, NodeMetadata, Operator};
    pub use crate::core::port::{Constraint, ParameterDefinition, UiHint};

    // Errors
    pub use crate::core::error::{
        ConfigError, FetchError, MergeError, NodeId, RenderError, ValidationError,
    };

    // Operator
    pub use crate::filters::{input_label, BBoxPolicy, MergeMedian};

    // Execution
    pub use crate::execution::{
        ProgressTracker, ProgressUpdate, RenderEngine, RenderOptions, RenderOutput, RenderedImage,
    };

    // Host binding and configuration
    pub use crate::config::MergeMedianConfig;
    pub use crate::host::{ImageInputs, ImageSource};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "mergemedian");
    }

    #[test]
    fn test_operator_through_trait_object() {
        let operator: Box<dyn Operator> = Box::new(MergeMedian::new());
        let cloned = operator.clone();

        assert_eq!(cloned.metadata().class, "MergeMedian");
        assert_eq!(cloned.node_id(), operator.node_id());
        assert_eq!(cloned.input_label(1, 3), "A1");
    }
}
