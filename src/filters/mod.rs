//! Filter module.
//!
//! Contains the bounding-box resolver, the median engine, and the
//! MergeMedian operator built from them.

pub mod bbox;
pub mod median;
pub mod merge_median;

pub use bbox::{resolve_geometry, BBoxPolicy};
pub use median::{median_in_place, merge_channel, MedianScratch};
pub use merge_median::{input_label, MergeMedian};
