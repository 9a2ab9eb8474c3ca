//! Host bindings.
//!
//! Implementations of `InputContext` that do not need a compositing host.

pub mod image_inputs;

pub use image_inputs::{ImageInputs, ImageSource, RegionRequest};
