//! Host interface consumed by operators.
//!
//! The host owns the upstream images, decides which regions are needed and
//! when, and hands operators an `InputContext` through which they read input
//! geometry, forward region requests, and pull sample rows.

use crate::core::error::FetchError;
use crate::core::types::{BBox, Channel, ChannelSet, ImageInfo};

/// Access to an operator's connected inputs.
///
/// Inputs are 0-indexed in connection order. Implementations must tolerate
/// concurrent `fetch_row` calls from several worker threads; operators never
/// mutate anything they read through this trait.
pub trait InputContext: Send + Sync {
    /// Number of connected inputs.
    fn input_count(&self) -> usize;

    /// Geometry of input `input`, or `None` if it is not connected.
    fn metadata(&self, input: usize) -> Option<ImageInfo>;

    /// Announce that `region` of input `input` will be read for `channels`.
    ///
    /// `count` is the number of times the region is expected to be read.
    fn request_region(&self, input: usize, region: BBox, channels: ChannelSet, count: u32);

    /// Read columns `x..r` of row `y` of one channel from input `input`.
    ///
    /// `out` has exactly `r - x` elements; all of them must be written.
    fn fetch_row(
        &self,
        input: usize,
        y: i32,
        x: i32,
        r: i32,
        channel: Channel,
        out: &mut [f32],
    ) -> Result<(), FetchError>;
}
