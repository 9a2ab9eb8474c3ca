//! Rendered region storage.

use crate::core::row::Row;
use crate::core::types::{span, BBox, Channel, ChannelSet};
use image::{ImageBuffer, Rgba, Rgba32FImage};

/// A rendered region: one `f32` plane per channel, rows stored bottom-up
/// starting at `bbox.y`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    bbox: BBox,
    channels: ChannelSet,
    planes: Vec<(Channel, Vec<f32>)>,
}

impl RenderedImage {
    /// Create a zero-filled image covering `bbox` with `channels`.
    pub fn new(bbox: BBox, channels: ChannelSet) -> Self {
        let len = bbox.width() as usize * bbox.height() as usize;
        Self {
            bbox,
            channels,
            planes: channels.iter().map(|c| (c, vec![0.0; len])).collect(),
        }
    }

    /// Region covered.
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// Channels stored.
    pub fn channels(&self) -> ChannelSet {
        self.channels
    }

    /// Whole plane for `channel`, row-major.
    pub fn plane(&self, channel: Channel) -> Option<&[f32]> {
        self.planes
            .iter()
            .find(|(c, _)| *c == channel)
            .map(|(_, plane)| plane.as_slice())
    }

    /// Samples of row `y` for `channel`.
    pub fn row(&self, channel: Channel, y: i32) -> Option<&[f32]> {
        if y < self.bbox.y || y >= self.bbox.t {
            return None;
        }
        let width = self.bbox.width() as usize;
        let start = span(self.bbox.y, y) * width;
        self.plane(channel).map(|plane| &plane[start..start + width])
    }

    /// Sample at pixel (`x`, `y`), or `None` outside the region or channel set.
    pub fn sample(&self, channel: Channel, x: i32, y: i32) -> Option<f32> {
        if !self.bbox.contains(x, y) {
            return None;
        }
        self.row(channel, y).map(|row| row[span(self.bbox.x, x)])
    }

    /// Copy a rendered row into place. Channels not stored here are ignored.
    pub fn write_row(&mut self, y: i32, mut row: Row) {
        if y < self.bbox.y || y >= self.bbox.t {
            return;
        }
        let width = self.bbox.width() as usize;
        let start = span(self.bbox.y, y) * width;
        let offset = span(row.x(), self.bbox.x);
        for (channel, plane) in self.planes.iter_mut() {
            if let Some(samples) = row.take(*channel) {
                let count = width.min(samples.len().saturating_sub(offset));
                plane[start..start + count].copy_from_slice(&samples[offset..offset + count]);
            }
        }
    }

    /// Convert to an RGBA float image. Missing color channels read as 0,
    /// a missing alpha as 1. Image row 0 is `bbox.y`.
    pub fn to_rgba32f(&self) -> Rgba32FImage {
        let (x0, y0) = (self.bbox.x, self.bbox.y);
        ImageBuffer::from_fn(self.bbox.width(), self.bbox.height(), |px, py| {
            let (x, y) = (x0 + px as i32, y0 + py as i32);
            Rgba([
                self.sample(Channel::RED, x, y).unwrap_or(0.0),
                self.sample(Channel::GREEN, x, y).unwrap_or(0.0),
                self.sample(Channel::BLUE, x, y).unwrap_or(0.0),
                self.sample(Channel::ALPHA, x, y).unwrap_or(1.0),
            ])
        })
    }
}
