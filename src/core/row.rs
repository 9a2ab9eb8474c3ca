//! Scanline segment buffers.
//!
//! A `Row` is the output buffer handed to an operator's engine: one
//! horizontal segment `[x, r)` of a single scanline, with an owned sample
//! vector per channel. Engines write through `writable` with plain indexed
//! assignment, position 0 being column `x`.

use crate::core::types::{span, Channel, ChannelSet};

/// One scanline segment with per-channel sample storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    x: i32,
    r: i32,
    planes: Vec<(Channel, Vec<f32>)>,
}

impl Row {
    /// Create an empty row covering columns `x..r`.
    pub fn new(x: i32, r: i32) -> Self {
        Self {
            x,
            r: r.max(x),
            planes: Vec::new(),
        }
    }

    /// Left edge (inclusive).
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Right edge (exclusive).
    pub fn r(&self) -> i32 {
        self.r
    }

    /// Number of samples per channel.
    pub fn width(&self) -> usize {
        span(self.x, self.r)
    }

    /// Mutable samples for `channel`, zero-filled on first access.
    pub fn writable(&mut self, channel: Channel) -> &mut [f32] {
        let width = self.width();
        let index = match self.planes.iter().position(|(c, _)| *c == channel) {
            Some(index) => index,
            None => {
                self.planes.push((channel, vec![0.0; width]));
                self.planes.len() - 1
            }
        };
        &mut self.planes[index].1
    }

    /// Samples for `channel`, if it has been written.
    pub fn get(&self, channel: Channel) -> Option<&[f32]> {
        self.planes
            .iter()
            .find(|(c, _)| *c == channel)
            .map(|(_, samples)| samples.as_slice())
    }

    /// Sample at absolute column `column`, if the channel was written and the
    /// column is inside the segment.
    pub fn sample(&self, channel: Channel, column: i32) -> Option<f32> {
        if column < self.x || column >= self.r {
            return None;
        }
        self.get(channel).map(|s| s[span(self.x, column)])
    }

    /// Channels that have been written.
    pub fn channels(&self) -> ChannelSet {
        self.planes.iter().map(|(c, _)| *c).collect()
    }

    /// Take the samples for `channel` out of the row.
    pub fn take(&mut self, channel: Channel) -> Option<Vec<f32>> {
        let index = self.planes.iter().position(|(c, _)| *c == channel)?;
        Some(self.planes.swap_remove(index).1)
    }
}
