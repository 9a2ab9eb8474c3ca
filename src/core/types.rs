//! Geometry and channel types shared by the resolver and the engine.
//!
//! Everything here is a small `Copy` value:
//! - `Channel` / `ChannelSet`: which component planes are present or requested
//! - `BBox`: the pixel extent over which an image has defined data
//! - `Format`: the full-frame format an image belongs to
//! - `ImageInfo`: the per-input geometry record read during validation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest channel index a `ChannelSet` can hold (exclusive).
pub const MAX_CHANNELS: u8 = 64;

/// Number of columns (or rows) in `from..to`, 0 if the range is inverted.
///
/// Computed in `i64` so ranges wider than `i32::MAX` do not overflow.
pub fn span(from: i32, to: i32) -> usize {
    (to as i64 - from as i64).max(0) as usize
}

/// A single named component plane of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Channel(u8);

impl Channel {
    /// Red component.
    pub const RED: Channel = Channel(0);
    /// Green component.
    pub const GREEN: Channel = Channel(1);
    /// Blue component.
    pub const BLUE: Channel = Channel(2);
    /// Alpha/matte component. Merged like any other channel.
    pub const ALPHA: Channel = Channel(3);

    /// Create a channel from its index, or `None` if it is out of range.
    pub fn new(index: u8) -> Option<Self> {
        (index < MAX_CHANNELS).then_some(Self(index))
    }

    /// Index of this channel.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Display name of this channel.
    pub fn name(self) -> String {
        match self {
            Channel::RED => "rgba.red".to_string(),
            Channel::GREEN => "rgba.green".to_string(),
            Channel::BLUE => "rgba.blue".to_string(),
            Channel::ALPHA => "rgba.alpha".to_string(),
            Channel(n) => format!("channel{}", n),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A set of channels, used both as an image's channel set and as a request mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelSet(u64);

impl ChannelSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Red, green and blue.
    pub const fn rgb() -> Self {
        Self(0b0111)
    }

    /// Red, green, blue and alpha.
    pub const fn rgba() -> Self {
        Self(0b1111)
    }

    /// Add a channel.
    pub fn insert(&mut self, channel: Channel) {
        self.0 |= 1 << channel.0;
    }

    /// Remove a channel.
    pub fn remove(&mut self, channel: Channel) {
        self.0 &= !(1 << channel.0);
    }

    /// Builder-style `insert`.
    pub fn with(mut self, channel: Channel) -> Self {
        self.insert(channel);
        self
    }

    /// Check membership.
    pub fn contains(&self, channel: Channel) -> bool {
        self.0 & (1 << channel.0) != 0
    }

    /// Channels present in either set.
    pub fn union(&self, other: &ChannelSet) -> ChannelSet {
        ChannelSet(self.0 | other.0)
    }

    /// Channels present in both sets.
    pub fn intersection(&self, other: &ChannelSet) -> ChannelSet {
        ChannelSet(self.0 & other.0)
    }

    /// Number of channels in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set has no channels.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate over the channels in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = Channel> + '_ {
        let bits = self.0;
        (0..MAX_CHANNELS)
            .filter(move |i| bits & (1 << i) != 0)
            .map(Channel)
    }
}

impl FromIterator<Channel> for ChannelSet {
    fn from_iter<I: IntoIterator<Item = Channel>>(iter: I) -> Self {
        let mut set = ChannelSet::empty();
        for channel in iter {
            set.insert(channel);
        }
        set
    }
}

impl fmt::Display for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|c| c.name()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// Half-open pixel rectangle: columns `x..r`, rows `y..t`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge (inclusive)
    pub x: i32,
    /// Bottom row (inclusive)
    pub y: i32,
    /// Right edge (exclusive)
    pub r: i32,
    /// Top row (exclusive)
    pub t: i32,
}

impl BBox {
    /// Create a new box.
    pub fn new(x: i32, y: i32, r: i32, t: i32) -> Self {
        Self { x, y, r, t }
    }

    /// Width in pixels (0 for an empty box).
    pub fn width(&self) -> u32 {
        span(self.x, self.r) as u32
    }

    /// Height in rows (0 for an empty box).
    pub fn height(&self) -> u32 {
        span(self.y, self.t) as u32
    }

    /// Whether the box covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.r <= self.x || self.t <= self.y
    }

    /// Check whether the pixel at (`px`, `py`) lies inside the box.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.r && py >= self.y && py < self.t
    }

    /// Smallest box containing both. An empty box contributes nothing.
    pub fn merge(&self, other: &BBox) -> BBox {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        BBox {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            r: self.r.max(other.r),
            t: self.t.max(other.t),
        }
    }

    /// Overlap of both boxes, or `None` if they do not overlap.
    pub fn intersect(&self, other: &BBox) -> Option<BBox> {
        let clipped = BBox {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
            r: self.r.min(other.r),
            t: self.t.min(other.t),
        };
        (!clipped.is_empty()).then_some(clipped)
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x, self.y, self.r, self.t)
    }
}

/// Full-frame format of an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Format {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel aspect ratio
    pub pixel_aspect: f64,
}

impl Format {
    /// Square-pixel format of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_aspect: 1.0,
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Geometry record of an image: bounding box, channel set and format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Extent with defined data
    pub bbox: BBox,
    /// Channels the image carries
    pub channels: ChannelSet,
    /// Full-frame format
    pub format: Format,
}

impl ImageInfo {
    /// Create a new record.
    pub fn new(bbox: BBox, channels: ChannelSet, format: Format) -> Self {
        Self {
            bbox,
            channels,
            format,
        }
    }

    /// Union of boxes and channel sets. The format stays this record's.
    pub fn merge(&self, other: &ImageInfo) -> ImageInfo {
        ImageInfo {
            bbox: self.bbox.merge(&other.bbox),
            channels: self.channels.union(&other.channels),
            format: self.format,
        }
    }

    /// Union of channel sets only; the box is left pinned.
    pub fn merge_channels(&self, other: &ImageInfo) -> ImageInfo {
        ImageInfo {
            channels: self.channels.union(&other.channels),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_merge() {
        let a = BBox::new(0, 0, 10, 10);
        let b = BBox::new(5, 5, 15, 15);
        assert_eq!(a.merge(&b), BBox::new(0, 0, 15, 15));
        assert_eq!(b.merge(&a), BBox::new(0, 0, 15, 15));
    }

    #[test]
    fn test_bbox_merge_ignores_empty() {
        let a = BBox::new(3, 4, 8, 9);
        let empty = BBox::default();
        assert!(empty.is_empty());
        assert_eq!(a.merge(&empty), a);
        assert_eq!(empty.merge(&a), a);
    }

    #[test]
    fn test_bbox_intersect() {
        let a = BBox::new(0, 0, 10, 10);
        let b = BBox::new(5, 5, 15, 15);
        assert_eq!(a.intersect(&b), Some(BBox::new(5, 5, 10, 10)));
        assert_eq!(a.intersect(&BBox::new(20, 20, 30, 30)), None);
        assert_eq!(a.width(), 10);
        assert!(a.contains(9, 0));
        assert!(!a.contains(10, 0));
    }

    #[test]
    fn test_extreme_box_dimensions() {
        let wide = BBox::new(-2_000_000_000, i32::MIN, 2_000_000_000, i32::MAX);
        assert_eq!(wide.width(), 4_000_000_000);
        assert_eq!(wide.height(), u32::MAX);
        assert_eq!(span(i32::MAX, i32::MIN), 0);
    }

    #[test]
    fn test_channel_set_ops() {
        let mut set = ChannelSet::rgb();
        assert_eq!(set.len(), 3);
        assert!(!set.contains(Channel::ALPHA));

        set.insert(Channel::ALPHA);
        assert_eq!(set, ChannelSet::rgba());

        set.remove(Channel::RED);
        let channels: Vec<Channel> = set.iter().collect();
        assert_eq!(channels, vec![Channel::GREEN, Channel::BLUE, Channel::ALPHA]);

        let extra = Channel::new(10).unwrap();
        let other = ChannelSet::empty().with(extra);
        assert_eq!(set.union(&other).len(), 4);
        assert!(set.intersection(&other).is_empty());
        assert!(Channel::new(MAX_CHANNELS).is_none());
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::RED.name(), "rgba.red");
        assert_eq!(Channel::new(7).unwrap().name(), "channel7");
        assert_eq!(ChannelSet::rgb().to_string(), "{rgba.red, rgba.green, rgba.blue}");
    }

    #[test]
    fn test_info_merge_keeps_format() {
        let a = ImageInfo::new(BBox::new(0, 0, 4, 4), ChannelSet::rgb(), Format::new(4, 4));
        let b = ImageInfo::new(
            BBox::new(2, 2, 8, 8),
            ChannelSet::empty().with(Channel::ALPHA),
            Format::new(8, 8),
        );

        let merged = a.merge(&b);
        assert_eq!(merged.bbox, BBox::new(0, 0, 8, 8));
        assert_eq!(merged.channels, ChannelSet::rgba());
        assert_eq!(merged.format, Format::new(4, 4));

        let pinned = a.merge_channels(&b);
        assert_eq!(pinned.bbox, a.bbox);
        assert_eq!(pinned.channels, ChannelSet::rgba());
    }

    #[test]
    fn test_info_serialization() {
        let info = ImageInfo::new(BBox::new(1, 2, 3, 4), ChannelSet::rgba(), Format::new(3, 4));
        let json = serde_json::to_string(&info).unwrap();
        let back: ImageInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, back);
    }
}
