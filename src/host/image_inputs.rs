//! In-memory host binding over decoded images.
//!
//! `ImageInputs` holds the operator's inputs as RGBA float images, each
//! placed at an origin in pixel space, and serves rows from them. It is the
//! binding used by the region renderer in tests, benchmarks, and by callers
//! that want to median-merge image files without a compositing host.

use crate::core::context::InputContext;
use crate::core::error::{FetchError, MergeResult};
use crate::core::types::{span, BBox, Channel, ChannelSet, Format, ImageInfo};
use image::{DynamicImage, Rgba32FImage};
use log::debug;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::Path;

/// Region requests kept by default before the oldest are dropped.
pub const DEFAULT_REQUEST_LOG_LIMIT: usize = 1024;

/// One recorded region request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionRequest {
    /// Input the request was forwarded to.
    pub input: usize,
    /// Requested region.
    pub region: BBox,
    /// Requested channels.
    pub channels: ChannelSet,
    /// Expected number of reads.
    pub count: u32,
}

/// A decoded input image placed in pixel space.
#[derive(Debug, Clone)]
pub struct ImageSource {
    pixels: Rgba32FImage,
    info: ImageInfo,
}

impl ImageSource {
    /// Place `image` with its first row at `origin`. The channel set is rgba
    /// when the image has alpha and rgb otherwise.
    pub fn new(image: &DynamicImage, origin: (i32, i32)) -> Self {
        let channels = if image.color().has_alpha() {
            ChannelSet::rgba()
        } else {
            ChannelSet::rgb()
        };
        Self::from_rgba32f(image.to_rgba32f(), origin, channels)
    }

    /// Place float pixels with an explicit channel set.
    pub fn from_rgba32f(pixels: Rgba32FImage, origin: (i32, i32), channels: ChannelSet) -> Self {
        let (width, height) = pixels.dimensions();
        let extent = |size: u32| i32::try_from(size).unwrap_or(i32::MAX);
        let bbox = BBox::new(
            origin.0,
            origin.1,
            origin.0.saturating_add(extent(width)),
            origin.1.saturating_add(extent(height)),
        );
        Self {
            info: ImageInfo::new(bbox, channels, Format::new(width, height)),
            pixels,
        }
    }

    /// Override the full-frame format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.info.format = format;
        self
    }

    /// Geometry of this source.
    pub fn info(&self) -> ImageInfo {
        self.info
    }

    /// Columns `x..r` of row `y`, zero outside the box and for channels
    /// this source does not carry.
    fn read_row(&self, y: i32, x: i32, r: i32, channel: Channel, out: &mut [f32]) {
        out.fill(0.0);
        if !self.info.channels.contains(channel) || channel.index() > 3 {
            return;
        }
        let bbox = self.info.bbox;
        let Some(covered) = BBox::new(x, y, r, y.saturating_add(1)).intersect(&bbox) else {
            return;
        };
        let py = span(bbox.y, y) as u32;
        let px = span(bbox.x, covered.x) as u32;
        let start = span(x, covered.x);
        let segment = &mut out[start..start + covered.width() as usize];
        for (column, value) in (px..).zip(segment.iter_mut()) {
            *value = self.pixels.get_pixel(column, py).0[channel.index()];
        }
    }
}

/// `InputContext` over a list of in-memory images.
///
/// Region requests are logged so callers can inspect what was asked for.
/// The log keeps the most recent `request_limit` entries; a binding reused
/// across many renders can also empty it with `clear_requests`.
#[derive(Debug)]
pub struct ImageInputs {
    sources: Vec<ImageSource>,
    requests: Mutex<VecDeque<RegionRequest>>,
    request_limit: usize,
}

impl Default for ImageInputs {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            requests: Mutex::new(VecDeque::new()),
            request_limit: DEFAULT_REQUEST_LOG_LIMIT,
        }
    }
}

impl ImageInputs {
    /// Create an empty input list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` region requests (0 disables the log).
    pub fn with_request_limit(mut self, limit: usize) -> Self {
        self.request_limit = limit;
        self.requests.get_mut().truncate(limit);
        self
    }

    /// Connect a source as the next input.
    pub fn push(&mut self, source: ImageSource) -> usize {
        self.sources.push(source);
        self.sources.len() - 1
    }

    /// Builder-style `push`.
    pub fn with_source(mut self, source: ImageSource) -> Self {
        self.push(source);
        self
    }

    /// Decode an image file and connect it at `origin`.
    pub fn push_file(&mut self, path: impl AsRef<Path>, origin: (i32, i32)) -> MergeResult<usize> {
        let path = path.as_ref();
        let image = image::open(path)?;
        debug!(
            "loaded input {} from {} ({}x{})",
            self.sources.len(),
            path.display(),
            image.width(),
            image.height()
        );
        Ok(self.push(ImageSource::new(&image, origin)))
    }

    /// Connected sources in input order.
    pub fn sources(&self) -> &[ImageSource] {
        &self.sources
    }

    /// Region requests still in the log, oldest first.
    pub fn requests(&self) -> Vec<RegionRequest> {
        self.requests.lock().iter().copied().collect()
    }

    /// Forget recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }
}

impl InputContext for ImageInputs {
    fn input_count(&self) -> usize {
        self.sources.len()
    }

    fn metadata(&self, input: usize) -> Option<ImageInfo> {
        self.sources.get(input).map(ImageSource::info)
    }

    fn request_region(&self, input: usize, region: BBox, channels: ChannelSet, count: u32) {
        if self.request_limit == 0 {
            return;
        }
        let mut requests = self.requests.lock();
        while requests.len() >= self.request_limit {
            requests.pop_front();
        }
        requests.push_back(RegionRequest {
            input,
            region,
            channels,
            count,
        });
    }

    fn fetch_row(
        &self,
        input: usize,
        y: i32,
        x: i32,
        r: i32,
        channel: Channel,
        out: &mut [f32],
    ) -> Result<(), FetchError> {
        let source = self.sources.get(input).ok_or(FetchError::NoSuchInput {
            input,
            count: self.sources.len(),
        })?;
        let expected = span(x, r);
        if out.len() != expected {
            return Err(FetchError::RangeMismatch {
                expected,
                got: out.len(),
            });
        }
        source.read_row(y, x, r, channel, out);
        Ok(())
    }
}
