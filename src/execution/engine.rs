//! Region renderer.
//!
//! Drives an operator through a full pass the way a compositing host would:
//! validate once, forward the region request, then call the engine for every
//! row of the region. Rows are independent, so they are rendered in parallel.

use crate::core::context::InputContext;
use crate::core::error::{MergeError, RenderError};
use crate::core::node::Operator;
use crate::core::row::Row;
use crate::core::types::{BBox, ChannelSet, ImageInfo};
use crate::execution::output::RenderedImage;
use crate::execution::progress::ProgressTracker;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Render options.
#[derive(Clone)]
pub struct RenderOptions {
    /// Whether to render rows on multiple threads.
    pub parallel: bool,
    /// Size of a dedicated thread pool (0 = use rayon's global pool).
    pub max_threads: usize,
    /// Channels to render. `None` renders the operator's default channels.
    /// Either way only channels present in the output are rendered.
    pub channels: Option<ChannelSet>,
    /// Progress tracker, also used to cancel a render in flight.
    pub tracker: Option<Arc<ProgressTracker>>,
}

impl std::fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOptions")
            .field("parallel", &self.parallel)
            .field("max_threads", &self.max_threads)
            .field("channels", &self.channels)
            .field("tracker", &self.tracker.as_ref().map(|_| "<tracker>"))
            .finish()
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_threads: 0,
            channels: None,
            tracker: None,
        }
    }
}

impl RenderOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable/disable parallel rendering.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the size of a dedicated thread pool.
    pub fn with_max_threads(mut self, max: usize) -> Self {
        self.max_threads = max;
        self
    }

    /// Restrict rendering to `channels`.
    pub fn with_channels(mut self, channels: ChannelSet) -> Self {
        self.channels = Some(channels);
        self
    }

    /// Attach a progress tracker.
    pub fn with_tracker(mut self, tracker: Arc<ProgressTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }
}

/// Render statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderStats {
    /// Rows rendered.
    pub rows: usize,
    /// Pixels rendered per channel.
    pub pixels: usize,
    /// Channels rendered.
    pub channels: usize,
    /// Wall time.
    pub duration: Duration,
}

/// Result of rendering a region.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Output geometry reported by validation.
    pub info: ImageInfo,
    /// Rendered samples.
    pub image: RenderedImage,
    /// Statistics.
    pub stats: RenderStats,
}

/// Renders operator output over whole regions.
#[derive(Debug, Clone, Default)]
pub struct RenderEngine {
    options: RenderOptions,
}

impl RenderEngine {
    /// Create an engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given options.
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render `region` (default: the validated bounding box) of `operator`.
    ///
    /// Stops at the first failing row and returns its error; rows finished
    /// before it are discarded.
    pub fn render(
        &self,
        operator: &dyn Operator,
        inputs: &dyn InputContext,
        region: Option<BBox>,
    ) -> Result<RenderOutput, MergeError> {
        let start = Instant::now();
        let node_id = operator.node_id();
        let info = operator.validate(inputs, true)?;

        let requested = self
            .options
            .channels
            .unwrap_or_else(|| operator.metadata().default_channels);
        let channels = requested.intersection(&info.channels);
        let region = region.unwrap_or(info.bbox);

        let mut image = RenderedImage::new(region, channels);
        if region.is_empty() || channels.is_empty() {
            debug!("{}: nothing to render in {} for {}", node_id, region, requested);
            return Ok(RenderOutput {
                info,
                image,
                stats: RenderStats {
                    duration: start.elapsed(),
                    ..RenderStats::default()
                },
            });
        }

        operator.request(inputs, region, channels, 1)?;

        let tracker = self
            .options
            .tracker
            .clone()
            .unwrap_or_else(|| ProgressTracker::new_shared(region.height() as usize));
        tracker.start();

        info!(
            "{}: rendering {} ({} rows, channels {}) from {} inputs",
            node_id,
            region,
            region.height(),
            channels,
            inputs.input_count()
        );

        let render_row = |y: i32| -> Result<(i32, Row), RenderError> {
            if tracker.is_cancelled() {
                return Err(RenderError::Cancelled);
            }
            let mut row = Row::new(region.x, region.r);
            operator.engine(inputs, y, region.x, region.r, channels, &mut row)?;
            tracker.row_completed();
            Ok((y, row))
        };

        let rows: Result<Vec<(i32, Row)>, RenderError> = if !self.options.parallel {
            (region.y..region.t).map(render_row).collect()
        } else if self.options.max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.max_threads)
                .build()
                .map_err(|e| RenderError::ThreadPool(e.to_string()))?;
            pool.install(|| (region.y..region.t).into_par_iter().map(render_row).collect())
        } else {
            (region.y..region.t).into_par_iter().map(render_row).collect()
        };

        let rows = match rows {
            Ok(rows) => rows,
            Err(RenderError::Cancelled) => {
                warn!(
                    "{}: render cancelled after {} of {} rows",
                    node_id,
                    tracker.rows_completed(),
                    region.height()
                );
                return Err(RenderError::Cancelled.into());
            }
            Err(e) => return Err(e.into()),
        };

        for (y, row) in rows {
            image.write_row(y, row);
        }
        tracker.complete();

        let stats = RenderStats {
            rows: region.height() as usize,
            pixels: region.width() as usize * region.height() as usize,
            channels: channels.len(),
            duration: start.elapsed(),
        };
        debug!("{}: render finished in {:?}", node_id, stats.duration);

        Ok(RenderOutput { info, image, stats })
    }
}
