//! Progress tracking and cancellation for region renders.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A progress update event.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// Rendering has started.
    Started {
        total_rows: usize,
    },
    /// Overall progress percentage.
    Progress {
        percent: f32,
        elapsed_ms: u64,
    },
    /// Rendering has completed.
    Completed {
        total_duration_ms: u64,
        rows_rendered: usize,
    },
    /// Rendering was cancelled.
    Cancelled,
}

/// Callback type for progress updates.
pub type ProgressCallback = Box<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Tracks render progress and allows cancellation.
///
/// Shared between worker threads; every method takes `&self`.
pub struct ProgressTracker {
    /// Total number of rows to render.
    total_rows: usize,
    /// Number of rows completed.
    completed_rows: AtomicU64,
    /// Whether rendering is cancelled.
    cancelled: AtomicBool,
    /// Start time.
    start_time: parking_lot::Mutex<Option<Instant>>,
    /// Progress callback.
    callback: Option<ProgressCallback>,
}

impl ProgressTracker {
    /// Create a new progress tracker.
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            completed_rows: AtomicU64::new(0),
            cancelled: AtomicBool::new(false),
            start_time: parking_lot::Mutex::new(None),
            callback: None,
        }
    }

    /// Create a progress tracker wrapped in Arc for sharing.
    pub fn new_shared(total_rows: usize) -> Arc<Self> {
        Arc::new(Self::new(total_rows))
    }

    /// Set a callback for progress updates.
    pub fn with_callback(mut self, callback: ProgressCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Total number of rows.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Start tracking.
    pub fn start(&self) {
        *self.start_time.lock() = Some(Instant::now());
        self.send_update(ProgressUpdate::Started {
            total_rows: self.total_rows,
        });
    }

    /// Report that a row has been rendered.
    pub fn row_completed(&self) {
        self.completed_rows.fetch_add(1, Ordering::Relaxed);
        self.send_update(ProgressUpdate::Progress {
            percent: self.progress_percent(),
            elapsed_ms: self.elapsed_ms(),
        });
    }

    /// Number of rows rendered so far.
    pub fn rows_completed(&self) -> usize {
        self.completed_rows.load(Ordering::Relaxed) as usize
    }

    /// Check if rendering should stop.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Request cancellation. Rows already started still finish.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::Relaxed) {
            self.send_update(ProgressUpdate::Cancelled);
        }
    }

    /// Complete tracking.
    pub fn complete(&self) {
        self.send_update(ProgressUpdate::Completed {
            total_duration_ms: self.elapsed_ms(),
            rows_rendered: self.rows_completed(),
        });
    }

    /// Get current progress percentage.
    pub fn progress_percent(&self) -> f32 {
        if self.total_rows == 0 {
            return 100.0;
        }
        (self.rows_completed() as f32 / self.total_rows as f32) * 100.0
    }

    fn elapsed_ms(&self) -> u64 {
        let start = *self.start_time.lock();
        start.map(|t| t.elapsed().as_millis() as u64).unwrap_or(0)
    }

    fn send_update(&self, update: ProgressUpdate) {
        if let Some(ref callback) = self.callback {
            callback(update);
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(0)
    }
}
