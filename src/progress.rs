//! Progress-callback trait for per-page batch events.
//!
//! Inject an [`Arc<dyn BleedProgress>`] via
//! [`crate::config::BleedConfigBuilder::progress`] to receive events as
//! the pipeline works through the document. Callbacks are the least
//! invasive integration point: the CLI forwards them to a terminal
//! progress bar, a GUI could forward them to a channel, and the library
//! stays ignorant of both.
//!
//! There is no per-page error event: the first failing page aborts the
//! batch and the error surfaces through the returned `Result`.

use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only
/// override what they care about. Pages are processed strictly in order
/// on a single thread; `Send + Sync` is required only so the handle can
/// be stored in a shareable config.
pub trait BleedProgress: Send + Sync {
    /// Called once, after the page count is known and before any page is
    /// rendered. `total_pages` is the number of pages that will actually
    /// be processed (after page selection), not the document length.
    fn on_batch_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page is rasterised. `page_num` is 1-indexed.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page's bled image has been written to `path`.
    fn on_page_done(&self, page_num: usize, total_pages: usize, path: &Path) {
        let _ = (page_num, total_pages, path);
    }

    /// Called once after every selected page has been written.
    fn on_batch_done(&self, total_pages: usize, files_written: usize) {
        let _ = (total_pages, files_written);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl BleedProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::BleedConfig`].
pub type ProgressHandle = Arc<dyn BleedProgress>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingProgress {
        starts: AtomicUsize,
        dones: AtomicUsize,
        batch_total: AtomicUsize,
        written: AtomicUsize,
    }

    impl BleedProgress for TrackingProgress {
        fn on_batch_start(&self, total_pages: usize) {
            self.batch_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_start(&self, _page_num: usize, _total_pages: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_done(&self, _page_num: usize, _total_pages: usize, _path: &Path) {
            self.dones.fetch_add(1, Ordering::SeqCst);
        }

        fn on_batch_done(&self, _total_pages: usize, files_written: usize) {
            self.written.store(files_written, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_progress_does_not_panic() {
        let cb = NoopProgress;
        cb.on_batch_start(3);
        cb.on_page_start(1, 3);
        cb.on_page_done(1, 3, &PathBuf::from("001.png"));
        cb.on_batch_done(3, 3);
    }

    #[test]
    fn tracking_progress_receives_events() {
        let tracker = TrackingProgress {
            starts: AtomicUsize::new(0),
            dones: AtomicUsize::new(0),
            batch_total: AtomicUsize::new(0),
            written: AtomicUsize::new(0),
        };

        tracker.on_batch_start(2);
        tracker.on_page_start(1, 2);
        tracker.on_page_done(1, 2, &PathBuf::from("001.png"));
        tracker.on_page_start(2, 2);
        tracker.on_page_done(2, 2, &PathBuf::from("002.png"));
        tracker.on_batch_done(2, 2);

        assert_eq!(tracker.batch_total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.dones.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.written.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_handle_works() {
        let cb: ProgressHandle = Arc::new(NoopProgress);
        cb.on_batch_start(10);
        cb.on_page_start(1, 10);
    }
}
