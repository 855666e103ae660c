//! Per-arrival processing pipeline
//!
//! Each received PDF goes through the same fixed sequence: wait for the
//! writer to finish, purge the scratch directory, split into pages, route page
//! pairs to the trays, delete the source. Only a split failure skips a step
//! (routing); every other failure is logged and the pipeline carries on.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;
use log::{error, info, warn};
use crate::alert::close_viewer_window;
use crate::collate::collate;
use crate::config::{Config, WaitPolicy};
use crate::error::CleanupError;
use crate::pdf::split_pdf;
use crate::print::PrintSink;
use crate::scratch::empty_dir;

/// Status line emitted whenever the handler is idle again
pub const READY_TEXT: &str = "Ready to receive new quipt pdf's...";

/// What happened to the routing stage of one arrival
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingOutcome {
    /// Pages were routed; `failed` counts rejected submissions
    Routed {
        pages: usize,
        submitted: usize,
        failed: usize,
    },
    /// Odd page count, nothing printed
    OddPageCount { pages: usize },
    /// The document had no pages
    NoPages,
    /// The source could not be split, nothing printed
    SplitFailed { reason: String },
}

/// Summary of one ingestion cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub source: PathBuf,
    pub outcome: RoutingOutcome,
    /// Scratch directory was purged without error
    pub scratch_reset: bool,
    /// Source file was deleted
    pub source_removed: bool,
}

/// Processes arrivals one at a time
pub struct IngestHandler {
    scratch_dir: PathBuf,
    wait: WaitPolicy,
    sink: Box<dyn PrintSink>,
    close_viewer: bool,
}

impl IngestHandler {
    /// Handler printing through the sink selected by `config.print_mode`
    pub fn new(config: &Config) -> Self {
        Self::with_sink(config, config.print_sink())
    }

    pub fn with_sink(config: &Config, sink: Box<dyn PrintSink>) -> Self {
        Self {
            scratch_dir: config.scratch_dir.clone(),
            wait: config.wait.clone(),
            sink,
            close_viewer: config.close_viewer,
        }
    }

    /// Run the full pipeline for one received file
    pub fn handle(&self, source: &Path) -> IngestReport {
        info!("Started receiving Quipt-PDF at: '{}'", source.display());
        info!(
            "Waiting for {:?} to complete the reception...",
            self.wait.delay
        );
        if !wait_for_write_completion(source, &self.wait) {
            warn!(
                "'{}' was still changing after {:?}, processing anyway",
                source.display(),
                self.wait.max_wait
            );
        }
        info!("Done waiting. Splitting Quipt-PDF received at: '{}'", source.display());

        let scratch_reset = self.reset_scratch();
        let outcome = self.split_and_route(source);

        let source_removed = match remove_source(source) {
            Ok(()) => {
                info!("Received PDF at path deleted: '{}'", source.display());
                true
            }
            Err(e) => {
                error!("{}", e);
                false
            }
        };

        info!("{}", READY_TEXT);

        if self.close_viewer {
            close_viewer_window();
        }

        IngestReport {
            source: source.to_path_buf(),
            outcome,
            scratch_reset,
            source_removed,
        }
    }

    fn reset_scratch(&self) -> bool {
        if let Err(e) = std::fs::create_dir_all(&self.scratch_dir) {
            warn!(
                "Cannot create scratch directory '{}': {}",
                self.scratch_dir.display(),
                e
            );
            return false;
        }

        match empty_dir(&self.scratch_dir) {
            Ok(removed) => {
                info!(
                    "Deleted {} file(s) from dir at: '{}'",
                    removed,
                    self.scratch_dir.display()
                );
                true
            }
            Err(e) => {
                warn!(
                    "Error while deleting contents of dir at '{}': {}",
                    self.scratch_dir.display(),
                    e
                );
                false
            }
        }
    }

    fn split_and_route(&self, source: &Path) -> RoutingOutcome {
        let pages = match split_pdf(source, &self.scratch_dir) {
            Ok(pages) => pages,
            Err(e) => {
                error!("Error while splitting the received pdf into individual pages: {}", e);
                return RoutingOutcome::SplitFailed {
                    reason: e.to_string(),
                };
            }
        };

        info!(
            "File at '{}' split successfully into {} page(s) at '{}'",
            source.display(),
            pages.len(),
            self.scratch_dir.display()
        );

        let page_count = pages.len();
        if page_count == 0 {
            warn!("'{}' has no pages, nothing to print", source.display());
            return RoutingOutcome::NoPages;
        }
        if page_count % 2 != 0 {
            info!(
                "'{}' has an odd number of pages ({}), skipping print",
                source.display(),
                page_count
            );
            return RoutingOutcome::OddPageCount { pages: page_count };
        }

        let pages: Vec<PathBuf> = pages.into_values().collect();
        let mut submitted = 0;
        let mut failed = 0;

        for decision in collate(&pages) {
            submitted += 1;
            if let Err(e) = self.sink.submit(&decision.page, decision.tray) {
                error!("Print job to {} failed: {}", decision.tray, e);
                failed += 1;
            }
        }

        RoutingOutcome::Routed {
            pages: page_count,
            submitted,
            failed,
        }
    }
}

/// Block until `path` is assumed fully written
///
/// Sleeps for the policy's fixed delay, then, if `stable_checks` is non-zero,
/// polls the file size until it is unchanged for that many consecutive polls.
/// At least one reading is always taken, and no sleep runs past `max_wait`.
/// Returns `false` if `max_wait` ran out before the size settled.
pub fn wait_for_write_completion(path: &Path, policy: &WaitPolicy) -> bool {
    let started = Instant::now();
    thread::sleep(policy.delay);

    if policy.stable_checks == 0 {
        return true;
    }

    let deadline = started + policy.max_wait;
    let mut last = file_len(path);
    let mut stable = 0;
    while stable < policy.stable_checks {
        let remaining = deadline.saturating_duration_since(Instant::now());
        thread::sleep(policy.poll_interval.min(remaining));

        let current = file_len(path);
        if current == last {
            stable += 1;
        } else {
            stable = 0;
            last = current;
        }

        if stable < policy.stable_checks && Instant::now() >= deadline {
            return false;
        }
    }

    true
}

fn file_len(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|m| m.len())
}

fn remove_source(source: &Path) -> Result<(), CleanupError> {
    std::fs::remove_file(source).map_err(|e| CleanupError::RemoveSource {
        path: source.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_fixed_wait_returns_immediately_without_checks() {
        let policy = WaitPolicy::fixed(Duration::ZERO);
        assert!(wait_for_write_completion(Path::new("missing.pdf"), &policy));
    }

    #[test]
    fn test_stable_file_settles() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("in.pdf");
        std::fs::write(&path, b"%PDF-1.5").unwrap();

        let policy = WaitPolicy {
            delay: Duration::ZERO,
            stable_checks: 2,
            poll_interval: Duration::from_millis(5),
            max_wait: Duration::from_secs(5),
        };
        assert!(wait_for_write_completion(&path, &policy));
    }

    #[test]
    fn test_wait_gives_up_at_max_wait() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("in.pdf");
        std::fs::write(&path, b"%PDF-1.5").unwrap();

        let policy = WaitPolicy {
            delay: Duration::ZERO,
            stable_checks: 1_000,
            poll_interval: Duration::from_millis(1),
            max_wait: Duration::from_millis(20),
        };
        assert!(!wait_for_write_completion(&path, &policy));
    }

    #[test]
    fn test_wait_never_sleeps_past_max_wait() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("in.pdf");
        std::fs::write(&path, b"%PDF-1.5").unwrap();

        let policy = WaitPolicy {
            delay: Duration::ZERO,
            stable_checks: 1_000,
            poll_interval: Duration::from_secs(2),
            max_wait: Duration::from_millis(50),
        };
        let started = Instant::now();
        assert!(!wait_for_write_completion(&path, &policy));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_wait_reads_size_even_when_delay_uses_up_max_wait() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("in.pdf");
        std::fs::write(&path, b"%PDF-1.5").unwrap();

        let policy = WaitPolicy {
            delay: Duration::from_millis(20),
            stable_checks: 1,
            poll_interval: Duration::from_millis(250),
            max_wait: Duration::from_millis(10),
        };
        assert!(wait_for_write_completion(&path, &policy));
    }

    #[test]
    fn test_remove_missing_source_is_cleanup_error() {
        let result = remove_source(Path::new("quipt-collator-missing-source.pdf"));
        assert!(matches!(result, Err(CleanupError::RemoveSource { .. })));
    }
}
