use std::path::Path;

/// Trait for reporting run progress.
///
/// CLI implements with indicatif spinners and colored summaries.
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self, _root: &Path) {}
    fn on_scan_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_classify_start(&self, _total_files: usize) {}
    fn on_classify_attempt_failed(&self, _attempt: u32, _max_attempts: u32, _reason: &str) {}
    fn on_classify_complete(&self, _groups: usize, _duration_secs: f64) {}
    fn on_file_moved(&self, _from: &Path, _to: &Path) {}
    fn on_file_skipped(&self, _path: &Path) {}
    fn on_file_failed(&self, _path: &Path, _reason: &str) {}
    fn on_run_complete(&self, _success: bool) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
