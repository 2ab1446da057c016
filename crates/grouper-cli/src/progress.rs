use grouper_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;

/// CLI progress reporter: a spinner while the classifier is working and a
/// check-mark line per finished phase.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        let mut guard = self.bar.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }

    fn spinner(message: String) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message);
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, root: &Path) {
        self.set_bar(Self::spinner(format!("Scanning {}...", root.display())));
    }

    fn on_scan_complete(&self, total_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} files in {:.2}s",
            total_files, duration_secs
        );
    }

    fn on_classify_start(&self, total_files: usize) {
        self.set_bar(Self::spinner(format!(
            "Asking the classifier to group {} files...",
            total_files
        )));
    }

    fn on_classify_attempt_failed(&self, attempt: u32, max_attempts: u32, reason: &str) {
        let guard = self.bar.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(pb) = guard.as_ref() {
            pb.println(format!(
                "  \x1b[33m!\x1b[0m Attempt {}/{} failed: {}",
                attempt, max_attempts, reason
            ));
        }
    }

    fn on_classify_complete(&self, groups: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Classification complete: {} groups in {:.2}s",
            groups, duration_secs
        );
    }

    fn on_file_moved(&self, _from: &Path, to: &Path) {
        eprintln!("  \x1b[32m→\x1b[0m {}", to.display());
    }

    fn on_file_skipped(&self, path: &Path) {
        eprintln!("  \x1b[33m-\x1b[0m skipped {}", path.display());
    }

    fn on_file_failed(&self, path: &Path, reason: &str) {
        eprintln!("  \x1b[31m✗\x1b[0m {}: {}", path.display(), reason);
    }

    fn on_run_complete(&self, _success: bool) {
        self.finish_bar();
    }
}
