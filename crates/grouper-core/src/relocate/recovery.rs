use std::path::{Path, PathBuf};

/// Operator answer when a source file cannot be found at move time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryChoice {
    Retry(PathBuf),
    Skip,
}

/// Blocking operator interaction for a missing source path. Called again
/// after every failed retry; there is no timeout.
pub trait RecoveryPrompt: Send + Sync {
    fn replacement_path(&self, missing: &Path) -> RecoveryChoice;
}

/// Non-interactive prompt: every missing file is skipped.
pub struct SkipMissing;

impl RecoveryPrompt for SkipMissing {
    fn replacement_path(&self, _missing: &Path) -> RecoveryChoice {
        RecoveryChoice::Skip
    }
}
