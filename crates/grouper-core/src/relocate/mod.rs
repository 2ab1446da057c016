mod recovery;
pub mod sanitize;

pub use recovery::{RecoveryChoice, RecoveryPrompt, SkipMissing};

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::classify::GroupingResult;
use crate::error::MoveError;
use crate::progress::{ProgressReporter, SilentReporter};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelocationReport {
    pub moved: usize,
    /// Names in the grouping that the scan never saw.
    pub unknown_names: usize,
    /// Missing sources the operator chose to skip.
    pub skipped: usize,
    pub failed: usize,
    pub rejected_groups: usize,
}

enum FileOutcome {
    Moved,
    Skipped,
    Failed,
}

/// Moves grouped files into `target_root/<group>/`, asking the recovery
/// prompt whenever a source has gone missing.
pub struct Relocator<'a> {
    prompt: &'a dyn RecoveryPrompt,
    reporter: &'a dyn ProgressReporter,
    strict_names: bool,
}

impl<'a> Relocator<'a> {
    pub fn new(prompt: &'a dyn RecoveryPrompt) -> Self {
        Self {
            prompt,
            reporter: &SilentReporter,
            strict_names: true,
        }
    }

    pub fn with_reporter(mut self, reporter: &'a dyn ProgressReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_strict_names(mut self, strict: bool) -> Self {
        self.strict_names = strict;
        self
    }

    /// Groups are handled in the result's order, files in listed order.
    /// Per-file failures never stop the pass.
    pub fn relocate(
        &self,
        result: &GroupingResult,
        paths: &HashMap<String, PathBuf>,
        target_root: &Path,
    ) -> RelocationReport {
        let mut report = RelocationReport::default();

        for (group, files) in result.iter() {
            let Some(folder) = sanitize::folder_name(group, self.strict_names) else {
                warn!("Rejecting unsafe group name {:?}", group);
                report.rejected_groups += 1;
                continue;
            };

            let target_folder = target_root.join(&folder);
            if let Err(err) = fs::create_dir_all(&target_folder) {
                error!(
                    "Cannot create directory {}: {}",
                    target_folder.display(),
                    err
                );
                for file in files {
                    if let Some(source) = paths.get(file) {
                        self.reporter.on_file_failed(source, &err.to_string());
                        report.failed += 1;
                    }
                }
                continue;
            }
            info!("Created directory: {}", target_folder.display());

            for file in files {
                let Some(source) = paths.get(file) else {
                    report.unknown_names += 1;
                    continue;
                };
                // The on-disk name, not the (possibly lossy) listed one.
                let dest = match source.file_name() {
                    Some(on_disk) => target_folder.join(on_disk),
                    None => target_folder.join(file),
                };
                match self.move_with_recovery(source, &dest) {
                    FileOutcome::Moved => report.moved += 1,
                    FileOutcome::Skipped => report.skipped += 1,
                    FileOutcome::Failed => report.failed += 1,
                }
            }
        }

        report
    }

    fn move_with_recovery(&self, source: &Path, dest: &Path) -> FileOutcome {
        let mut source = source.to_path_buf();

        loop {
            match move_file(&source, dest) {
                Ok(()) => {
                    info!("Moved {} to {}", source.display(), dest.display());
                    self.reporter.on_file_moved(&source, dest);
                    return FileOutcome::Moved;
                }
                Err(MoveError::MissingSource(missing)) => {
                    warn!("File not found: {}", missing.display());
                    match self.prompt.replacement_path(&missing) {
                        RecoveryChoice::Retry(replacement) => source = replacement,
                        RecoveryChoice::Skip => {
                            info!("Skipping file: {}", missing.display());
                            self.reporter.on_file_skipped(&missing);
                            return FileOutcome::Skipped;
                        }
                    }
                }
                Err(err) => {
                    error!("Error moving file: {}", err);
                    self.reporter.on_file_failed(&source, &err.to_string());
                    return FileOutcome::Failed;
                }
            }
        }
    }
}

/// Move one file, overwriting `to`. Falls back to copy + remove when a
/// plain rename is refused (e.g. across filesystems).
pub fn move_file(from: &Path, to: &Path) -> Result<(), MoveError> {
    let io_error = |source: io::Error| MoveError::Io {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    match fs::symlink_metadata(from) {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(MoveError::MissingSource(from.to_path_buf()))
        }
        Err(err) => return Err(io_error(err)),
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound && !from.exists() => {
            Err(MoveError::MissingSource(from.to_path_buf()))
        }
        Err(err) => {
            debug!("Rename {} failed ({}), copying instead", from.display(), err);
            copy_then_replace(from, to, |path| fs::remove_file(path)).map_err(io_error)
        }
    }
}

/// Copy into a staging file beside `to`, drop the source, then rename the
/// staging file over `to`. `to` is untouched unless the source is gone.
fn copy_then_replace<R>(from: &Path, to: &Path, remove_source: R) -> io::Result<()>
where
    R: FnOnce(&Path) -> io::Result<()>,
{
    let staging = staging_path(to);

    if let Err(err) = fs::copy(from, &staging) {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }
    if let Err(err) = remove_source(from) {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }
    if let Err(err) = fs::rename(&staging, to) {
        // Source is already gone; the staged copy is the only one left.
        error!(
            "Source removed but {} could not replace {}; contents kept at {}",
            staging.display(),
            to.display(),
            staging.display()
        );
        return Err(err);
    }
    Ok(())
}

fn staging_path(to: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(to.file_name().unwrap_or_default());
    name.push(".grouper-partial");
    to.with_file_name(name)
}
