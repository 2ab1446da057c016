use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::classify::ClassificationClient;
use crate::error::Error;
use crate::progress::{ProgressReporter, SilentReporter};
use crate::relocate::{RecoveryPrompt, RelocationReport, Relocator, SkipMissing};
use crate::scanner;

/// Operator-supplied parameters for one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    source_root: PathBuf,
    target_root: PathBuf,
    criteria: String,
}

impl RunContext {
    pub fn new(source_root: &str, target_root: &str, criteria: &str) -> Result<Self, Error> {
        let mut missing = Vec::new();
        if source_root.trim().is_empty() {
            missing.push("source directory");
        }
        if target_root.trim().is_empty() {
            missing.push("target directory");
        }
        if criteria.trim().is_empty() {
            missing.push("criteria");
        }
        if !missing.is_empty() {
            return Err(Error::Precondition(missing.join(", ")));
        }

        Ok(Self {
            source_root: PathBuf::from(source_root.trim()),
            target_root: PathBuf::from(target_root.trim()),
            criteria: criteria.to_string(),
        })
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    pub fn criteria(&self) -> &str {
        &self.criteria
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub files_scanned: usize,
    pub groups: usize,
    pub relocation: RelocationReport,
    pub duration: Duration,
}

/// Drives scan → classify → relocate. One run at a time per engine.
pub struct OrganizeEngine {
    classifier: Arc<ClassificationClient>,
    prompt: Arc<dyn RecoveryPrompt>,
    reporter: Arc<dyn ProgressReporter>,
    strict_names: bool,
    running: Arc<AtomicBool>,
}

/// Clears the engine's running flag when the run ends, panics included.
struct RunGuard(Arc<AtomicBool>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Handle to a run launched with [`OrganizeEngine::start_run`].
pub struct RunHandle {
    join: JoinHandle<Result<RunReport, Error>>,
}

impl RunHandle {
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Block until the run ends and return its outcome.
    pub fn wait(self) -> Result<RunReport, Error> {
        self.join
            .join()
            .map_err(|_| Error::RunAborted("run thread panicked".to_string()))?
    }
}

impl OrganizeEngine {
    pub fn new(classifier: ClassificationClient) -> Self {
        Self {
            classifier: Arc::new(classifier),
            prompt: Arc::new(SkipMissing),
            reporter: Arc::new(SilentReporter),
            strict_names: true,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_prompt(mut self, prompt: Arc<dyn RecoveryPrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_strict_names(mut self, strict: bool) -> Self {
        self.strict_names = strict;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run the pipeline on the calling thread.
    pub fn run(&self, ctx: &RunContext) -> Result<RunReport, Error> {
        let _guard = self.acquire()?;
        let pipeline = self.pipeline();
        pipeline.execute(ctx)
    }

    /// Launch the pipeline on a background thread and return immediately.
    /// Completion is observed through the handle or the reporter's
    /// `on_run_complete`.
    pub fn start_run(&self, ctx: RunContext) -> Result<RunHandle, Error> {
        let guard = self.acquire()?;
        let pipeline = self.pipeline();

        let join = thread::Builder::new()
            .name("organize-run".to_string())
            .spawn(move || {
                let _guard = guard;
                pipeline.execute(&ctx)
            })?;

        Ok(RunHandle { join })
    }

    fn acquire(&self) -> Result<RunGuard, Error> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| Error::RunInProgress)?;
        Ok(RunGuard(self.running.clone()))
    }

    fn pipeline(&self) -> Pipeline {
        Pipeline {
            classifier: self.classifier.clone(),
            prompt: self.prompt.clone(),
            reporter: self.reporter.clone(),
            strict_names: self.strict_names,
        }
    }
}

struct Pipeline {
    classifier: Arc<ClassificationClient>,
    prompt: Arc<dyn RecoveryPrompt>,
    reporter: Arc<dyn ProgressReporter>,
    strict_names: bool,
}

impl Pipeline {
    fn execute(&self, ctx: &RunContext) -> Result<RunReport, Error> {
        let result = self.execute_phases(ctx);
        match &result {
            Ok(report) => info!(
                "Organize run finished in {:.2}s: {} moved, {} skipped, {} failed",
                report.duration.as_secs_f64(),
                report.relocation.moved,
                report.relocation.skipped,
                report.relocation.failed,
            ),
            Err(err) => error!("Organize run failed: {}", err),
        }
        self.reporter.on_run_complete(result.is_ok());
        result
    }

    fn execute_phases(&self, ctx: &RunContext) -> Result<RunReport, Error> {
        let start = Instant::now();
        info!(
            "Starting file organization from {} to {}",
            ctx.source_root().display(),
            ctx.target_root().display()
        );

        // Phase 1: Scan
        self.reporter.on_scan_start(ctx.source_root());
        let scan_start = Instant::now();
        let inventory = scanner::scan_inventory(ctx.source_root())?;
        let scan_secs = scan_start.elapsed().as_secs_f64();
        debug!("Scan completed in {:.2}s: {} files", scan_secs, inventory.len());
        self.reporter.on_scan_complete(inventory.len(), scan_secs);

        // Phase 2: Classify
        let grouping =
            self.classifier
                .classify(&inventory.names, ctx.criteria(), self.reporter.as_ref())?;
        info!("Classification produced {} groups", grouping.len());

        // Phase 3: Relocate
        let relocation = Relocator::new(self.prompt.as_ref())
            .with_reporter(self.reporter.as_ref())
            .with_strict_names(self.strict_names)
            .relocate(&grouping, &inventory.paths, ctx.target_root());

        Ok(RunReport {
            files_scanned: inventory.len(),
            groups: grouping.len(),
            relocation,
            duration: start.elapsed(),
        })
    }
}
