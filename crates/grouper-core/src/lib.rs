pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod progress;
pub mod relocate;
pub mod scanner;

pub use classify::{ClassificationClient, ExhaustedPolicy, GroupingResult, RetryPolicy, TextService};
pub use config::AppConfig;
pub use engine::{OrganizeEngine, RunContext, RunHandle, RunReport};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
pub use relocate::{RecoveryChoice, RecoveryPrompt, RelocationReport, Relocator, SkipMissing};
pub use scanner::{FileRecord, Inventory};
