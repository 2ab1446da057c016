use grouper_core::{RecoveryChoice, RecoveryPrompt};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Asks on the terminal for a replacement path when a source file is gone.
pub struct StdinPrompt {
    // Serializes prompts so two questions never interleave on the terminal.
    lock: Mutex<()>,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
        }
    }

    fn ask(&self, missing: &Path) -> io::Result<Option<RecoveryChoice>> {
        let mut input = String::new();

        loop {
            input.clear();

            print!(
                "File '{}' not found. Provide the correct path or type 'skip': ",
                missing.display()
            );
            io::stdout().flush()?;

            if io::stdin().read_line(&mut input)? == 0 {
                return Ok(None);
            }

            match input.trim() {
                "" => continue,
                answer if answer.eq_ignore_ascii_case("skip") => {
                    return Ok(Some(RecoveryChoice::Skip))
                }
                answer => return Ok(Some(RecoveryChoice::Retry(PathBuf::from(answer)))),
            }
        }
    }
}

impl RecoveryPrompt for StdinPrompt {
    fn replacement_path(&self, missing: &Path) -> RecoveryChoice {
        let _lock = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match self.ask(missing) {
            Ok(Some(choice)) => choice,
            Ok(None) => {
                warn!("Input closed, skipping {}", missing.display());
                RecoveryChoice::Skip
            }
            Err(err) => {
                warn!("Cannot read answer ({}), skipping {}", err, missing.display());
                RecoveryChoice::Skip
            }
        }
    }
}
