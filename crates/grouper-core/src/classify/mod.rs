mod gemini;
mod ollama;
pub mod prompt;
mod service;

pub use gemini::GeminiService;
pub use ollama::OllamaService;
pub use service::{service_from_config, TextService};

use serde::Deserialize;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::error::{AttemptError, Error};
use crate::progress::ProgressReporter;

/// Group name → ordered file names, in the order the service listed the
/// groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingResult {
    groups: Vec<(String, Vec<String>)>,
}

impl GroupingResult {
    /// Add a group. A repeated name replaces the earlier file list but keeps
    /// its position.
    pub fn push(&mut self, name: impl Into<String>, files: Vec<String>) {
        let name = name.into();
        match self.groups.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing_files)) => *existing_files = files,
            None => self.groups.push((name, files)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(group, _)| group == name)
            .map(|(_, files)| files.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(name, files)| (name.as_str(), files.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<String>)> for GroupingResult {
    fn from_iter<I: IntoIterator<Item = (N, Vec<String>)>>(iter: I) -> Self {
        let mut result = GroupingResult::default();
        for (name, files) in iter {
            result.push(name, files);
        }
        result
    }
}

/// What `classify` does once every attempt has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ExhaustedPolicy {
    /// Return an empty grouping; the run becomes a no-op success.
    #[serde(rename = "empty")]
    EmptyResult,
    /// Fail the run with `Error::ClassificationUnavailable`.
    #[serde(rename = "fail")]
    Fail,
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub on_exhausted: ExhaustedPolicy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::ZERO,
            on_exhausted: ExhaustedPolicy::EmptyResult,
        }
    }
}

/// Builds the grouping request, calls the service and parses the answer,
/// retrying failed attempts up to the policy bound.
pub struct ClassificationClient {
    service: Box<dyn TextService>,
    policy: RetryPolicy,
}

impl ClassificationClient {
    pub fn new(service: Box<dyn TextService>) -> Self {
        Self {
            service,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn classify(
        &self,
        file_names: &[String],
        criteria: &str,
        reporter: &dyn ProgressReporter,
    ) -> Result<GroupingResult, Error> {
        let prompt = prompt::build_prompt(file_names, criteria);
        debug!("Sending prompt to classification service: {}", prompt);

        reporter.on_classify_start(file_names.len());
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.attempt(&prompt) {
                Ok(result) => {
                    debug!("Parsed response: {:?}", result);
                    reporter.on_classify_complete(result.len(), start.elapsed().as_secs_f64());
                    return Ok(result);
                }
                Err(err) => {
                    error!(attempt, max_attempts, "Classification attempt failed: {}", err);
                    reporter.on_classify_attempt_failed(attempt, max_attempts, &err.to_string());
                }
            }

            if attempt < max_attempts {
                info!("Retrying classification ({}/{})...", attempt + 1, max_attempts);
                if !self.policy.delay.is_zero() {
                    thread::sleep(self.policy.delay);
                }
            }
        }

        error!(
            "No valid classification response after {} attempts",
            max_attempts
        );
        match self.policy.on_exhausted {
            ExhaustedPolicy::EmptyResult => {
                reporter.on_classify_complete(0, start.elapsed().as_secs_f64());
                Ok(GroupingResult::default())
            }
            ExhaustedPolicy::Fail => Err(Error::ClassificationUnavailable {
                attempts: max_attempts,
            }),
        }
    }

    fn attempt(&self, prompt: &str) -> Result<GroupingResult, AttemptError> {
        let raw = self.service.complete(prompt)?;
        debug!("Classification raw response: {}", raw);
        prompt::parse_grouping(&raw)
    }
}
