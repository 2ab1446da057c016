use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use grouper_core::error::ServiceError;
use grouper_core::{
    ClassificationClient, Error, ExhaustedPolicy, GroupingResult, RetryPolicy, SilentReporter,
};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Counts events carrying an `attempt` field, i.e. failed classification
/// attempts.
struct AttemptFailureCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for AttemptFailureCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().fields().field("attempt").is_some() {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Service that replays canned answers in order and records each prompt.
struct Scripted {
    answers: Mutex<Vec<Result<String, ServiceError>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Scripted {
    fn new(answers: Vec<Result<&str, &str>>) -> (Self, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let mut answers: Vec<Result<String, ServiceError>> = answers
            .into_iter()
            .map(|a| {
                a.map(str::to_string)
                    .map_err(|e| ServiceError::Other(e.to_string()))
            })
            .collect();
        answers.reverse();
        (
            Self {
                answers: Mutex::new(answers),
                prompts: prompts.clone(),
            },
            prompts,
        )
    }
}

impl grouper_core::TextService for Scripted {
    fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(ServiceError::Other("script exhausted".to_string())))
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_first_attempt_success_makes_one_call() {
    let (service, prompts) = Scripted::new(vec![Ok(r#"{"Images": ["a.png"]}"#)]);
    let client = ClassificationClient::new(Box::new(service));

    let result = client
        .classify(&names(&["a.png"]), "by type", &SilentReporter)
        .unwrap();

    assert_eq!(result.get("Images").unwrap(), &["a.png".to_string()]);
    let prompts = prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Criteria: by type"));
    assert!(prompts[0].contains("Files: a.png"));
}

#[test]
fn test_success_on_third_attempt_with_fenced_json() {
    let (service, prompts) = Scripted::new(vec![
        Err("connection reset"),
        Ok("I think you should group them by year."),
        Ok("```json\n{\"Docs\": [\"r.docx\"], \"Pics\": [\"p.png\"]}\n```"),
        Ok(r#"{"Never": ["reached"]}"#),
    ]);
    let client = ClassificationClient::new(Box::new(service));

    let result = client
        .classify(&names(&["r.docx", "p.png"]), "docs vs pics", &SilentReporter)
        .unwrap();

    let expected: GroupingResult = vec![
        ("Docs", names(&["r.docx"])),
        ("Pics", names(&["p.png"])),
    ]
    .into_iter()
    .collect();
    assert_eq!(result, expected);
    assert_eq!(prompts.lock().unwrap().len(), 3);
}

#[test]
fn test_all_attempts_failing_returns_empty_and_logs_each() {
    let failures = Arc::new(AtomicUsize::new(0));
    let subscriber =
        tracing_subscriber::registry().with(AttemptFailureCounter(failures.clone()));

    let (service, prompts) = Scripted::new(vec![
        Err("timeout"),
        Ok("not json at all"),
        Ok("[\"wrong\", \"shape\"]"),
    ]);
    let client = ClassificationClient::new(Box::new(service));

    let result = tracing::subscriber::with_default(subscriber, || {
        client.classify(&names(&["x.txt"]), "anything", &SilentReporter)
    })
    .unwrap();

    assert!(result.is_empty());
    assert_eq!(prompts.lock().unwrap().len(), 3);
    assert_eq!(failures.load(Ordering::SeqCst), 3);
}

#[test]
fn test_fail_policy_surfaces_unavailable() {
    let (service, _) = Scripted::new(vec![Err("down"), Err("down"), Err("down")]);
    let client = ClassificationClient::new(Box::new(service)).with_policy(RetryPolicy {
        on_exhausted: ExhaustedPolicy::Fail,
        ..RetryPolicy::default()
    });

    match client.classify(&names(&["x.txt"]), "anything", &SilentReporter) {
        Err(Error::ClassificationUnavailable { attempts }) => assert_eq!(attempts, 3),
        other => panic!("expected unavailable, got {:?}", other),
    }
}

#[test]
fn test_attempt_bound_follows_policy() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let service = move |_: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
        Err::<String, _>(ServiceError::EmptyResponse)
    };
    let client = ClassificationClient::new(Box::new(service)).with_policy(RetryPolicy {
        max_attempts: 5,
        ..RetryPolicy::default()
    });

    let result = client
        .classify(&names(&["x.txt"]), "anything", &SilentReporter)
        .unwrap();

    assert!(result.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}
