use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use brand_audit_core::fallback::{DEMO_VERDICT, FAILURE_VERDICT, TIMEOUT_VERDICT};
use brand_audit_core::{
    AuditConfig, AuditInvoker, AuditOutcome, AuditRequest, FailureKind, ModelClient, ModelError,
};
use tokio::time::Instant;

#[derive(Clone)]
enum Behavior {
    Text(&'static str),
    Empty,
    Fail,
    Sleep(Duration, Box<Behavior>),
    Hang,
}

/// Fake model service scripted per model identifier.
#[derive(Default)]
struct ScriptedClient {
    script: HashMap<String, Behavior>,
    calls: Arc<Mutex<Vec<String>>>,
    dropped: Arc<AtomicBool>,
}

impl ScriptedClient {
    fn with(mut self, model: &str, behavior: Behavior) -> Self {
        self.script.insert(model.to_string(), behavior);
        self
    }

    fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn generate(&self, model: &str, _prompt: &str) -> Result<String, ModelError> {
        self.calls.lock().unwrap().push(model.to_string());
        let mut behavior = self.script.get(model).cloned().unwrap_or(Behavior::Fail);
        loop {
            match behavior {
                Behavior::Text(t) => return Ok(t.to_string()),
                Behavior::Empty => return Ok("  ".to_string()),
                Behavior::Fail => {
                    return Err(ModelError::Status {
                        status: 503,
                        body: "overloaded".to_string(),
                    })
                }
                Behavior::Sleep(d, next) => {
                    tokio::time::sleep(d).await;
                    behavior = *next;
                }
                Behavior::Hang => {
                    let _guard = SetOnDrop(Arc::clone(&self.dropped));
                    return std::future::pending().await;
                }
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

const GOOD: &str = r#"{
    "totalScore": 10,
    "verdict": "Distinctive, under-explained.",
    "pillars": [
        {"code": "CLR", "name": "Clarity", "score": 4, "critique": "Vague hero copy."},
        {"code": "ORG", "name": "Origin", "score": 8, "critique": "Real founder story."},
        {"code": "VOX", "name": "One Voice", "score": 7, "critique": "Consistent."},
        {"code": "LNG", "name": "Longevity", "score": 6, "critique": "Holds up."},
        {"code": "OUT", "name": "Outcome", "score": 5, "critique": "Benefit implied, not stated."}
    ],
    "hardQuestions": ["Who is this not for?", "What do you refuse to do?"]
}"#;

fn configured(models: &[&str]) -> AuditConfig {
    AuditConfig::default()
        .with_api_key("test-key")
        .with_models(models.iter().copied())
}

fn request() -> AuditRequest {
    AuditRequest::new("https://example.com").unwrap()
}

fn assert_invariants(outcome: &AuditOutcome) {
    let result = outcome.result();
    assert_eq!(result.pillars().len(), 5);
    assert!(result.hard_questions().len() <= 3);
    assert!((0.0..=10.0).contains(&result.total_score()));
}

#[tokio::test]
async fn first_model_with_text_wins() {
    let client = ScriptedClient::default()
        .with("m1", Behavior::Text(GOOD))
        .with("m2", Behavior::Fail);
    let calls = client.calls();
    let invoker = AuditInvoker::new(configured(&["m1", "m2"]), client);

    let outcome = invoker.invoke(&request()).await;

    assert_eq!(*calls.lock().unwrap(), vec!["m1"]);
    let AuditOutcome::Scored(result) = &outcome else {
        panic!("expected scored outcome, got {outcome:?}");
    };
    // (4 + 8 + 7 + 6 + 5) / 5, upstream 10 ignored
    assert_eq!(result.total_score(), 6.0);
    assert_eq!(result.verdict(), "Distinctive, under-explained.");
    assert_eq!(result.hard_questions().len(), 2);
}

#[tokio::test]
async fn failures_and_empty_text_fall_through_in_order() {
    let client = ScriptedClient::default()
        .with("m1", Behavior::Fail)
        .with("m2", Behavior::Empty)
        .with("m3", Behavior::Text(GOOD));
    let calls = client.calls();
    let invoker = AuditInvoker::new(configured(&["m1", "m2", "m3"]), client);

    let outcome = invoker.invoke(&request()).await;

    assert_eq!(*calls.lock().unwrap(), vec!["m1", "m2", "m3"]);
    assert_eq!(outcome.kind(), "scored");
    assert_invariants(&outcome);
}

#[tokio::test]
async fn exhausted_models_yield_failure_result() {
    let client = ScriptedClient::default();
    let calls = client.calls();
    let invoker = AuditInvoker::new(configured(&["m1", "m2"]), client);

    let outcome = invoker.invoke(&request()).await;

    assert_eq!(calls.lock().unwrap().len(), 2);
    match &outcome {
        AuditOutcome::Failed(f) => assert_eq!(f.kind, FailureKind::Exhausted),
        other => panic!("expected failure, got {other:?}"),
    }
    let result = outcome.result();
    assert_eq!(result.verdict(), FAILURE_VERDICT);
    assert_eq!(result.total_score(), 0.0);
    assert_invariants(&outcome);
}

#[tokio::test]
async fn fenced_model_output_is_accepted() {
    let fenced: &'static str = "```json\n{\"verdict\":\"fenced\",\"pillars\":[{\"score\":9}]}\n```";
    let client = ScriptedClient::default().with("m1", Behavior::Text(fenced));
    let invoker = AuditInvoker::new(configured(&["m1"]), client);

    let result = invoker.invoke(&request()).await.into_result();

    assert_eq!(result.verdict(), "fenced");
    assert_eq!(result.total_score(), 9.0);
    assert_eq!(result.pillars()[1].score, 0);
}

#[tokio::test(start_paused = true)]
async fn hung_model_hits_deadline_and_is_abandoned() {
    let client = ScriptedClient::default()
        .with("m1", Behavior::Hang)
        .with("m2", Behavior::Text(GOOD));
    let calls = client.calls();
    let dropped = Arc::clone(&client.dropped);
    let invoker = AuditInvoker::new(configured(&["m1", "m2"]), client);

    let started = Instant::now();
    let outcome = invoker.invoke(&request()).await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(45), "returned early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(46), "returned late: {elapsed:?}");
    match &outcome {
        AuditOutcome::Failed(f) => assert_eq!(f.kind, FailureKind::Timeout),
        other => panic!("expected timeout, got {other:?}"),
    }
    let result = outcome.result();
    assert_eq!(result.verdict(), TIMEOUT_VERDICT);
    assert_eq!(result.total_score(), 0.0);
    assert_eq!(*calls.lock().unwrap(), vec!["m1"]);

    for _ in 0..10 {
        if dropped.load(Ordering::SeqCst) {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(dropped.load(Ordering::SeqCst), "in-flight call was not abandoned");
}

#[tokio::test(start_paused = true)]
async fn deadline_covers_all_models_not_each() {
    let slow_fail = Behavior::Sleep(Duration::from_secs(30), Box::new(Behavior::Fail));
    let slow_ok = Behavior::Sleep(Duration::from_secs(30), Box::new(Behavior::Text(GOOD)));
    let client = ScriptedClient::default()
        .with("m1", slow_fail)
        .with("m2", slow_ok);
    let invoker = AuditInvoker::new(configured(&["m1", "m2"]), client);

    let started = Instant::now();
    let outcome = invoker.invoke(&request()).await;

    assert!(started.elapsed() < Duration::from_secs(46));
    match outcome {
        AuditOutcome::Failed(f) => assert_eq!(f.kind, FailureKind::Timeout),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn custom_deadline_is_honored() {
    let client = ScriptedClient::default().with("m1", Behavior::Hang);
    let config = configured(&["m1"]).with_deadline(Duration::from_secs(5));
    let invoker = AuditInvoker::new(config, client);

    let started = Instant::now();
    let outcome = invoker.invoke(&request()).await;

    assert!(started.elapsed() < Duration::from_secs(6));
    assert!(outcome.is_failure());
}

#[tokio::test(start_paused = true)]
async fn no_credential_serves_demo_without_calling_service() {
    let client = ScriptedClient::default().with("m1", Behavior::Text(GOOD));
    let calls = client.calls();
    let invoker = AuditInvoker::new(AuditConfig::default().with_models(["m1"]), client);

    let started = Instant::now();
    let outcome = invoker.invoke(&request()).await;

    assert!(started.elapsed() >= Duration::from_secs(2));
    assert!(calls.lock().unwrap().is_empty());
    let AuditOutcome::Demo(result) = &outcome else {
        panic!("expected demo outcome, got {outcome:?}");
    };
    assert_eq!(result.total_score(), 4.2);
    assert_eq!(result.verdict(), DEMO_VERDICT);
}

#[tokio::test]
async fn garbage_outputs_always_render_valid_results() {
    let samples: [&'static str; 8] = [
        "",
        "null",
        "[]",
        "\"just a string\"",
        "{\"pillars\": 12}",
        "{\"pillars\": [1, 2, 3], \"hardQuestions\": [\"a\",\"b\",\"c\",\"d\",\"e\"]}",
        "```\nnot json\n```",
        "{\"verdict\": \"\", \"pillars\": [{\"score\": 1e9}, {\"score\": -1}]}",
    ];
    for sample in samples {
        let client = ScriptedClient::default().with("m1", Behavior::Text(sample));
        let invoker = AuditInvoker::new(configured(&["m1"]), client);
        let outcome = invoker.invoke(&request()).await;
        assert_invariants(&outcome);
    }
}
