use async_trait::async_trait;
use counsel_api::answer::{answer_stream, AnswerEvent, StreamedAnswer};
use counsel_api::config::Config;
use counsel_api::error::ApiError;
use counsel_api::secrets::SecretError;
use counsel_api::state::AppState;
use counsel_llm::{CompletionClient, CompletionEvent, CompletionRequest, CompletionStream};
use futures::StreamExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// Process environment is shared; tests that touch it take this lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Scripted completion client that records how often it was invoked.
enum Script {
    /// Yield these deltas, then a terminal chunk.
    Deltas(&'static [&'static str]),
    /// Yield these deltas, then fail mid-stream.
    FailAfter(&'static [&'static str]),
}

struct StubClient {
    script: Script,
    invocations: AtomicUsize,
}

impl StubClient {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            invocations: AtomicUsize::new(0),
        })
    }

    fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn stream_completion(
        &self,
        _request: CompletionRequest,
    ) -> anyhow::Result<CompletionStream> {
        self.invocations.fetch_add(1, Ordering::SeqCst);

        let mut items: Vec<anyhow::Result<CompletionEvent>> = Vec::new();
        match &self.script {
            Script::Deltas(deltas) => {
                for delta in *deltas {
                    items.push(Ok(CompletionEvent::Delta {
                        text: delta.to_string(),
                    }));
                }
                items.push(Ok(CompletionEvent::Done {
                    finish_reason: Some("stop".to_string()),
                }));
            }
            Script::FailAfter(deltas) => {
                for delta in *deltas {
                    items.push(Ok(CompletionEvent::Delta {
                        text: delta.to_string(),
                    }));
                }
                items.push(Err(anyhow::anyhow!("connection reset mid-stream")));
            }
        }

        Ok(Box::pin(futures::stream::iter(items)))
    }
}

fn test_state(client: Arc<StubClient>, store_path: &str) -> AppState {
    let toml = format!(
        r#"
        [server]
        host = "127.0.0.1"
        port = 0

        [cors]
        enabled = false
        origins = []

        [llm]
        model = "gpt-4o-mini"

        [secrets]
        store_path = "{}"

        [logging]
        level = "info"
        format = "pretty"
        "#,
        store_path
    );

    let config: Config = toml::from_str(&toml).unwrap();
    let llm: Arc<dyn CompletionClient> = client;
    AppState::new(config, llm)
}

fn local_env_with_key() -> std::sync::MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap();
    std::env::remove_var(counsel_api::secrets::DEPLOYMENT_ENV_VAR);
    std::env::set_var(counsel_api::secrets::API_KEY_VAR, "sk-test");
    guard
}

#[tokio::test]
async fn deltas_accumulate_in_arrival_order() {
    let _env = local_env_with_key();

    let client = StubClient::new(Script::Deltas(&["Hel", "lo"]));
    let state = test_state(client.clone(), "unused.toml");

    let events: Vec<AnswerEvent> = answer_stream(&state, "health", "What helps a cold?")
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], AnswerEvent::Delta { text } if text == "Hel"));
    assert!(matches!(&events[1], AnswerEvent::Delta { text } if text == "lo"));
    assert!(matches!(&events[2], AnswerEvent::Done));

    let mut answer = StreamedAnswer::new();
    for event in &events {
        if let AnswerEvent::Delta { text } = event {
            answer.push(text);
        }
    }
    assert_eq!(answer.text(), "Hello");

    assert_eq!(client.invocations(), 1);
}

#[tokio::test]
async fn mid_stream_failure_keeps_earlier_deltas() {
    let _env = local_env_with_key();

    let client = StubClient::new(Script::FailAfter(&["partial"]));
    let state = test_state(client.clone(), "unused.toml");

    let events: Vec<AnswerEvent> = answer_stream(&state, "legal", "Is this binding?")
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], AnswerEvent::Delta { text } if text == "partial"));
    assert!(matches!(&events[1], AnswerEvent::Failed { .. }));

    let mut answer = StreamedAnswer::new();
    if let AnswerEvent::Delta { text } = &events[0] {
        answer.push(text);
    }
    assert_eq!(answer.text(), "partial");
}

#[tokio::test]
async fn empty_question_never_reaches_the_client() {
    let client = StubClient::new(Script::Deltas(&["unused"]));
    let state = test_state(client.clone(), "unused.toml");

    let result = answer_stream(&state, "health", "").await;
    assert!(matches!(result, Err(ApiError::EmptyInput)));

    let result = answer_stream(&state, "health", "   \n ").await;
    assert!(matches!(result, Err(ApiError::EmptyInput)));

    assert_eq!(client.invocations(), 0);
}

#[tokio::test]
async fn unknown_persona_never_reaches_the_client() {
    let client = StubClient::new(Script::Deltas(&["unused"]));
    let state = test_state(client.clone(), "unused.toml");

    let result = answer_stream(&state, "finance", "Should I invest?").await;
    assert!(matches!(result, Err(ApiError::Persona(_))));

    assert_eq!(client.invocations(), 0);
}

#[tokio::test]
async fn hosted_mode_without_store_entry_aborts_before_the_client() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var(counsel_api::secrets::DEPLOYMENT_ENV_VAR, "hosted");
    // The env key being set must not matter in hosted mode
    std::env::set_var(counsel_api::secrets::API_KEY_VAR, "sk-test");

    let missing_store = tempfile::tempdir().unwrap();
    let store_path = missing_store
        .path()
        .join("secrets.toml")
        .display()
        .to_string();

    let client = StubClient::new(Script::Deltas(&["unused"]));
    let state = test_state(client.clone(), &store_path);

    let result = answer_stream(&state, "health", "What helps a cold?").await;
    assert!(matches!(
        result,
        Err(ApiError::Credential(SecretError::MissingCredential))
    ));
    assert_eq!(client.invocations(), 0);

    std::env::remove_var(counsel_api::secrets::DEPLOYMENT_ENV_VAR);
}

#[tokio::test]
async fn hosted_mode_reads_the_store() {
    let _guard = ENV_LOCK.lock().unwrap();
    std::env::set_var(counsel_api::secrets::DEPLOYMENT_ENV_VAR, "hosted");

    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("secrets.toml");
    std::fs::write(
        &store_path,
        format!("{} = \"sk-store\"\n", counsel_api::secrets::API_KEY_VAR),
    )
    .unwrap();

    let client = StubClient::new(Script::Deltas(&["ok"]));
    let state = test_state(client.clone(), &store_path.display().to_string());

    let events: Vec<AnswerEvent> = answer_stream(&state, "health", "What helps a cold?")
        .await
        .unwrap()
        .collect()
        .await;

    assert!(matches!(&events[0], AnswerEvent::Delta { text } if text == "ok"));
    assert_eq!(client.invocations(), 1);

    std::env::remove_var(counsel_api::secrets::DEPLOYMENT_ENV_VAR);
}
