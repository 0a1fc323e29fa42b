//! Tests for ConversationClient against a scripted provider.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::*;
use crate::poll::PollPolicy;
use crate::{
    AiError, AssistantApi, AssistantId, AssistantSpec, MessageContent, MessageRole, RunId,
    RunStatus, TextContent, ThreadId, ThreadMessage,
};

#[derive(Default)]
struct Script {
    calls: Vec<String>,
    statuses: VecDeque<RunStatus>,
    reply: Option<ThreadMessage>,
    fail_create_assistant: bool,
}

#[derive(Default, Clone)]
struct ScriptedApi {
    script: Arc<Mutex<Script>>,
}

impl ScriptedApi {
    fn with_statuses(statuses: &[RunStatus]) -> Self {
        let api = Self::default();
        api.script.lock().unwrap().statuses = statuses.iter().copied().collect();
        api
    }

    fn reply_with(self, text: &str) -> Self {
        self.script.lock().unwrap().reply = Some(ThreadMessage {
            id: "msg_reply".into(),
            role: MessageRole::Assistant,
            content: vec![MessageContent::Text {
                text: TextContent { value: text.into() },
            }],
        });
        self
    }

    fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }

    fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    fn record(&self, call: &str) {
        self.script.lock().unwrap().calls.push(call.to_string());
    }
}

#[async_trait]
impl AssistantApi for ScriptedApi {
    async fn create_assistant(&self, _spec: &AssistantSpec) -> Result<AssistantId, AiError> {
        self.record("create_assistant");
        if self.script.lock().unwrap().fail_create_assistant {
            return Err(AiError::NetworkError("connection refused".into()));
        }
        Ok(AssistantId("asst_1".into()))
    }

    async fn create_thread(&self) -> Result<ThreadId, AiError> {
        self.record("create_thread");
        Ok(ThreadId("thread_1".into()))
    }

    async fn create_message(
        &self,
        _thread: &ThreadId,
        role: MessageRole,
        _content: &str,
    ) -> Result<(), AiError> {
        assert_eq!(role, MessageRole::User);
        self.record("create_message");
        Ok(())
    }

    async fn create_run(&self, _thread: &ThreadId, assistant: &AssistantId) -> Result<RunId, AiError> {
        assert_eq!(assistant.as_str(), "asst_1");
        self.record("create_run");
        Ok(RunId("run_1".into()))
    }

    async fn retrieve_run(&self, _thread: &ThreadId, _run: &RunId) -> Result<RunStatus, AiError> {
        self.record("retrieve_run");
        let next = self.script.lock().unwrap().statuses.pop_front();
        Ok(next.unwrap_or(RunStatus::InProgress))
    }

    async fn list_messages(&self, _thread: &ThreadId) -> Result<Vec<ThreadMessage>, AiError> {
        self.record("list_messages");
        Ok(self.script.lock().unwrap().reply.clone().into_iter().collect())
    }
}

fn spec() -> AssistantSpec {
    AssistantSpec {
        name: "HeyGen Assistant".into(),
        instructions: "Be brief.".into(),
        model: "gpt-4.1".into(),
    }
}

fn fast_policy() -> PollPolicy {
    PollPolicy::fixed(Duration::from_millis(1), 20)
}

fn client(api: &ScriptedApi) -> ConversationClient {
    ConversationClient::new(Arc::new(api.clone()), spec()).with_poll_policy(fast_policy())
}

#[tokio::test]
async fn send_before_initialize_is_rejected() {
    let api = ScriptedApi::default();
    let client = client(&api);

    let err = client.send_message("hello").await.unwrap_err();
    assert!(matches!(err, AiError::NotInitialized));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn initialize_creates_assistant_then_thread() {
    let api = ScriptedApi::default();
    let mut client = client(&api);

    client.initialize().await.unwrap();

    assert!(client.is_initialized());
    assert_eq!(client.assistant_id().unwrap().as_str(), "asst_1");
    assert_eq!(client.thread_id().unwrap().as_str(), "thread_1");
    assert_eq!(api.calls(), vec!["create_assistant", "create_thread"]);
}

#[tokio::test]
async fn second_initialize_makes_no_remote_calls() {
    let api = ScriptedApi::default();
    let mut client = client(&api);

    client.initialize().await.unwrap();
    client.initialize().await.unwrap();

    assert_eq!(api.count("create_assistant"), 1);
    assert_eq!(api.count("create_thread"), 1);
}

#[tokio::test]
async fn failed_initialize_leaves_client_unusable() {
    let api = ScriptedApi::default();
    api.script.lock().unwrap().fail_create_assistant = true;
    let mut client = client(&api);

    assert!(client.initialize().await.is_err());
    assert!(!client.is_initialized());
    assert!(matches!(
        client.send_message("hi").await,
        Err(AiError::NotInitialized)
    ));
}

#[tokio::test]
async fn polls_until_run_leaves_in_progress() {
    let api = ScriptedApi::with_statuses(&[
        RunStatus::InProgress,
        RunStatus::InProgress,
        RunStatus::Completed,
    ])
    .reply_with("Hello from the assistant");
    let mut client = client(&api);
    client.initialize().await.unwrap();

    let reply = client.send_message("hello").await.unwrap();

    assert_eq!(reply, "Hello from the assistant");
    assert_eq!(api.count("retrieve_run"), 3);
    assert_eq!(
        api.calls(),
        vec![
            "create_assistant",
            "create_thread",
            "create_message",
            "create_run",
            "retrieve_run",
            "retrieve_run",
            "retrieve_run",
            "list_messages",
        ]
    );
}

#[tokio::test]
async fn queued_runs_are_still_pending() {
    let api = ScriptedApi::with_statuses(&[RunStatus::Queued, RunStatus::Completed])
        .reply_with("ok");
    let mut client = client(&api);
    client.initialize().await.unwrap();

    assert_eq!(client.send_message("hi").await.unwrap(), "ok");
    assert_eq!(api.count("retrieve_run"), 2);
}

#[tokio::test]
async fn missing_text_falls_back_to_no_response() {
    let api = ScriptedApi::with_statuses(&[RunStatus::Completed]);
    let mut client = client(&api);
    client.initialize().await.unwrap();

    assert_eq!(client.send_message("hi").await.unwrap(), NO_RESPONSE);
}

#[tokio::test]
async fn failed_run_is_an_error() {
    let api = ScriptedApi::with_statuses(&[RunStatus::InProgress, RunStatus::Failed]);
    let mut client = client(&api);
    client.initialize().await.unwrap();

    let err = client.send_message("hi").await.unwrap_err();
    assert!(matches!(err, AiError::RunFailed(RunStatus::Failed)));
    assert_eq!(api.count("list_messages"), 0);
}

#[tokio::test]
async fn never_ending_run_times_out() {
    // Queue is empty, so every check reports in_progress.
    let api = ScriptedApi::default();
    let mut client = ConversationClient::new(Arc::new(api.clone()), spec())
        .with_poll_policy(PollPolicy::fixed(Duration::from_millis(1), 5).with_deadline(Duration::from_secs(60)));
    client.initialize().await.unwrap();

    let err = client.send_message("hi").await.unwrap_err();
    assert!(matches!(err, AiError::Timeout { attempts: 5, .. }));
    assert_eq!(api.count("retrieve_run"), 5);
}

#[tokio::test]
async fn concurrent_send_is_rejected_as_busy() {
    let api = ScriptedApi::with_statuses(&[
        RunStatus::InProgress,
        RunStatus::InProgress,
        RunStatus::Completed,
    ])
    .reply_with("first");
    let mut client = ConversationClient::new(Arc::new(api.clone()), spec())
        .with_poll_policy(PollPolicy::fixed(Duration::from_millis(20), 20));
    client.initialize().await.unwrap();

    let (first, second) = tokio::join!(client.send_message("one"), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        client.send_message("two").await
    });

    assert_eq!(first.unwrap(), "first");
    assert!(matches!(second, Err(AiError::Busy)));
    assert_eq!(api.count("create_message"), 1);
}
