//! AssistantApi trait implementation for OpenAiAssistants.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::{
    AiError, AssistantApi, AssistantId, AssistantSpec, MessageRole, RunId, RunStatus, ThreadId,
    ThreadMessage,
};

use super::client::{parse_id, parse_messages, parse_run_status, OpenAiAssistants};

#[async_trait]
impl AssistantApi for OpenAiAssistants {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<AssistantId, AiError> {
        debug!(model = %spec.model, name = %spec.name, "creating assistant");
        let body = json!({
            "name": spec.name,
            "instructions": spec.instructions,
            "model": spec.model,
        });
        let json = self.send(self.http.post(self.url("assistants")).json(&body)).await?;
        parse_id(&json, "assistant").map(AssistantId)
    }

    async fn create_thread(&self) -> Result<ThreadId, AiError> {
        debug!("creating thread");
        let json = self.send(self.http.post(self.url("threads")).json(&json!({}))).await?;
        parse_id(&json, "thread").map(ThreadId)
    }

    async fn create_message(
        &self,
        thread: &ThreadId,
        role: MessageRole,
        content: &str,
    ) -> Result<(), AiError> {
        debug!(thread = %thread, chars = content.chars().count(), "posting message");
        let body = json!({ "role": role, "content": content });
        let path = format!("threads/{thread}/messages");
        self.send(self.http.post(self.url(&path)).json(&body)).await?;
        Ok(())
    }

    async fn create_run(&self, thread: &ThreadId, assistant: &AssistantId) -> Result<RunId, AiError> {
        debug!(thread = %thread, assistant = %assistant, "creating run");
        let body = json!({ "assistant_id": assistant });
        let path = format!("threads/{thread}/runs");
        let json = self.send(self.http.post(self.url(&path)).json(&body)).await?;
        parse_id(&json, "run").map(RunId)
    }

    async fn retrieve_run(&self, thread: &ThreadId, run: &RunId) -> Result<RunStatus, AiError> {
        let path = format!("threads/{thread}/runs/{run}");
        let json = self.send(self.http.get(self.url(&path))).await?;
        parse_run_status(&json)
    }

    async fn list_messages(&self, thread: &ThreadId) -> Result<Vec<ThreadMessage>, AiError> {
        let path = format!("threads/{thread}/messages");
        let request = self
            .http
            .get(self.url(&path))
            .query(&[("order", "desc"), ("limit", "1")]);
        let json = self.send(request).await?;
        parse_messages(json)
    }
}
