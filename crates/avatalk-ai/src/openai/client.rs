//! OpenAI client struct, request plumbing, and response parsing.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::{AiError, RunStatus, ThreadMessage};

use super::config::OpenAiConfig;

pub(crate) const ASSISTANTS_BETA: &str = "assistants=v2";

/// OpenAI Assistants API client.
pub struct OpenAiAssistants {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiAssistants {
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    /// Build auth and beta headers.
    pub(crate) fn headers(&self) -> Result<HeaderMap, AiError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key))
            .map_err(|_| AiError::ApiError("API key contains invalid header characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("openai-beta", HeaderValue::from_static(ASSISTANTS_BETA));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Send a prepared request and decode the JSON body.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<serde_json::Value, AiError> {
        let response = request
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        let json = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;
        debug!("OpenAI response decoded");
        Ok(json)
    }
}

/// Extract the `id` field of a created object.
pub(crate) fn parse_id(json: &serde_json::Value, what: &str) -> Result<String, AiError> {
    json["id"]
        .as_str()
        .filter(|id| !id.is_empty())
        .map(String::from)
        .ok_or_else(|| AiError::ParseError(format!("no 'id' in {what} response")))
}

pub(crate) fn parse_run_status(json: &serde_json::Value) -> Result<RunStatus, AiError> {
    let status = json
        .get("status")
        .ok_or_else(|| AiError::ParseError("no 'status' in run response".into()))?;
    serde_json::from_value(status.clone()).map_err(|e| AiError::ParseError(e.to_string()))
}

pub(crate) fn parse_messages(json: serde_json::Value) -> Result<Vec<ThreadMessage>, AiError> {
    let data = json
        .get("data")
        .cloned()
        .ok_or_else(|| AiError::ParseError("no 'data' in message list".into()))?;
    serde_json::from_value(data).map_err(|e| AiError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_id_requires_non_empty_id() {
        assert_eq!(parse_id(&json!({ "id": "asst_1" }), "assistant").unwrap(), "asst_1");
        assert!(matches!(
            parse_id(&json!({ "id": "" }), "thread"),
            Err(AiError::ParseError(_))
        ));
        assert!(parse_id(&json!({}), "run").is_err());
    }

    #[test]
    fn parse_run_status_reads_status_field() {
        let status = parse_run_status(&json!({ "id": "run_1", "status": "completed" })).unwrap();
        assert_eq!(status, RunStatus::Completed);
        assert!(parse_run_status(&json!({ "id": "run_1" })).is_err());
    }

    #[test]
    fn parse_messages_reads_data_newest_first() {
        let messages = parse_messages(json!({
            "object": "list",
            "data": [
                { "id": "m2", "role": "assistant",
                  "content": [{ "type": "text", "text": { "value": "Hi there", "annotations": [] } }] },
                { "id": "m1", "role": "user",
                  "content": [{ "type": "text", "text": { "value": "Hello", "annotations": [] } }] }
            ]
        }))
        .unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].first_text(), Some("Hi there"));
    }

    #[test]
    fn headers_carry_bearer_and_beta() {
        let client = OpenAiAssistants::new(OpenAiConfig::new("sk-test")).unwrap();
        let headers = client.headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer sk-test");
        assert_eq!(headers["openai-beta"], ASSISTANTS_BETA);
    }

    #[test]
    fn url_joins_paths() {
        let client = OpenAiAssistants::new(OpenAiConfig::new("k")).unwrap();
        assert_eq!(client.url("/threads"), "https://api.openai.com/v1/threads");
        assert_eq!(client.url("assistants"), "https://api.openai.com/v1/assistants");
    }
}
