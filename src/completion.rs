use crate::models::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Marker the provider puts in its error message when it sheds load.
pub const OVERLOAD_MARKER: &str = "currently overloaded with other requests.";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion service is overloaded: {0}")]
    Overloaded(String),
    #[error("malformed completion response: {0}")]
    Malformed(String),
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion service returned {0}: {1}")]
    Status(u16, String),
    #[error("completion request timed out after {0:?}")]
    TimedOut(Duration),
}

#[async_trait]
pub trait CompletionDriver: Send + Sync {
    /// Sends a prompt and returns the raw response body.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl CompletionDriver for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let res = self
            .client
            .post(format!("{}/completions", self.endpoint))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() && !is_overload(&body) {
            return Err(CompletionError::Status(status.as_u16(), body));
        }
        Ok(body)
    }
}

fn is_overload(body: &str) -> bool {
    matches!(parse_reply(body), Err(CompletionError::Overloaded(_)))
}

/// Pulls the reply text out of a completion response body.
pub fn parse_reply(body: &str) -> Result<String, CompletionError> {
    let response: CompletionResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Malformed(e.to_string()))?;

    let error_message = response
        .message
        .as_deref()
        .or_else(|| response.error.as_ref().and_then(|e| e.message.as_deref()));
    if let Some(message) = error_message {
        if message.contains(OVERLOAD_MARKER) {
            return Err(CompletionError::Overloaded(message.to_string()));
        }
    }

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.text)
        .ok_or_else(|| CompletionError::Malformed("response has no choices[0].text".to_string()))
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Plays back canned results in order and remembers every request it saw.
    pub struct ScriptedDriver {
        responses: Mutex<VecDeque<Result<String, CompletionError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
        delay: Option<Duration>,
    }

    impl ScriptedDriver {
        pub fn new(responses: Vec<Result<String, CompletionError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        pub fn replying(body: &str) -> Self {
            Self::new(vec![Ok(body.to_string())])
        }

        pub fn text(text: &str) -> Self {
            Self::replying(&serde_json::json!({"choices": [{"text": text}]}).to_string())
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionDriver for ScriptedDriver {
        async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
            self.requests.lock().unwrap().push(request);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(CompletionError::Malformed(
                        "no scripted response".to_string(),
                    ))
                })
        }
    }
}
