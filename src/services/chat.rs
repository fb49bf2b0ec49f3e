use crate::services::ServiceError;
use reqwest::StatusCode;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Client for the assistant's chat endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    url: String,
}

impl ChatClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Sends one message and returns the assistant's reply.
    pub async fn send(&self, message: &str) -> Result<String, ServiceError> {
        let response = self
            .http
            .post(&self.url)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(ServiceError::Transport)?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.map_err(|e| {
            ServiceError::server(Some(status), format!("invalid response body: {e}"))
        })?;
        decode_reply(status, &body)
    }
}

fn decode_reply(status: StatusCode, body: &serde_json::Value) -> Result<String, ServiceError> {
    if let Some(error) = body.get("error").and_then(|v| v.as_str()) {
        return Err(ServiceError::server(Some(status), error));
    }
    if !status.is_success() {
        return Err(ServiceError::server(
            Some(status),
            format!("chat request failed with status {status}"),
        ));
    }
    body.get("reply")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| ServiceError::server(Some(status), "no reply in response"))
}
