//! OpenAI-compatible chat completions client.
//!
//! Works against any server exposing `/chat/completions` (OpenAI, local
//! gateways). The system prompt travels as a leading `system` message.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::config::LlmTimeouts;
use super::types::{ChatResponse, ContentBlock, LlmError, Message};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self { http, api_key, base_url })
    }

    /// # Errors
    ///
    /// Returns an error on transport failure, a non-200 status, or an
    /// unparseable body.
    pub async fn chat(
        &self,
        model: &str,
        max_tokens: u32,
        system: &str,
        messages: &[Message],
    ) -> Result<ChatResponse, LlmError> {
        let msgs = build_messages(system, messages);
        let body = CcRequest { model, max_tokens, messages: &msgs };
        let text = self.send_json("/chat/completions", &body).await?;
        parse_chat_completions_response(&text)
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [CcMessage<'a>],
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct CcMessage<'a> {
    role: &'a str,
    content: &'a str,
}

fn build_messages<'a>(system: &'a str, messages: &'a [Message]) -> Vec<CcMessage<'a>> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    if !system.trim().is_empty() {
        out.push(CcMessage { role: "system", content: system });
    }
    out.extend(
        messages
            .iter()
            .map(|m| CcMessage { role: &m.role, content: &m.content }),
    );
    out
}

// =============================================================================
// PARSING
// =============================================================================

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<ChatResponse, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;
    let model = root
        .get("model")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default();
    let usage = |key: &str| {
        root.get("usage")
            .and_then(|u| u.get(key))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    };

    let Some(choice) = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        return Err(LlmError::ApiParse("chat_completions: missing choices[0]".to_string()));
    };
    let finish_reason = choice
        .get("finish_reason")
        .and_then(Value::as_str)
        .unwrap_or("stop");

    let mut content = Vec::new();
    if let Some(text) = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
    {
        content.push(ContentBlock::Text { text: text.to_string() });
    }

    Ok(ChatResponse {
        content,
        model,
        stop_reason: finish_reason.to_string(),
        input_tokens: usage("prompt_tokens"),
        output_tokens: usage("completion_tokens"),
    })
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
