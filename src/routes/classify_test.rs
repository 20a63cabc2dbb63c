use super::*;
use std::sync::Arc;

use crate::llm::LlmChat;
use crate::llm::types::{ChatResponse, ContentBlock, LlmError, Message};
use crate::state::test_helpers::{test_app_state, test_app_state_with_llm};

struct FixedLlm {
    answer: String,
}

#[async_trait::async_trait]
impl LlmChat for FixedLlm {
    async fn chat(&self, _max_tokens: u32, _system: &str, _messages: &[Message]) -> Result<ChatResponse, LlmError> {
        Ok(ChatResponse {
            content: vec![ContentBlock::Text { text: self.answer.clone() }],
            model: "mock".into(),
            stop_reason: "end_turn".into(),
            input_tokens: 0,
            output_tokens: 0,
        })
    }

    fn model(&self) -> &str {
        "mock"
    }
}

fn state_answering(answer: &str) -> AppState {
    test_app_state_with_llm(Arc::new(FixedLlm { answer: answer.into() }))
}

fn body(request: &str) -> Json<ClassifyBody> {
    Json(ClassifyBody { request: request.into() })
}

#[test]
fn classify_error_to_status_mapping() {
    assert_eq!(classify_error_to_status(&ClassifyError::LlmNotConfigured), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(classify_error_to_status(&ClassifyError::EmptyRequest), StatusCode::BAD_REQUEST);
    assert_eq!(classify_error_to_status(&ClassifyError::MalformedAnswer("x".into())), StatusCode::BAD_GATEWAY);
    assert_eq!(classify_error_to_status(&ClassifyError::UnknownPrompt("x".into())), StatusCode::BAD_GATEWAY);
    assert_eq!(
        classify_error_to_status(&ClassifyError::Llm(LlmError::ApiRequest("timeout".into()))),
        StatusCode::BAD_GATEWAY
    );
}

#[tokio::test]
async fn without_llm_is_service_unavailable() {
    let err = classify_change(State(test_app_state()), body("add due dates"))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(err.body.code, "E_LLM_NOT_CONFIGURED");
}

#[tokio::test]
async fn empty_request_is_bad_request() {
    let state = state_answering(r#"{"prompt_id": "prompts/api/routes_python.prompt"}"#);
    let err = classify_change(State(state), body("  ")).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn valid_answer_returns_suggestion() {
    let state = state_answering(
        "```json\n{\"prompt_id\": \"prompts/services/task_service_python.prompt\", \"reason\": \"business rule\"}\n```",
    );
    let Json(suggestion) = classify_change(State(state), body("tasks can be reopened"))
        .await
        .unwrap();
    assert_eq!(suggestion.prompt_id, "prompts/services/task_service_python.prompt");
    assert_eq!(suggestion.reason, "business rule");
    assert_eq!(suggestion.command, "pdd gen prompts/services/task_service_python.prompt");
}

#[tokio::test]
async fn unknown_prompt_is_bad_gateway() {
    let state = state_answering(r#"{"prompt_id": "prompts/made_up.prompt", "reason": "?"}"#);
    let err = classify_change(State(state), body("add due dates")).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    assert_eq!(err.body.code, "E_UNKNOWN_PROMPT");
    assert!(!err.body.retryable);
}
