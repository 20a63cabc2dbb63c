use super::*;
use std::sync::Mutex;

use crate::llm::types::{ChatResponse, ContentBlock};
use crate::prompts::PromptRecord;

// =========================================================================
// MockLlm
// =========================================================================

struct MockLlm {
    responses: Mutex<Vec<Result<ChatResponse, LlmError>>>,
    systems: Mutex<Vec<String>>,
}

impl MockLlm {
    fn new(responses: Vec<Result<ChatResponse, LlmError>>) -> Self {
        Self { responses: Mutex::new(responses), systems: Mutex::new(Vec::new()) }
    }

    fn answering(text: &str) -> Self {
        Self::new(vec![Ok(text_response(text))])
    }
}

fn text_response(text: &str) -> ChatResponse {
    ChatResponse {
        content: vec![ContentBlock::Text { text: text.into() }],
        model: "mock".into(),
        stop_reason: "end_turn".into(),
        input_tokens: 10,
        output_tokens: 5,
    }
}

#[async_trait::async_trait]
impl LlmChat for MockLlm {
    async fn chat(&self, _max_tokens: u32, system: &str, _messages: &[Message]) -> Result<ChatResponse, LlmError> {
        self.systems.lock().unwrap().push(system.to_owned());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() { Ok(text_response("")) } else { responses.remove(0) }
    }

    fn model(&self) -> &str {
        "mock"
    }
}

fn catalog() -> Catalog {
    Catalog::new(vec![
        PromptRecord::new("prompts/api/routes_python.prompt", &[]),
        PromptRecord::new("prompts/frontend/login page_typescript.prompt", &[]),
    ])
}

// =========================================================================
// build_system_prompt
// =========================================================================

#[test]
fn system_prompt_lists_every_id() {
    let catalog = catalog();
    let prompt = build_system_prompt(catalog.ids());
    assert!(prompt.contains("- prompts/api/routes_python.prompt\n"));
    assert!(prompt.contains("- prompts/frontend/login page_typescript.prompt\n"));
    assert!(prompt.contains("\"prompt_id\""));
}

#[test]
fn system_prompt_with_no_ids_still_asks_for_json() {
    let prompt = build_system_prompt(std::iter::empty());
    assert!(prompt.contains("Answer with only a JSON object"));
}

// =========================================================================
// parse_answer
// =========================================================================

#[test]
fn parse_plain_json() {
    let answer = parse_answer(r#"{"prompt_id": "a.prompt", "reason": "owns the API"}"#).unwrap();
    assert_eq!(answer, ClassifierAnswer { prompt_id: "a.prompt".into(), reason: "owns the API".into() });
}

#[test]
fn parse_fenced_json() {
    let text = "```json\n{\"prompt_id\": \" a.prompt \", \"reason\": \"x\"}\n```";
    let answer = parse_answer(text).unwrap();
    assert_eq!(answer.prompt_id, "a.prompt");
    assert_eq!(answer.reason, "x");
}

#[test]
fn parse_bare_fence_and_surrounding_prose() {
    let fenced = parse_answer("```\n{\"prompt_id\": \"b\"}\n```").unwrap();
    assert_eq!(fenced.prompt_id, "b");
    assert!(fenced.reason.is_empty());

    let prose = parse_answer("Sure! {\"prompt_id\": \"c\", \"reason\": \"r\"} Hope that helps.").unwrap();
    assert_eq!(prose.prompt_id, "c");
}

#[test]
fn parse_skips_braces_in_leading_prose() {
    let text = "Options considered {routes, login}. Answer: {\"prompt_id\": \"d.prompt\", \"reason\": \"r\"}";
    let answer = parse_answer(text).unwrap();
    assert_eq!(answer.prompt_id, "d.prompt");
    assert_eq!(answer.reason, "r");
}

#[test]
fn parse_ignores_braces_in_trailing_prose() {
    let text = "{\"prompt_id\": \"e.prompt\", \"reason\": \"api\"}\nNote: the {api} layer owns this.";
    let answer = parse_answer(text).unwrap();
    assert_eq!(answer.prompt_id, "e.prompt");
}

#[test]
fn parse_rejects_non_json() {
    assert!(matches!(parse_answer("I think routes."), Err(ClassifyError::MalformedAnswer(_))));
    assert!(matches!(parse_answer("{not json}"), Err(ClassifyError::MalformedAnswer(_))));
}

#[test]
fn parse_rejects_missing_or_empty_id() {
    assert!(matches!(parse_answer(r#"{"reason": "r"}"#), Err(ClassifyError::MalformedAnswer(_))));
    assert!(matches!(parse_answer(r#"{"prompt_id": "  "}"#), Err(ClassifyError::MalformedAnswer(_))));
}

// =========================================================================
// classify
// =========================================================================

#[tokio::test]
async fn classify_returns_suggestion_with_gen_command() {
    let llm = MockLlm::answering(r#"{"prompt_id": "prompts/api/routes_python.prompt", "reason": "endpoint change"}"#);
    let result = classify(&catalog(), &llm, "  add a /tasks/archive endpoint ", 256).await.unwrap();
    assert_eq!(
        result,
        ChangeSuggestion {
            prompt_id: "prompts/api/routes_python.prompt".into(),
            reason: "endpoint change".into(),
            command: "pdd gen prompts/api/routes_python.prompt".into(),
        }
    );
    let systems = llm.systems.lock().unwrap();
    assert_eq!(systems.len(), 1);
    assert!(systems[0].contains("prompts/api/routes_python.prompt"));
}

#[tokio::test]
async fn classify_quotes_prompt_path_with_space() {
    let llm = MockLlm::answering(r#"{"prompt_id": "prompts/frontend/login page_typescript.prompt", "reason": "ui"}"#);
    let result = classify(&catalog(), &llm, "make the login button blue", 256).await.unwrap();
    assert_eq!(result.command, "pdd gen \"prompts/frontend/login page_typescript.prompt\"");
}

#[tokio::test]
async fn classify_empty_request_skips_llm() {
    let llm = MockLlm::new(Vec::new());
    let err = classify(&catalog(), &llm, "   ", 256).await.unwrap_err();
    assert!(matches!(err, ClassifyError::EmptyRequest));
    assert!(llm.systems.lock().unwrap().is_empty());
}

#[tokio::test]
async fn classify_rejects_unknown_prompt() {
    let llm = MockLlm::answering(r#"{"prompt_id": "prompts/nope.prompt", "reason": "?"}"#);
    let err = classify(&catalog(), &llm, "change something", 256).await.unwrap_err();
    assert!(matches!(err, ClassifyError::UnknownPrompt(ref id) if id == "prompts/nope.prompt"));
    assert_eq!(err.error_code(), "E_UNKNOWN_PROMPT");
}

#[tokio::test]
async fn classify_rejects_response_without_text() {
    let llm = MockLlm::new(vec![Ok(ChatResponse {
        content: vec![ContentBlock::Thinking { thinking: "hmm".into() }],
        model: "mock".into(),
        stop_reason: "end_turn".into(),
        input_tokens: 0,
        output_tokens: 0,
    })]);
    let err = classify(&catalog(), &llm, "change something", 256).await.unwrap_err();
    assert!(matches!(err, ClassifyError::MalformedAnswer(_)));
}

#[tokio::test]
async fn classify_propagates_llm_error() {
    let llm = MockLlm::new(vec![Err(LlmError::ApiResponse { status: 529, body: "overloaded".into() })]);
    let err = classify(&catalog(), &llm, "change something", 256).await.unwrap_err();
    assert!(matches!(err, ClassifyError::Llm(_)));
    assert!(err.retryable());
    assert_eq!(err.error_code(), "E_LLM_ERROR");
}
