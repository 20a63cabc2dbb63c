use super::*;

#[test]
fn build_messages_prepends_system() {
    let messages = vec![Message::user("change the login flow")];
    let out = build_messages("You route change requests.", &messages);
    assert_eq!(
        out,
        vec![
            CcMessage { role: "system", content: "You route change requests." },
            CcMessage { role: "user", content: "change the login flow" },
        ]
    );
}

#[test]
fn build_messages_skips_blank_system() {
    let messages = vec![Message::user("hi")];
    let out = build_messages("   ", &messages);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].role, "user");
}

#[test]
fn request_serializes_flat_messages() {
    let messages = vec![Message::user("hi")];
    let msgs = build_messages("sys", &messages);
    let body = CcRequest { model: "gpt-4o", max_tokens: 256, messages: &msgs };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["model"], "gpt-4o");
    assert_eq!(json["max_tokens"], 256);
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["messages"][1]["content"], "hi");
}

#[test]
fn parse_text_choice() {
    let json = serde_json::json!({
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "{\"prompt_id\":\"x\"}" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 5 }
    })
    .to_string();

    let resp = parse_chat_completions_response(&json).unwrap();
    assert_eq!(resp.model, "gpt-4o-2024-08-06");
    assert_eq!(resp.stop_reason, "stop");
    assert_eq!(resp.text().as_deref(), Some("{\"prompt_id\":\"x\"}"));
    assert_eq!(resp.input_tokens, 12);
    assert_eq!(resp.output_tokens, 5);
}

#[test]
fn parse_null_content_yields_no_blocks() {
    let json = serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": null } }]
    })
    .to_string();

    let resp = parse_chat_completions_response(&json).unwrap();
    assert!(resp.content.is_empty());
    assert_eq!(resp.stop_reason, "stop");
    assert_eq!(resp.input_tokens, 0);
}

#[test]
fn parse_missing_choices_errors() {
    let err = parse_chat_completions_response(r#"{"model":"m","choices":[]}"#).unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(ref msg) if msg.contains("choices[0]")));
}

#[test]
fn parse_invalid_json_errors() {
    assert!(matches!(parse_chat_completions_response("{"), Err(LlmError::ApiParse(_))));
}
