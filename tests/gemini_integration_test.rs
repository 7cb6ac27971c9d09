use httpmock::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;
use wordwolf::config::ServiceConfig;
use wordwolf::utils::error::ErrorCategory;
use wordwolf::utils::validation::Validate;
use wordwolf::{build_engine, GeminiClient};

fn gemini_reply(inner: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": inner.to_string()}]},
            "finishReason": "STOP"
        }]
    })
}

fn config_file(base_url: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    let content = format!(
        r#"
[model]
base_url = "{}"
name = "gemini-2.5-flash"
api_key = "integration-key"
temperature = 2.0
thinking_budget = 500

[generation]
candidate_count = 8
seed = 99

[history]
capacity = 10
"#,
        base_url
    );
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_end_to_end_pair_through_gemini_endpoint() {
    let server = MockServer::start();
    let words = ["TCP", "UDP", "QUIC", "SCTP", "ICMP", "ARP", "DHCP", "NAT"];
    let explanations: Vec<String> = words.iter().map(|w| format!("{} protocol", w)).collect();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.5-flash:generateContent")
            .header("x-goog-api-key", "integration-key")
            .body_contains("responseMimeType")
            .body_contains("thinkingBudget");
        then.status(200).json_body(gemini_reply(serde_json::json!({
            "domain": "networking",
            "sub_domain": "transport layer",
            "difficulty_levels": 3,
            "words": words,
            "explanations": explanations
        })));
    });

    let file = config_file(&server.base_url());
    let config = ServiceConfig::from_file(file.path()).unwrap();
    config.validate().unwrap();

    let generator = GeminiClient::from_config(&config.model).unwrap();
    let engine = build_engine(generator, config.model.clone(), &config).unwrap();
    let request = config.resolve_request(Some(3), Some(3), None).unwrap();

    let pair = engine.generate_pair(&request).await.unwrap();

    api_mock.assert();
    assert_eq!(pair.domain, "networking");
    assert_eq!(pair.level, 3);
    assert!(words.contains(&pair.citizen_term.as_str()));
    assert!(words.contains(&pair.wolf_term.as_str()));
    assert_ne!(pair.citizen_term, pair.wolf_term);
    assert_eq!(pair.citizen_explanation, format!("{} protocol", pair.citizen_term));
    assert_eq!(
        engine.history().lock().await.snapshot(),
        vec![pair.citizen_term, pair.wolf_term]
    );
}

#[tokio::test]
async fn test_gemini_outage_leaves_history_untouched() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST);
        then.status(500).body("internal");
    });

    let file = config_file(&server.base_url());
    let config = ServiceConfig::from_file(file.path()).unwrap();
    let generator = GeminiClient::from_config(&config.model).unwrap();
    let engine = build_engine(generator, config.model.clone(), &config).unwrap();
    engine.history().lock().await.append("earlier");
    let before = engine.history().lock().await.snapshot();

    let request = config.resolve_request(None, None, None).unwrap();
    let err = engine.generate_pair(&request).await.unwrap_err();

    api_mock.assert();
    assert_eq!(err.category(), ErrorCategory::ExternalService);
    assert_eq!(engine.history().lock().await.snapshot(), before);
}

#[tokio::test]
async fn test_gemini_prose_reply_is_invalid_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "I cannot help with that."}]}}]
        }));
    });

    let file = config_file(&server.base_url());
    let config = ServiceConfig::from_file(file.path()).unwrap();
    let generator = GeminiClient::from_config(&config.model).unwrap();
    let engine = build_engine(generator, config.model.clone(), &config).unwrap();

    let request = config.resolve_request(Some(1), Some(1), None).unwrap();
    let err = engine.generate_pair(&request).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::InvalidResponse);
    assert!(engine.history().lock().await.is_empty());
}
