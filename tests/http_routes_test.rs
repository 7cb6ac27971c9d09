mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use common::{candidates, ScriptedGenerator};
use std::sync::Arc;
use tower::ServiceExt;
use wordwolf::adapters::http::{router, AppState, PAIR_ROUTE};
use wordwolf::config::{ModelConfig, ServiceConfig};
use wordwolf::domain::model::CandidateCount;
use wordwolf::{build_engine, WordPair};

fn app(generator: ScriptedGenerator) -> (axum::Router, Arc<AppState<Arc<ScriptedGenerator>, ModelConfig>>, Arc<ScriptedGenerator>) {
    let mut config = ServiceConfig::default();
    config.generation.candidate_count = CandidateCount::Four;
    config.generation.seed = Some(11);
    let generator = Arc::new(generator);
    let engine = build_engine(generator.clone(), ModelConfig::default(), &config).unwrap();
    let state = Arc::new(AppState { engine, config });
    (router(state.clone()), state, generator)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(PAIR_ROUTE)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_post_returns_pair_in_wire_shape() {
    let generator = ScriptedGenerator::new().reply(candidates("AI", &["BERT", "GPT", "T5", "XLNet"]));
    let (app, state, generator) = app(generator);

    let response = app
        .oneshot(post(serde_json::json!({"minLevel": 2, "maxLevel": 2, "domain": ["AI"]})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    for key in ["citizen", "werewolf", "citizen-explanation", "werewolf-explanation", "domain", "level"] {
        assert!(body.get(key).is_some(), "missing {}", key);
    }
    let pair: WordPair = serde_json::from_value(body).unwrap();
    assert_eq!(pair.level, 2);
    assert_eq!(pair.domain, "AI");
    assert_ne!(pair.citizen_term, pair.wolf_term);

    assert!(generator.prompts()[0].contains("\"AI\""));
    assert_eq!(state.engine.history().lock().await.len(), 2);
}

#[tokio::test]
async fn test_get_without_parameters_uses_defaults() {
    let generator = ScriptedGenerator::new().reply(candidates("web", &["DNS", "CDN", "TLS", "HTTP"]));
    let (app, _, generator) = app(generator);

    let response = app
        .oneshot(Request::builder().uri(PAIR_ROUTE).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let pair: WordPair = serde_json::from_value(json_body(response).await).unwrap();
    assert!((1..=5).contains(&pair.level));
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_get_with_query_domains() {
    let generator = ScriptedGenerator::new().reply(candidates("databases", &["B-tree", "LSM", "WAL", "MVCC"]));
    let (app, _, generator) = app(generator);

    let uri = format!("{}?minLevel=4&maxLevel=4&domain=databases", PAIR_ROUTE);
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let prompt = &generator.prompts()[0];
    assert!(prompt.contains("\"databases\""));
    assert!(prompt.contains("difficulty level 4"));
}

#[tokio::test]
async fn test_invalid_levels_are_rejected_without_model_call() {
    let (app, _, generator) = app(ScriptedGenerator::new());

    let response = app
        .oneshot(post(serde_json::json!({"minLevel": 4, "maxLevel": 2})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_malformed_model_output_collapses_to_error_body() {
    let mut broken = candidates("AI", &["a", "b", "c", "d"]);
    broken.as_object_mut().unwrap().remove("explanations");
    let (app, state, _) = app(ScriptedGenerator::new().reply(broken));

    let response = app.oneshot(post(serde_json::json!({}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body, serde_json::json!({"error": "Failed to generate word pair"}));
    assert!(state.engine.history().lock().await.is_empty());
}

#[tokio::test]
async fn test_model_outage_collapses_to_error_body() {
    let (app, _, _) = app(ScriptedGenerator::new().fail("401 API key not valid"));

    let response = app.oneshot(post(serde_json::json!({}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to generate word pair");
}

#[tokio::test]
async fn test_unparseable_body_is_bad_request() {
    let (app, _, generator) = app(ScriptedGenerator::new());

    let request = Request::builder()
        .method(Method::POST)
        .uri(PAIR_ROUTE)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"minLevel\": \"high\"}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await.get("error").is_some());
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (app, _, _) = app(ScriptedGenerator::new());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(PAIR_ROUTE)
        .header(header::ORIGIN, "https://game.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_health() {
    let (app, _, _) = app(ScriptedGenerator::new());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}
