//! Router tests: requests go through the full Axum stack, predictions go to a
//! mock gateway over HTTP.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use rendimiento_client::PredictionClient;
use rendimiento_test_utils::{MockEndpoint, MockReply, MockStatus, SAMPLE_READINGS};
use rendimiento_web::router::build_router;
use rendimiento_web::state::{AppEvent, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;
use tower::ServiceExt;

fn router_for(mock: &MockEndpoint) -> Router {
    build_router(state_for(mock), "static")
}

fn state_for(mock: &MockEndpoint) -> AppState {
    let client = PredictionClient::with_client(reqwest::Client::new(), mock.url());
    AppState::with_backend(Arc::new(client)).unwrap()
}

fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

async fn post_form(app: &Router, body: String) -> (StatusCode, String) {
    let req = Request::post("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn json_request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_form_page_lists_all_fields() {
    let mock = MockEndpoint::start(MockReply::prediction(12.5, "modelA")).await;
    let app = router_for(&mock);

    let resp = app.oneshot(Request::get("/").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();

    for label in ["velocidad sag rpm", "flujo de agua m3 h", "porc intermedio"] {
        assert!(html.contains(label), "missing label {label}");
    }
    assert!(html.contains("Get Prediction"));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_form_submit_renders_prediction() {
    let mock = MockEndpoint::start(MockReply::prediction(12.5, "modelA")).await;
    let app = router_for(&mock);

    let (status, html) = post_form(&app, form_body(&SAMPLE_READINGS)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Predicted Rendimiento: 12.5"));
    assert!(html.contains("Model Used: modelA"));
    assert!(!html.contains("error-message"));
    assert_eq!(mock.requests().len(), 1);
    assert_eq!(mock.requests()[0].body["flujo_de_agua_m3_h"], json!(1250.0));
}

#[tokio::test]
async fn test_form_submit_renders_generic_error() {
    let mock = MockEndpoint::start(MockReply::status(MockStatus::INTERNAL_SERVER_ERROR)).await;
    let app = router_for(&mock);

    let (_, html) = post_form(&app, form_body(&SAMPLE_READINGS)).await;

    assert!(html.contains("<p>Something went wrong</p>"));
    assert!(!html.contains("Prediction Result"));
}

#[tokio::test]
async fn test_form_submit_with_empty_field_flags_it() {
    let mock = MockEndpoint::start(MockReply::prediction(12.5, "modelA")).await;
    let app = router_for(&mock);

    let mut pairs = SAMPLE_READINGS.to_vec();
    pairs[4] = ("ugm3", "");
    let (status, html) = post_form(&app, form_body(&pairs)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("value is required"));
    assert!(!html.contains("Prediction Result"));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_form_submit_ignores_unknown_fields() {
    let mock = MockEndpoint::start(MockReply::prediction(3.5, "rf")).await;
    let app = router_for(&mock);

    let mut body = form_body(&SAMPLE_READINGS);
    body.push_str("&rendimiento_t_h=999");
    let (_, html) = post_form(&app, body).await;

    assert!(html.contains("Predicted Rendimiento: 3.5"));
    let sent = mock.requests()[0].body.as_object().unwrap().clone();
    assert_eq!(sent.len(), 8);
    assert!(!sent.contains_key("rendimiento_t_h"));
}

#[tokio::test]
async fn test_api_submit_and_state() {
    let mock = MockEndpoint::start(MockReply::prediction(12.5, "modelA")).await;
    let app = router_for(&mock);
    let body: serde_json::Map<String, Value> = SAMPLE_READINGS
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect();

    let (status, resp) = json_request(&app, "POST", "/api/submit", Some(Value::Object(body))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["status"], "predicted");
    assert_eq!(resp["state"]["result"], json!({ "predicted_rendimiento_t_h": 12.5, "model_used": "modelA" }));

    let (status, state) = json_request(&app, "GET", "/api/state", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["sequence"], 1);
    assert_eq!(state["fields"][0]["key"], "velocidad_sag_rpm");
    assert_eq!(state["fields"][0]["value"], "9.8");
    assert_eq!(state["error"], Value::Null);
}

#[tokio::test]
async fn test_api_submit_rejects_invalid_reading() {
    let mock = MockEndpoint::start(MockReply::prediction(12.5, "modelA")).await;
    let app = router_for(&mock);

    let (status, resp) = json_request(&app, "POST", "/api/submit", Some(json!({ "ugm1": "abc" }))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp["status"], "rejected");
    assert!(resp["message"].as_str().unwrap().starts_with("Invalid input:"));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_api_submit_reports_gateway_error() {
    let mock = MockEndpoint::start(MockReply::Json(
        MockStatus::BAD_REQUEST,
        json!({ "error": "Invalid JSON input format" }),
    ))
    .await;
    let app = router_for(&mock);
    let body: serde_json::Map<String, Value> = SAMPLE_READINGS
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect();

    let (status, resp) = json_request(&app, "POST", "/api/submit", Some(Value::Object(body))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(resp["message"], "Invalid JSON input format");
    assert_eq!(resp["state"]["error"], "Invalid JSON input format");
    assert_eq!(resp["state"]["result"], Value::Null);
}

#[tokio::test]
async fn test_api_reset_clears_form() {
    let mock = MockEndpoint::start(MockReply::prediction(12.5, "modelA")).await;
    let app = router_for(&mock);
    post_form(&app, form_body(&SAMPLE_READINGS)).await;

    let (status, state) = json_request(&app, "POST", "/api/reset", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["result"], Value::Null);
    assert!(state["fields"].as_array().unwrap().iter().all(|f| f["value"] == ""));
}

#[tokio::test]
async fn test_submissions_are_published() {
    let mock = MockEndpoint::start(MockReply::prediction(12.5, "modelA")).await;
    let state = state_for(&mock);
    let mut rx = state.subscribe();

    state.submit_fields(SAMPLE_READINGS).await.unwrap();
    state.submit_fields([("ugm1", "")]).await.unwrap_err();

    assert_eq!(rx.recv().await.unwrap(), AppEvent::PredictionReady {
        seq: 1,
        predicted_rendimiento_t_h: 12.5,
        model_used: "modelA".into(),
    });
    assert_eq!(rx.recv().await.unwrap(), AppEvent::SubmissionRejected { fields: vec!["ugm1".into()] });
}

#[tokio::test]
async fn test_event_stream_delivers_reset() {
    let mock = MockEndpoint::start(MockReply::prediction(12.5, "modelA")).await;
    let app = router_for(&mock);

    let resp = app
        .clone()
        .oneshot(Request::get("/api/events").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/event-stream");
    let mut frames = resp.into_body().into_data_stream();

    let (status, _) = json_request(&app, "POST", "/api/reset", None).await;
    assert_eq!(status, StatusCode::OK);

    let mut received = String::new();
    while !received.ends_with("\n\n") {
        let chunk = tokio::time::timeout(Duration::from_secs(2), frames.next())
            .await
            .expect("no event within 2s")
            .expect("stream ended")
            .unwrap();
        received.push_str(std::str::from_utf8(&chunk).unwrap());
    }
    let data = received.trim().strip_prefix("data: ").unwrap();
    let event: Value = serde_json::from_str(data).unwrap();
    assert_eq!(event, json!({ "type": "form_reset" }));
}

#[tokio::test]
async fn test_overlapping_submissions_publish_discard() {
    let mock = MockEndpoint::start(MockReply::Delayed(
        Duration::from_millis(300),
        Box::new(MockReply::prediction(1.0, "slow")),
    ))
    .await;
    let state = Arc::new(state_for(&mock));
    let mut rx = state.subscribe();

    let slow = tokio::spawn({
        let state = state.clone();
        async move { state.submit_fields(SAMPLE_READINGS).await }
    });
    while mock.requests().is_empty() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    mock.set_reply(MockReply::prediction(2.0, "fast"));
    state.submit_fields(SAMPLE_READINGS).await.unwrap();
    slow.await.unwrap().unwrap();

    assert_eq!(rx.recv().await.unwrap(), AppEvent::PredictionReady {
        seq: 2,
        predicted_rendimiento_t_h: 2.0,
        model_used: "fast".into(),
    });
    assert_eq!(rx.recv().await.unwrap(), AppEvent::SubmissionDiscarded { seq: 1 });
    assert_eq!(state.controller.snapshot().await.result.unwrap().model_used, "fast");
}

#[tokio::test]
async fn test_form_page_drops_trailing_zero_fraction() {
    let mock = MockEndpoint::start(MockReply::prediction(1250.0, "modelA")).await;
    let app = router_for(&mock);

    let (_, html) = post_form(&app, form_body(&SAMPLE_READINGS)).await;

    assert!(html.contains("<p>Predicted Rendimiento: 1250</p>"), "{html}");
}
