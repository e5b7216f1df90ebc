//! Shared testing utilities for the Rendimiento workspace.
//!
//! [`MockEndpoint`] stands in for the prediction gateway: an axum server on an
//! ephemeral localhost port that records every request and answers with a
//! scripted reply.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

pub use axum::http::StatusCode as MockStatus;

pub const PREDICT_PATH: &str = "/default/sagemaker_prediction";

/// Readings for every field in form order, as an operator would type them.
pub const SAMPLE_READINGS: [(&str, &str); 8] = [
    ("velocidad_sag_rpm",  "9.8"),
    ("flujo_de_agua_m3_h", "1250"),
    ("ugm1",               "0.35"),
    ("ugm2",               "0.4"),
    ("ugm3",               "0.25"),
    ("porc_grueso",        "22.5"),
    ("porc_intermedio",    "41"),
    ("porc_fino",          "36.5"),
];

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockReply {
    Json(StatusCode, Value),
    Raw(StatusCode, String),
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    /// `{"predicted_rendimiento_t_h": value, "model_used": model}` with 200.
    pub fn prediction(value: f64, model: &str) -> Self {
        MockReply::Json(
            StatusCode::OK,
            json!({ "predicted_rendimiento_t_h": value, "model_used": model }),
        )
    }

    pub fn status(status: StatusCode) -> Self {
        MockReply::Raw(status, String::new())
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub content_type: Option<String>,
    pub body: Value,
}

struct MockState {
    reply: Mutex<MockReply>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockEndpoint {
    addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockEndpoint {
    pub async fn start(reply: MockReply) -> Self {
        let state = Arc::new(MockState {
            reply: Mutex::new(reply),
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route(PREDICT_PATH, post(handle_predict))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock endpoint");
        let addr = listener.local_addr().expect("mock endpoint address");
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("mock endpoint stopped: {e}");
            }
        });

        Self { addr, state, handle }
    }

    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, PREDICT_PATH)
    }

    pub fn set_reply(&self, reply: MockReply) {
        *self.state.reply.lock().unwrap() = reply;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for MockEndpoint {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_predict(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = serde_json::from_slice(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));

    let mut reply = state.reply.lock().unwrap().clone();
    state.requests.lock().unwrap().push(RecordedRequest { content_type, body });
    loop {
        match reply {
            MockReply::Delayed(delay, inner) => {
                tokio::time::sleep(delay).await;
                reply = *inner;
            }
            MockReply::Json(status, value) => return (status, axum::Json(value)).into_response(),
            MockReply::Raw(status, text) => return (status, text).into_response(),
        }
    }
}

/// A URL on which nothing is listening.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("throwaway listener address");
    drop(listener);
    format!("http://{}{}", addr, PREDICT_PATH)
}
