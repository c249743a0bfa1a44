//! In-process stand-in for the inference service, shared by the integration
//! tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{OriginalUri, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use url::Url;

/// How the service answers.
#[derive(Debug, Clone)]
pub struct Behavior {
    /// Raw body returned by `/q`.
    pub prompts_body: String,
    pub prompts_status: StatusCode,
    /// `/ping` answers 503 this many times before answering `ping_status`.
    pub pings_before_ready: usize,
    pub ping_status: StatusCode,
    /// Delay before every answer.
    pub delay: Duration,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            prompts_body: r#"{"items": []}"#.to_string(),
            prompts_status: StatusCode::OK,
            pings_before_ready: 0,
            ping_status: StatusCode::OK,
            delay: Duration::ZERO,
        }
    }
}

impl Behavior {
    pub fn items(items: &[&str]) -> Self {
        let body = serde_json::json!({ "items": items }).to_string();
        Self { prompts_body: body, ..Self::default() }
    }
}

#[derive(Clone)]
struct ServiceState {
    behavior: Arc<Behavior>,
    pings: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

pub struct InferenceService {
    url: Url,
    requests: Arc<Mutex<Vec<String>>>,
}

impl InferenceService {
    pub async fn start(behavior: Behavior) -> Self {
        let state = ServiceState {
            behavior: Arc::new(behavior),
            pings: Arc::default(),
            requests: Arc::default(),
        };
        let requests = state.requests.clone();

        let app = Router::new()
            .route("/ping", get(handle_ping))
            .route("/q", get(handle_prompts))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let url = Url::parse(&format!("http://{addr}/")).unwrap();
        Self { url, requests }
    }

    pub fn url(&self) -> Url {
        self.url.clone()
    }

    /// Path and query of every request received, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// An address nothing listens on.
pub async fn closed_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/")).unwrap()
}

fn record(state: &ServiceState, uri: &OriginalUri) {
    let target = uri.path_and_query().map_or_else(|| uri.path().to_string(), |pq| pq.to_string());
    state.requests.lock().unwrap().push(target);
}

async fn handle_ping(State(state): State<ServiceState>, uri: OriginalUri) -> StatusCode {
    record(&state, &uri);
    tokio::time::sleep(state.behavior.delay).await;

    let seen = state.pings.fetch_add(1, Ordering::SeqCst);
    if seen < state.behavior.pings_before_ready {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        state.behavior.ping_status
    }
}

async fn handle_prompts(State(state): State<ServiceState>, uri: OriginalUri) -> impl IntoResponse {
    record(&state, &uri);
    tokio::time::sleep(state.behavior.delay).await;

    (
        state.behavior.prompts_status,
        [(header::CONTENT_TYPE, "application/json")],
        state.behavior.prompts_body.clone(),
    )
}
