//! In-process stand-in for the generation backend

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake";

/// Recorded traffic and scripted answers
#[derive(Default)]
pub struct StubState {
    pub submissions: Vec<Value>,
    pub status_requests: usize,
    /// Number of status requests answered with "generating" before the
    /// terminal answer
    pub generating_polls: usize,
    /// Error message of a failed job, `None` for a job that completes
    pub failure: Option<String>,
    pub healthy: bool,
    /// Answer health checks with a bare `ok` instead of JSON
    pub plain_health: bool,
}

pub type Shared = Arc<Mutex<StubState>>;

pub struct StubBackend {
    pub url: String,
    pub state: Shared,
}

impl StubBackend {
    pub async fn start(state: StubState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = Router::new()
            .route("/generate-image", post(generate))
            .route("/status/{job_id}", get(status))
            .route("/health", get(health))
            .route("/image/{job_id}", get(image))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn submissions(&self) -> Vec<Value> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn status_requests(&self) -> usize {
        self.state.lock().unwrap().status_requests
    }
}

async fn generate(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    state.lock().unwrap().submissions.push(body);
    Json(json!({
        "job_id": "job-1",
        "image_name": "img_job-1",
        "status": "generating"
    }))
}

async fn status(State(state): State<Shared>, Path(job_id): Path<String>) -> Response {
    if job_id != "job-1" {
        return (StatusCode::NOT_FOUND, "Job not found").into_response();
    }

    let mut state = state.lock().unwrap();
    state.status_requests += 1;

    let (status, completed_at, error) = if state.status_requests <= state.generating_polls {
        ("generating", Value::Null, Value::Null)
    } else if let Some(message) = &state.failure {
        ("failed", json!("2024-05-01T10:00:30.5"), json!(message))
    } else {
        ("completed", json!("2024-05-01T10:00:30.5"), Value::Null)
    };

    Json(json!({
        "job_id": job_id,
        "image_name": "img_job-1",
        "status": status,
        "prompt": "a cat",
        "height": 1024,
        "width": 1024,
        "num_inference_steps": 9,
        "created_at": "2024-05-01T10:00:00.000123",
        "completed_at": completed_at,
        "error_message": error
    }))
    .into_response()
}

async fn health(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    if state.healthy && state.plain_health {
        "ok".into_response()
    } else if state.healthy {
        Json(json!({ "status": "healthy" })).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "down").into_response()
    }
}

async fn image(Path(job_id): Path<String>) -> Response {
    if job_id == "job-1" {
        PNG_BYTES.into_response()
    } else {
        (StatusCode::NOT_FOUND, "Image not found").into_response()
    }
}
