#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone)]
pub struct UploadCall {
    pub sensor_type: String,
    pub file_name: String,
    pub bytes: usize,
}

/// Scripted behavior and call log of the mock ingest API.
#[derive(Default)]
pub struct IngestState {
    pub uploads: Vec<UploadCall>,
    pub upload_hits: usize,
    /// Non-2xx `detail` to return instead of accepting the upload.
    pub reject_detail: Option<String>,
    /// Status bodies returned in order; the last one repeats.
    pub statuses: VecDeque<Value>,
    pub status_hits: usize,
    pub collections: HashMap<String, Value>,
    /// When set, every data endpoint answers 500.
    pub fail_data: bool,
}

#[derive(Clone)]
struct Shared(Arc<Mutex<IngestState>>);

pub struct MockIngestServer {
    pub port: u16,
    state: Arc<Mutex<IngestState>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl MockIngestServer {
    pub async fn start(initial: IngestState) -> TestResult<Self> {
        let state = Arc::new(Mutex::new(initial));
        let app = Router::new()
            .route("/api/upload", post(handle_upload))
            .route("/api/task-status/{task_id}", get(handle_status))
            .route("/api/data/{endpoint}", get(handle_data))
            .with_state(Shared(Arc::clone(&state)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            port,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn api_base(&self) -> String {
        format!("http://127.0.0.1:{}/api", self.port)
    }

    pub fn uploads(&self) -> Vec<UploadCall> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn upload_hits(&self) -> usize {
        self.state.lock().unwrap().upload_hits
    }

    pub fn status_hits(&self) -> usize {
        self.state.lock().unwrap().status_hits
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

async fn handle_upload(
    State(shared): State<Shared>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut sensor_type = String::new();
    let mut file_name = String::new();
    let mut bytes = 0usize;
    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name().unwrap_or("") {
            "sensor_type" => sensor_type = field.text().await.unwrap_or_default(),
            "file" => {
                file_name = field.file_name().unwrap_or("").to_string();
                bytes = field.bytes().await.map(|b| b.len()).unwrap_or(0);
            }
            _ => {}
        }
    }

    let mut state = shared.0.lock().unwrap();
    state.upload_hits += 1;
    if let Some(detail) = state.reject_detail.clone() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail })));
    }
    state.uploads.push(UploadCall {
        sensor_type,
        file_name,
        bytes,
    });
    (StatusCode::OK, Json(json!({ "task_id": "tarea-mock-1" })))
}

async fn handle_status(
    State(shared): State<Shared>,
    Path(_task_id): Path<String>,
) -> Json<Value> {
    let mut state = shared.0.lock().unwrap();
    state.status_hits += 1;
    let body = if state.statuses.len() > 1 {
        state.statuses.pop_front().unwrap_or_else(|| json!({ "state": "PENDING" }))
    } else {
        state
            .statuses
            .front()
            .cloned()
            .unwrap_or_else(|| json!({ "state": "PENDING" }))
    };
    Json(body)
}

async fn handle_data(
    State(shared): State<Shared>,
    Path(endpoint): Path<String>,
) -> (StatusCode, Json<Value>) {
    let state = shared.0.lock().unwrap();
    if state.fail_data {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "storage offline" })),
        );
    }
    let rows = state
        .collections
        .get(&endpoint)
        .cloned()
        .unwrap_or_else(|| json!([]));
    (StatusCode::OK, Json(rows))
}
