pub mod models;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use tracing::{debug, info};

use models::{ApiErrorBody, SensorKind, TaskStatus, UploadAck};

/// Where the poller gets task states from. The production implementation is
/// [`ApiClient`]; tests substitute scripted sources.
#[async_trait]
pub trait StatusSource: Send + Sync + 'static {
    async fn task_status(&self, task_id: &str) -> Result<TaskStatus>;
}

/// Thin client over the city's ingest API. One shared reqwest client,
/// no retries, no auth (the API has none).
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a CSV for ingestion. Returns the task id the worker was
    /// assigned. Non-2xx responses surface the server's `detail` message
    /// when present.
    pub async fn submit_upload(&self, file: &Path, kind: SensorKind) -> Result<UploadAck> {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "datos.csv".to_string());
        let bytes = tokio::fs::read(file)
            .await
            .with_context(|| format!("No se pudo leer el archivo {}", file.display()))?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new()
            .text("sensor_type", kind.wire_tag())
            .part("file", part);

        let url = format!("{}/upload", self.base_url);
        let res = self.client.post(&url).multipart(form).send().await?;

        if !res.status().is_success() {
            let detail = res
                .json::<ApiErrorBody>()
                .await
                .map(|b| b.detail)
                .unwrap_or_else(|_| "Error al subir el archivo.".to_string());
            return Err(anyhow!(detail));
        }

        let ack: UploadAck = res.json().await?;
        info!(task_id = %ack.task_id, sensor = kind.wire_tag(), "upload accepted");
        Ok(ack)
    }

    /// Fetch the newest rows of a collection. The row schema is whatever the
    /// server stored; the caller derives columns from the first row.
    pub async fn preview_rows(&self, kind: SensorKind) -> Result<Vec<serde_json::Value>> {
        let url = format!("{}/data/{}", self.base_url, kind.endpoint());
        let res = self.client.get(&url).send().await?;
        if !res.status().is_success() {
            return Err(anyhow!(
                "Error {}: No se pudieron cargar los datos.",
                res.status().as_u16()
            ));
        }
        let rows: Vec<serde_json::Value> = res.json().await?;
        debug!(endpoint = kind.endpoint(), rows = rows.len(), "preview fetched");
        Ok(rows)
    }
}

#[async_trait]
impl StatusSource for ApiClient {
    async fn task_status(&self, task_id: &str) -> Result<TaskStatus> {
        let url = format!("{}/task-status/{}", self.base_url, task_id);
        let status: TaskStatus = self.client.get(&url).send().await?.json().await?;
        Ok(status)
    }
}
