use serde_derive::{Deserialize, Serialize};

/// Sensor families the ingest pipeline accepts. Wire tags are the Spanish
/// identifiers the API grew up with; the CLI and the preview endpoints use
/// the English aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorKind {
    #[serde(rename = "calidad_aire")]
    AirQuality,
    #[serde(rename = "sonido")]
    Sound,
    #[serde(rename = "soterrado")]
    Buried,
}

impl SensorKind {
    pub const ALL: [SensorKind; 3] = [
        SensorKind::AirQuality,
        SensorKind::Sound,
        SensorKind::Buried,
    ];

    /// Tag sent in the `sensor_type` multipart field.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            SensorKind::AirQuality => "calidad_aire",
            SensorKind::Sound => "sonido",
            SensorKind::Buried => "soterrado",
        }
    }

    /// Path segment under `/api/data/`.
    pub fn endpoint(&self) -> &'static str {
        match self {
            SensorKind::AirQuality => "air-quality",
            SensorKind::Sound => "sound",
            SensorKind::Buried => "buried",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SensorKind::AirQuality => "Calidad del Aire",
            SensorKind::Sound => "Sonido",
            SensorKind::Buried => "Soterrado",
        }
    }

    /// Accepts both the wire tag and the endpoint alias.
    pub fn parse(s: &str) -> Option<SensorKind> {
        Self::ALL
            .into_iter()
            .find(|k| k.wire_tag() == s || k.endpoint() == s)
    }
}

/// Server-reported lifecycle of an upload task, plus the local sentinel for
/// a poll that could not be fetched or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILURE")]
    Failure,
    #[serde(rename = "FETCH_ERROR")]
    FetchError,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskState::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Pending => "PENDING",
            TaskState::Success => "SUCCESS",
            TaskState::Failure => "FAILURE",
            TaskState::FetchError => "FETCH_ERROR",
        }
    }
}

/// Payload attached to a successful task: what the worker did and which
/// collection now holds the rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    pub message: String,
    pub collection: String,
}

/// Body of `GET /api/task-status/{task_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(default)]
    pub result: Option<TaskResult>,
}

/// Body of a successful `POST /api/upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadAck {
    pub task_id: String,
}

/// Error body the API attaches to non-2xx responses (FastAPI convention).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}
