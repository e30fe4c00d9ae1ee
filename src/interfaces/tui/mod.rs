mod events;
mod screens;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::api::models::SensorKind;
use crate::app::AppState;
use crate::app::nav::NavAction;
use crate::data::preview::PreviewState;
use crate::data::sensors::{self, Alert, ParameterSample, Reading, Sensor, SensorModel};
use crate::poller::{PollEvent, PollerHandle, TaskRecord};

/// Category filter of the dashboard KPI/chart view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CategoryFilter {
    All,
    Air,
    Water,
    Sound,
}

impl CategoryFilter {
    const ORDER: [CategoryFilter; 4] = [
        CategoryFilter::All,
        CategoryFilter::Air,
        CategoryFilter::Water,
        CategoryFilter::Sound,
    ];

    fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "Todos",
            CategoryFilter::Air => "Aire",
            CategoryFilter::Water => "Agua",
            CategoryFilter::Sound => "Sonido",
        }
    }
}

/// Status filter of the sensor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StatusFilter {
    All,
    Normal,
    Warning,
    Critical,
}

impl StatusFilter {
    const ORDER: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Normal,
        StatusFilter::Warning,
        StatusFilter::Critical,
    ];

    fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "Todos",
            StatusFilter::Normal => "Activos",
            StatusFilter::Warning => "Advertencia",
            StatusFilter::Critical => "Crítico",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ReportRange {
    Today,
    Week,
    Month,
}

impl ReportRange {
    const ORDER: [ReportRange; 3] = [ReportRange::Today, ReportRange::Week, ReportRange::Month];

    fn label(&self) -> &'static str {
        match self {
            ReportRange::Today => "Hoy",
            ReportRange::Week => "Últimos 7 días",
            ReportRange::Month => "Últimos 30 días",
        }
    }

    fn days(&self) -> u32 {
        match self {
            ReportRange::Today => 1,
            ReportRange::Week => 7,
            ReportRange::Month => 30,
        }
    }
}

/// Result of the background upload submission task.
pub(super) enum UploadOutcome {
    Accepted(String),
    Rejected(String),
}

/// Fields of the login/register forms, tracked by focus index.
#[derive(Default)]
pub(super) struct FormState {
    pub values: Vec<String>,
    pub focus: usize,
    pub role_idx: usize,
}

impl FormState {
    fn with_fields(n: usize) -> Self {
        Self {
            values: vec![String::new(); n],
            focus: 0,
            role_idx: 0,
        }
    }

    pub fn focused_mut(&mut self) -> &mut String {
        &mut self.values[self.focus]
    }
}

pub struct TuiApp {
    pub(super) state: AppState,
    pub(super) client: Arc<ApiClient>,
    pub(super) should_quit: bool,

    // Static display data, regenerated at login.
    pub(super) sensors: Vec<Sensor>,
    pub(super) alerts: Vec<Alert>,
    pub(super) hourly: Vec<ParameterSample>,

    // Login / register forms.
    pub(super) form: FormState,

    // Dashboard.
    pub(super) dash_filter: CategoryFilter,

    // Sensor list.
    pub(super) search: String,
    pub(super) status_filter: StatusFilter,
    pub(super) list_selected: usize,

    // Sensor detail: readings cached per selected sensor.
    pub(super) detail_readings: Option<(String, Vec<Reading>)>,

    // Reports.
    pub(super) report_range: ReportRange,
    pub(super) report_model: Option<SensorModel>,
    pub(super) report_samples: Vec<ParameterSample>,
    pub(super) notice: Option<String>,

    // Operations (upload + task polling).
    pub(super) upload_path: String,
    pub(super) upload_kind_idx: usize,
    pub(super) upload_error: Option<String>,
    pub(super) uploading: bool,
    pub(super) task: Option<TaskRecord>,
    pub(super) poller: Option<PollerHandle>,
    pub(super) poll_rx: Option<mpsc::Receiver<PollEvent>>,
    pub(super) upload_tx: mpsc::Sender<UploadOutcome>,
    pub(super) upload_rx: mpsc::Receiver<UploadOutcome>,

    // Executive (data preview).
    pub(super) preview_idx: usize,
    pub(super) previews: HashMap<&'static str, PreviewState>,
    pub(super) preview_tx: mpsc::Sender<(SensorKind, PreviewState)>,
    pub(super) preview_rx: mpsc::Receiver<(SensorKind, PreviewState)>,
}

impl TuiApp {
    pub fn new(api_url: String) -> Self {
        let (upload_tx, upload_rx) = mpsc::channel(4);
        let (preview_tx, preview_rx) = mpsc::channel(8);
        Self {
            state: AppState::default(),
            client: Arc::new(ApiClient::new(api_url)),
            should_quit: false,
            sensors: sensors::catalog(),
            alerts: sensors::active_alerts(),
            hourly: sensors::hourly_samples(),
            form: FormState::with_fields(2),
            dash_filter: CategoryFilter::All,
            search: String::new(),
            status_filter: StatusFilter::All,
            list_selected: 0,
            detail_readings: None,
            report_range: ReportRange::Week,
            report_model: None,
            report_samples: sensors::daily_samples(7),
            notice: None,
            upload_path: String::new(),
            upload_kind_idx: 0,
            upload_error: None,
            uploading: false,
            task: None,
            poller: None,
            poll_rx: None,
            upload_tx,
            upload_rx,
            preview_idx: 0,
            previews: HashMap::new(),
            preview_tx,
            preview_rx,
        }
    }

    pub(super) fn navigate(&mut self, action: NavAction) {
        let was_logged_in = self.state.logged_in();
        self.state.apply(action);

        if was_logged_in && !self.state.logged_in() {
            // Logout: drop the poller so no background queries outlive the
            // session, and reset screen-local state.
            self.poller = None;
            self.poll_rx = None;
            self.task = None;
            self.uploading = false;
            self.upload_error = None;
            self.upload_path.clear();
            self.previews.clear();
            self.form = FormState::with_fields(2);
        }
    }

    pub(super) fn selected_sensor(&self) -> Option<&Sensor> {
        let id = self.state.selected_sensor.as_deref()?;
        self.sensors.iter().find(|s| s.id == id)
    }

    /// Sensors visible on the list screen under the current search and
    /// status filter.
    pub(super) fn filtered_sensors(&self) -> Vec<&Sensor> {
        self.sensors
            .iter()
            .filter(|s| sensors::matches_search(s, &self.search))
            .filter(|s| match self.status_filter {
                StatusFilter::All => true,
                StatusFilter::Normal => s.status == sensors::SensorStatus::Normal,
                StatusFilter::Warning => s.status == sensors::SensorStatus::Warning,
                StatusFilter::Critical => s.status == sensors::SensorStatus::Critical,
            })
            .collect()
    }

    pub(super) fn report_sensors(&self) -> Vec<&Sensor> {
        self.sensors
            .iter()
            .filter(|s| self.report_model.is_none_or(|m| s.model == m))
            .collect()
    }

    pub(super) fn preview_kind(&self) -> SensorKind {
        SensorKind::ALL[self.preview_idx % SensorKind::ALL.len()]
    }

    /// Fetch the visible collection once. Called on entering the executive
    /// screen and whenever the selected collection changes.
    pub(super) fn refresh_preview(&mut self) {
        let kind = self.preview_kind();
        self.previews.insert(kind.endpoint(), PreviewState::Loading);
        let client = self.client.clone();
        let tx = self.preview_tx.clone();
        tokio::spawn(async move {
            let state = match client.preview_rows(kind).await {
                Ok(rows) => PreviewState::from_rows(rows),
                Err(e) => PreviewState::Failed(e.to_string()),
            };
            let _ = tx.send((kind, state)).await;
        });
    }

    /// Submit the selected file. Validation failures surface inline and
    /// never reach the network.
    pub(super) fn submit_upload(&mut self) {
        if self.uploading {
            return;
        }
        if self.upload_path.trim().is_empty() {
            self.upload_error = Some("Por favor, selecciona un archivo.".to_string());
            return;
        }
        self.upload_error = None;
        self.uploading = true;

        let kind = SensorKind::ALL[self.upload_kind_idx % SensorKind::ALL.len()];
        let path = std::path::PathBuf::from(self.upload_path.trim());
        let client = self.client.clone();
        let tx = self.upload_tx.clone();
        tokio::spawn(async move {
            let outcome = match client.submit_upload(&path, kind).await {
                Ok(ack) => UploadOutcome::Accepted(ack.task_id),
                Err(e) => UploadOutcome::Rejected(e.to_string()),
            };
            let _ = tx.send(outcome).await;
        });
    }

    /// A new task id replaces any previous poller. The old handle is dropped
    /// first, so its timer is cancelled before the new one exists.
    pub(super) fn start_polling(&mut self, task_id: String) {
        self.poller = None;
        self.poll_rx = None;
        self.task = None;
        let (tx, rx) = mpsc::channel(16);
        self.poll_rx = Some(rx);
        self.poller = Some(crate::poller::spawn(self.client.clone(), task_id, tx));
    }
}
