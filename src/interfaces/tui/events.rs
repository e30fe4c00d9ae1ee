use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend};
use std::{io, time::Duration};
use tokio::sync::mpsc;

use crate::api::models::{SensorKind, TaskState};
use crate::app::Screen;
use crate::app::nav::NavAction;
use crate::data::sensors;
use crate::poller::PollEvent;

use super::{CategoryFilter, ReportRange, StatusFilter, TuiApp, UploadOutcome};

impl TuiApp {
    pub async fn run_tui(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_app(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()>
    where
        <B as Backend>::Error: std::error::Error + Send + Sync + 'static,
    {
        loop {
            if self.should_quit {
                return Ok(());
            }

            self.drain_background_events();

            terminal.draw(|f| self.render(f))?;

            // Short timeout so background updates surface promptly.
            if event::poll(Duration::from_millis(80))?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key);
            }
        }
    }

    /// Non-blocking drain of everything the background tasks produced since
    /// the last frame.
    fn drain_background_events(&mut self) {
        while let Ok(outcome) = self.upload_rx.try_recv() {
            self.uploading = false;
            match outcome {
                UploadOutcome::Accepted(task_id) => self.start_polling(task_id),
                UploadOutcome::Rejected(detail) => self.upload_error = Some(detail),
            }
        }

        let mut finished = false;
        if let Some(rx) = self.poll_rx.as_mut() {
            loop {
                match rx.try_recv() {
                    Ok(PollEvent::Update(record)) => self.task = Some(record),
                    Ok(PollEvent::Completed(record)) => {
                        self.notice = Some(match record.state {
                            TaskState::Success => match &record.result {
                                Some(r) => {
                                    format!("{} (colección: {})", r.message, r.collection)
                                }
                                None => "Tarea completada.".to_string(),
                            },
                            TaskState::Failure => {
                                format!("La tarea {} ha fallado.", record.task_id)
                            }
                            _ => format!("No se pudo consultar la tarea {}.", record.task_id),
                        });
                        self.task = Some(record);
                        finished = true;
                    }
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        finished = true;
                        break;
                    }
                }
            }
        }
        if finished {
            self.poller = None;
            self.poll_rx = None;
        }

        while let Ok((kind, state)) = self.preview_rx.try_recv() {
            self.previews.insert(kind.endpoint(), state);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.state.alerts_open {
            match key.code {
                KeyCode::Esc => self.navigate(NavAction::CloseAlerts),
                KeyCode::Enter => self.navigate(NavAction::GoReports),
                KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.navigate(NavAction::CloseAlerts)
                }
                _ => {}
            }
            return;
        }

        if self.state.logged_in()
            && key.modifiers.contains(KeyModifiers::CONTROL)
            && self.handle_global_shortcut(key.code)
        {
            return;
        }

        match self.state.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Register => self.handle_register_key(key),
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Sensors => self.handle_sensors_key(key),
            Screen::SensorDetail => self.handle_detail_key(key),
            Screen::Reports => self.handle_reports_key(key),
            Screen::Operations => self.handle_operations_key(key),
            Screen::Executive => self.handle_executive_key(key),
        }
    }

    fn handle_global_shortcut(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('d') => self.navigate(NavAction::GoDashboard),
            KeyCode::Char('s') => self.navigate(NavAction::GoSensors),
            KeyCode::Char('r') => self.navigate(NavAction::GoReports),
            KeyCode::Char('o') => self.navigate(NavAction::GoOperations),
            KeyCode::Char('e') => {
                self.navigate(NavAction::GoExecutive);
                // Every entry refetches; nothing is cached across visits.
                if self.state.screen == Screen::Executive {
                    self.refresh_preview();
                }
            }
            KeyCode::Char('a') => self.navigate(NavAction::OpenAlerts),
            KeyCode::Char('l') => self.navigate(NavAction::Logout),
            _ => return false,
        }
        true
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
            self.form = super::FormState::with_fields(3);
            self.navigate(NavAction::GoRegister);
            return;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.form.focus = (self.form.focus + 1) % self.form.values.len();
            }
            KeyCode::Up => {
                let len = self.form.values.len();
                self.form.focus = (self.form.focus + len - 1) % len;
            }
            KeyCode::Backspace => {
                self.form.focused_mut().pop();
            }
            KeyCode::Enter => {
                let email = self.form.values[0].trim().to_string();
                if !email.is_empty() {
                    self.navigate(NavAction::Login { email });
                    self.form = super::FormState::with_fields(2);
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.focused_mut().push(c)
            }
            _ => {}
        }
    }

    fn handle_register_key(&mut self, key: KeyEvent) {
        // Fields: name, email, password; focus 3 is the role selector.
        match key.code {
            KeyCode::Esc => {
                self.form = super::FormState::with_fields(2);
                self.navigate(NavAction::GoLogin);
            }
            KeyCode::Tab | KeyCode::Down => {
                self.form.focus = (self.form.focus + 1) % 4;
            }
            KeyCode::Up => {
                self.form.focus = (self.form.focus + 3) % 4;
            }
            KeyCode::Left if self.form.focus == 3 => {
                self.form.role_idx = (self.form.role_idx + 2) % 3;
            }
            KeyCode::Right if self.form.focus == 3 => {
                self.form.role_idx = (self.form.role_idx + 1) % 3;
            }
            KeyCode::Backspace if self.form.focus < 3 => {
                self.form.focused_mut().pop();
            }
            KeyCode::Enter => {
                let name = self.form.values[0].trim().to_string();
                let email = self.form.values[1].trim().to_string();
                if !name.is_empty() && !email.is_empty() {
                    let role = crate::app::Role::ALL[self.form.role_idx];
                    self.navigate(NavAction::Register { name, email, role });
                    self.form = super::FormState::with_fields(2);
                }
            }
            KeyCode::Char(c)
                if self.form.focus < 3 && !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.form.focused_mut().push(c)
            }
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                let dir: i32 = if key.code == KeyCode::Left { -1 } else { 1 };
                let order = CategoryFilter::ORDER;
                let idx = order.iter().position(|f| *f == self.dash_filter).unwrap_or(0);
                let next = (idx as i32 + dir).rem_euclid(order.len() as i32) as usize;
                self.dash_filter = order[next];
            }
            _ => {}
        }
    }

    fn handle_sensors_key(&mut self, key: KeyEvent) {
        let visible = self.filtered_sensors().len();
        match key.code {
            KeyCode::Up => {
                self.list_selected = self.list_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if visible > 0 && self.list_selected + 1 < visible {
                    self.list_selected += 1;
                }
            }
            KeyCode::Left | KeyCode::Right => {
                let dir: i32 = if key.code == KeyCode::Left { -1 } else { 1 };
                let order = StatusFilter::ORDER;
                let idx = order
                    .iter()
                    .position(|f| *f == self.status_filter)
                    .unwrap_or(0);
                let next = (idx as i32 + dir).rem_euclid(order.len() as i32) as usize;
                self.status_filter = order[next];
                self.list_selected = 0;
            }
            KeyCode::Enter => {
                if let Some(sensor) = self.filtered_sensors().get(self.list_selected) {
                    let id = sensor.id.clone();
                    let readings = sensors::hourly_readings(sensor);
                    self.detail_readings = Some((id.clone(), readings));
                    self.navigate(NavAction::GoSensorDetail { sensor_id: id });
                }
            }
            KeyCode::Esc => {
                if self.search.is_empty() {
                    self.navigate(NavAction::GoDashboard);
                } else {
                    self.search.clear();
                    self.list_selected = 0;
                }
            }
            KeyCode::Backspace => {
                self.search.pop();
                self.list_selected = 0;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.push(c);
                self.list_selected = 0;
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Backspace) {
            self.navigate(NavAction::GoSensors);
        }
    }

    fn handle_reports_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right => {
                let dir: i32 = if key.code == KeyCode::Left { -1 } else { 1 };
                let order = ReportRange::ORDER;
                let idx = order
                    .iter()
                    .position(|r| *r == self.report_range)
                    .unwrap_or(0);
                let next = (idx as i32 + dir).rem_euclid(order.len() as i32) as usize;
                self.report_range = order[next];
                self.report_samples = sensors::daily_samples(self.report_range.days());
            }
            KeyCode::Up | KeyCode::Down => {
                use crate::data::sensors::SensorModel::*;
                self.report_model = match self.report_model {
                    None => Some(Em310),
                    Some(Em310) => Some(Em500),
                    Some(Em500) => Some(Ws302),
                    Some(Ws302) => None,
                };
            }
            KeyCode::Char('p') => {
                self.notice = Some("Reporte exportado en formato PDF".to_string());
            }
            KeyCode::Char('c') => {
                self.notice = Some("Reporte exportado en formato CSV".to_string());
            }
            KeyCode::Esc => self.navigate(NavAction::GoDashboard),
            _ => {}
        }
    }

    fn handle_operations_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right => {
                let n = SensorKind::ALL.len();
                let dir: i32 = if key.code == KeyCode::Left { -1 } else { 1 };
                self.upload_kind_idx =
                    (self.upload_kind_idx as i32 + dir).rem_euclid(n as i32) as usize;
            }
            KeyCode::Enter => self.submit_upload(),
            KeyCode::Backspace => {
                self.upload_path.pop();
            }
            KeyCode::Esc => {
                if self.upload_error.is_some() {
                    self.upload_error = None;
                } else {
                    self.navigate(NavAction::GoDashboard);
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.upload_path.push(c)
            }
            _ => {}
        }
    }

    fn handle_executive_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                let n = SensorKind::ALL.len();
                let dir: i32 = if key.code == KeyCode::Left { -1 } else { 1 };
                self.preview_idx = (self.preview_idx as i32 + dir).rem_euclid(n as i32) as usize;
                self.refresh_preview();
            }
            KeyCode::Enter => self.refresh_preview(),
            KeyCode::Esc => self.navigate(NavAction::GoDashboard),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::preview::PreviewState;
    use serde_json::json;

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn logged_in_app() -> TuiApp {
        let mut app = TuiApp::new("http://127.0.0.1:9/api".to_string());
        app.navigate(NavAction::Login {
            email: "ana@gamc.bo".to_string(),
        });
        app
    }

    #[tokio::test]
    async fn entering_executive_starts_a_fetch() {
        let mut app = logged_in_app();
        app.handle_key(ctrl('e'));
        assert_eq!(app.state.screen, Screen::Executive);
        assert_eq!(
            app.previews.get(app.preview_kind().endpoint()),
            Some(&PreviewState::Loading)
        );
    }

    #[tokio::test]
    async fn reentering_executive_refetches_instead_of_showing_cached_rows() {
        let mut app = logged_in_app();
        app.handle_key(ctrl('e'));
        app.previews.insert(
            app.preview_kind().endpoint(),
            PreviewState::Loaded(vec![json!({ "pm25": 12.5 })]),
        );

        app.handle_key(ctrl('d'));
        assert_eq!(app.state.screen, Screen::Dashboard);

        // Coming back must fetch again, not render the stale rows.
        app.handle_key(ctrl('e'));
        assert_eq!(
            app.previews.get(app.preview_kind().endpoint()),
            Some(&PreviewState::Loading)
        );
    }

    #[tokio::test]
    async fn a_new_upload_replaces_the_poller() {
        let mut app = logged_in_app();
        app.start_polling("primera".to_string());
        assert_eq!(app.poller.as_ref().map(|p| p.task_id()), Some("primera"));

        app.start_polling("segunda".to_string());
        assert_eq!(app.poller.as_ref().map(|p| p.task_id()), Some("segunda"));
        assert!(app.task.is_none());
    }
}
