mod alerts;
mod dashboard;
mod executive;
mod login;
mod operations;
mod register;
mod reports;
mod sensors;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::Screen;
use crate::data::sensors::SensorStatus;

use super::TuiApp;

impl TuiApp {
    pub(super) fn render(&self, f: &mut Frame) {
        if !self.state.logged_in() {
            match self.state.screen {
                Screen::Register => self.render_register(f),
                _ => self.render_login(f),
            }
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);

        match self.state.screen {
            Screen::Dashboard => self.render_dashboard(f, chunks[1]),
            Screen::Sensors => self.render_sensor_list(f, chunks[1]),
            Screen::SensorDetail => self.render_sensor_detail(f, chunks[1]),
            Screen::Reports => self.render_reports(f, chunks[1]),
            Screen::Operations => self.render_operations(f, chunks[1]),
            Screen::Executive => self.render_executive(f, chunks[1]),
            Screen::Login | Screen::Register => {}
        }

        self.render_footer(f, chunks[2]);

        if self.state.alerts_open {
            self.render_alerts(f);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let title = match self.state.screen {
            Screen::Dashboard => "Dashboard",
            Screen::Sensors => "Sensores",
            Screen::SensorDetail => "Detalle del Sensor",
            Screen::Reports => "Reportes",
            Screen::Operations => "Operaciones",
            Screen::Executive => "Vista Ejecutiva",
            Screen::Login | Screen::Register => "",
        };

        let user = self
            .state
            .session
            .as_ref()
            .map(|s| format!("{} · {}", s.name, s.role.label()))
            .unwrap_or_default();

        let alert_badge = format!("⚠ {}", self.alerts.len());

        let line = Line::from(vec![
            Span::styled(
                " EcoVista ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("· {} ", title),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                alert_badge,
                Style::default().fg(if self.alerts.is_empty() {
                    Color::DarkGray
                } else {
                    Color::Yellow
                }),
            ),
            Span::styled(format!("   {}", user), Style::default().fg(Color::DarkGray)),
        ]);

        let widget = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" GAMC Cochabamba · Monitoreo Ambiental "),
        );
        f.render_widget(widget, area);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let extra = match self.state.screen {
            Screen::Dashboard => "←/→ categoría",
            Screen::Sensors => "↑/↓ elegir · ←/→ estado · Enter detalle · escribe para buscar",
            Screen::SensorDetail => "Esc volver",
            Screen::Reports => "←/→ rango · ↑/↓ modelo · p PDF · c CSV",
            Screen::Operations => "←/→ tipo · Enter subir · escribe la ruta",
            Screen::Executive => "←/→ colección · Enter recargar",
            Screen::Login | Screen::Register => "",
        };
        let hints = format!(
            " ^D dashboard  ^S sensores  ^R reportes  ^O operaciones  ^E ejecutiva  ^A alertas  ^L salir  |  {}",
            extra
        );
        let widget = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
        f.render_widget(widget, area);
    }
}

pub(super) fn status_color(status: SensorStatus) -> Color {
    match status {
        SensorStatus::Normal => Color::Green,
        SensorStatus::Warning => Color::Yellow,
        SensorStatus::Critical => Color::Red,
    }
}

/// Centered sub-rectangle, sized as a percentage of the parent.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
