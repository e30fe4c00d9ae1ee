use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use chrono::Utc;

use crate::data::sensors::{self, AlertSeverity};

use super::{TuiApp, centered_rect};

impl TuiApp {
    /// Overlay panel listing the active alerts, newest first.
    pub(super) fn render_alerts(&self, f: &mut Frame) {
        let area = centered_rect(60, 60, f.area());
        f.render_widget(Clear, area);

        let now = Utc::now();
        let mut lines: Vec<Line> = Vec::new();

        if self.alerts.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No hay alertas activas.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for alert in &self.alerts {
            let (badge, color) = match alert.severity {
                AlertSeverity::Critical => ("CRÍTICO", Color::Red),
                AlertSeverity::Warning => ("ADVERTENCIA", Color::Yellow),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {:<12}", badge),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    alert.sensor.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", sensors::relative_timestamp(alert.timestamp, now)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                format!("   {}", alert.message),
                Style::default().fg(Color::White),
            )));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            " Enter ver reportes · Esc cerrar",
            Style::default().fg(Color::DarkGray),
        )));

        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(format!(" Alertas Activas ({}) ", self.alerts.len())),
            );
        f.render_widget(widget, area);
    }
}
