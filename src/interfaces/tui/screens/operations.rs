use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::api::models::{SensorKind, TaskState};

use super::TuiApp;

impl TuiApp {
    pub(super) fn render_operations(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(6),
            ])
            .split(area);

        let tabs = Tabs::new(SensorKind::ALL.iter().map(|k| k.label()))
            .select(self.upload_kind_idx % SensorKind::ALL.len())
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Tipo de sensor "),
            );
        f.render_widget(tabs, chunks[0]);

        let path = Paragraph::new(format!("{}█", self.upload_path)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Archivo CSV "),
        );
        f.render_widget(path, chunks[1]);

        let status_line = if self.uploading {
            Line::from(Span::styled(
                "Subiendo archivo...",
                Style::default().fg(Color::Yellow),
            ))
        } else if let Some(err) = &self.upload_error {
            Line::from(Span::styled(
                format!("✖ {}", err),
                Style::default().fg(Color::Red),
            ))
        } else {
            Line::from(Span::styled(
                "Enter para subir el archivo seleccionado.",
                Style::default().fg(Color::DarkGray),
            ))
        };
        let status = Paragraph::new(status_line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(status, chunks[2]);

        self.render_task_panel(f, chunks[3]);
    }

    fn render_task_panel(&self, f: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();

        match &self.task {
            None => {
                lines.push(Line::from(Span::styled(
                    "Sin tareas en curso.",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            Some(record) => {
                lines.push(Line::from(vec![
                    Span::styled("Tarea: ", Style::default().fg(Color::DarkGray)),
                    Span::raw(record.task_id.clone()),
                ]));
                let (state_label, color) = match record.state {
                    TaskState::Pending => ("Procesando...", Color::Yellow),
                    TaskState::Success => ("Completada", Color::Green),
                    TaskState::Failure => ("Fallida", Color::Red),
                    TaskState::FetchError => ("Sin respuesta del servidor", Color::Red),
                };
                lines.push(Line::from(vec![
                    Span::styled("Estado: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        state_label,
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                ]));
                if let Some(result) = &record.result {
                    lines.push(Line::from(vec![
                        Span::styled("Mensaje: ", Style::default().fg(Color::DarkGray)),
                        Span::styled(result.message.clone(), Style::default().fg(Color::Green)),
                    ]));
                    lines.push(Line::from(vec![
                        Span::styled("Colección: ", Style::default().fg(Color::DarkGray)),
                        Span::raw(result.collection.clone()),
                    ]));
                }
                if self.poller.is_some() {
                    lines.push(Line::from(Span::styled(
                        "Consultando estado cada 2 segundos...",
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
        }

        let panel = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Última carga "),
        );
        f.render_widget(panel, area);
    }
}
