use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
};

use crate::data::sensors;

use super::dashboard::bounds_of;
use super::{TuiApp, status_color};

impl TuiApp {
    pub(super) fn render_reports(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Min(6),
            ])
            .split(area);

        let model_label = self
            .report_model
            .map(|m| m.as_str())
            .unwrap_or("Todos los modelos");
        let filters = Paragraph::new(Line::from(vec![
            Span::styled("Rango: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                self.report_range.label(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Modelo: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                model_label,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(match &self.notice {
                Some(n) => format!("    ✔ {}", n),
                None => String::new(),
            }),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Filtros "),
        );
        f.render_widget(filters, chunks[0]);

        let counts = sensors::status_counts(self.report_sensors().into_iter());
        let summary = Paragraph::new(Line::from(vec![
            Span::raw(format!("Sensores: {}    ", counts.total)),
            Span::styled(
                format!("Normal: {}    ", counts.normal),
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                format!("Advertencia: {}    ", counts.warning),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!("Crítico: {}", counts.critical),
                Style::default().fg(Color::Red),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Resumen "),
        );
        f.render_widget(summary, chunks[1]);

        self.render_report_chart(f, chunks[2]);
        self.render_report_table(f, chunks[3]);
    }

    fn render_report_chart(&self, f: &mut Frame, area: Rect) {
        let co2: Vec<(f64, f64)> = self
            .report_samples
            .iter()
            .enumerate()
            .map(|(i, s)| (i as f64, s.co2))
            .collect();
        let ruido: Vec<(f64, f64)> = self
            .report_samples
            .iter()
            .enumerate()
            .map(|(i, s)| (i as f64, s.ruido))
            .collect();

        let all: Vec<(f64, f64)> = co2.iter().chain(ruido.iter()).copied().collect();
        let (y_min, y_max) = bounds_of(&all);

        let datasets = vec![
            Dataset::default()
                .name("CO₂ (ppm)")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&co2),
            Dataset::default()
                .name("Ruido (dB)")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Magenta))
                .data(&ruido),
        ];

        let first = self
            .report_samples
            .first()
            .map(|s| s.label.clone())
            .unwrap_or_default();
        let last = self
            .report_samples
            .last()
            .map(|s| s.label.clone())
            .unwrap_or_default();

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(format!(" Tendencia · {} ", self.report_range.label())),
            )
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([0.0, self.report_samples.len().saturating_sub(1).max(1) as f64])
                    .labels([first, last]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([y_min, y_max])
                    .labels([format!("{:.0}", y_min), format!("{:.0}", y_max)]),
            );
        f.render_widget(chart, area);
    }

    fn render_report_table(&self, f: &mut Frame, area: Rect) {
        let header = Row::new(["Sensor", "Modelo", "Ubicación", "Valor", "Estado"])
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );

        let rows: Vec<Row> = self
            .report_sensors()
            .into_iter()
            .map(|s| {
                Row::new(vec![
                    Cell::from(s.name.clone()),
                    Cell::from(s.model.as_str()),
                    Cell::from(s.location.clone()),
                    Cell::from(format!("{} {}", s.current_value, s.unit)),
                    Cell::from(Span::styled(
                        s.status.label(),
                        Style::default().fg(status_color(s.status)),
                    )),
                ])
            })
            .collect();

        let widths = [
            Constraint::Percentage(25),
            Constraint::Percentage(10),
            Constraint::Percentage(35),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
        ];
        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Detalle por sensor "),
        );
        f.render_widget(table, area);
    }
}
