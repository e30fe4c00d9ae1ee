use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph, Tabs},
};

use chrono::Utc;

use crate::data::sensors;

use super::super::StatusFilter;
use super::dashboard::bounds_of;
use super::{TuiApp, status_color};

impl TuiApp {
    pub(super) fn render_sensor_list(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(4),
            ])
            .split(area);

        let search = Paragraph::new(format!("{}█", self.search)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Buscar por nombre, modelo o ubicación "),
        );
        f.render_widget(search, chunks[0]);

        let selected = StatusFilter::ORDER
            .iter()
            .position(|s| *s == self.status_filter)
            .unwrap_or(0);
        let tabs = Tabs::new(StatusFilter::ORDER.iter().map(|s| s.label()))
            .select(selected)
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
                    .title(" Estado "),
            );
        f.render_widget(tabs, chunks[1]);

        let visible = self.filtered_sensors();
        let mut lines: Vec<Line> = Vec::new();
        if visible.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No se encontraron sensores.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (i, sensor) in visible.iter().enumerate() {
            let selected = i == self.list_selected;
            let row_style = if selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(vec![
                Span::styled(if selected { " ▸ " } else { "   " }, row_style),
                Span::styled(format!("{:<24}", sensor.name), row_style),
                Span::styled(
                    format!("{:<8}", sensor.model.as_str()),
                    row_style.fg(Color::Cyan),
                ),
                Span::styled(format!("{:<28}", sensor.location), row_style),
                Span::styled(
                    format!("{:>7} {:<4}", sensor.current_value, sensor.unit),
                    row_style,
                ),
                Span::styled(
                    format!("  {}", sensor.status.label()),
                    row_style.fg(status_color(sensor.status)),
                ),
            ]));
        }

        let list = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" Sensores ({}) ", visible.len())),
        );
        f.render_widget(list, chunks[2]);
    }

    pub(super) fn render_sensor_detail(&self, f: &mut Frame, area: Rect) {
        let Some(sensor) = self.selected_sensor() else {
            let empty = Paragraph::new("Sensor no encontrado. Esc para volver.")
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(empty, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(8)])
            .split(area);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[0]);

        let now = Utc::now();
        let info = vec![
            Line::from(vec![
                Span::styled("Modelo: ", Style::default().fg(Color::DarkGray)),
                Span::styled(sensor.model.as_str(), Style::default().fg(Color::Cyan)),
            ]),
            Line::from(vec![
                Span::styled("Categoría: ", Style::default().fg(Color::DarkGray)),
                Span::raw(sensor.category.label()),
            ]),
            Line::from(vec![
                Span::styled("Ubicación: ", Style::default().fg(Color::DarkGray)),
                Span::raw(sensor.location.clone()),
            ]),
            Line::from(vec![
                Span::styled("Coordenadas: ", Style::default().fg(Color::DarkGray)),
                Span::raw(format!("{:.4}, {:.4}", sensor.lat, sensor.lng)),
            ]),
            Line::from(vec![
                Span::styled("Última lectura: ", Style::default().fg(Color::DarkGray)),
                Span::raw(sensors::relative_timestamp(sensor.last_reading, now)),
            ]),
            Line::from(vec![
                Span::styled("Valor actual: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{} {}", sensor.current_value, sensor.unit),
                    Style::default()
                        .fg(status_color(sensor.status))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Estado: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    sensor.status.label(),
                    Style::default().fg(status_color(sensor.status)),
                ),
            ]),
        ];
        let info_widget = Paragraph::new(info).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {} ", sensor.name)),
        );
        f.render_widget(info_widget, cols[0]);

        let battery = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Batería "),
            )
            .gauge_style(Style::default().fg(if sensor.battery < 30 {
                Color::Red
            } else {
                Color::Green
            }))
            .percent(u16::from(sensor.battery));
        f.render_widget(battery, cols[1]);

        self.render_detail_chart(f, chunks[1], sensor.unit);
    }

    fn render_detail_chart(&self, f: &mut Frame, area: Rect, unit: &str) {
        let readings = match &self.detail_readings {
            Some((id, readings))
                if Some(id.as_str()) == self.state.selected_sensor.as_deref() =>
            {
                readings.as_slice()
            }
            _ => &[],
        };

        let data: Vec<(f64, f64)> = readings
            .iter()
            .enumerate()
            .map(|(i, r)| (i as f64, r.value))
            .collect();

        let stats = sensors::series_stats(readings);
        let title = match stats {
            Some(s) => format!(
                " Últimas 24 horas · prom {} · máx {} · mín {} ",
                s.avg, s.max, s.min
            ),
            None => " Últimas 24 horas ".to_string(),
        };

        let (y_min, y_max) = bounds_of(&data);
        let dataset = Dataset::default()
            .name(unit.to_string())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&data);

        let chart = Chart::new(vec![dataset])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(title),
            )
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([0.0, data.len().saturating_sub(1).max(1) as f64])
                    .labels(["hace 24h", "hace 12h", "ahora"]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([y_min, y_max])
                    .labels([format!("{:.0}", y_min), format!("{:.0}", y_max)]),
            );
        f.render_widget(chart, area);
    }
}
