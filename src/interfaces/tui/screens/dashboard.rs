use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Tabs},
};

use crate::data::sensors;

use super::super::CategoryFilter;
use super::TuiApp;

impl TuiApp {
    pub(super) fn render_dashboard(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(8),
            ])
            .split(area);

        let selected = CategoryFilter::ORDER
            .iter()
            .position(|c| *c == self.dash_filter)
            .unwrap_or(0);
        let tabs = Tabs::new(CategoryFilter::ORDER.iter().map(|c| c.label()))
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
                    .title(" Categoría "),
            );
        f.render_widget(tabs, chunks[0]);

        self.render_kpi_row(f, chunks[1]);
        self.render_dashboard_chart(f, chunks[2]);
    }

    fn render_kpi_row(&self, f: &mut Frame, area: Rect) {
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(area);

        let kpis = [
            ("Nivel de Agua", "m", Color::Blue),
            ("Calidad del Aire", "ppm", Color::Cyan),
            ("Ruido", "dB", Color::Magenta),
            ("Temperatura", "°C", Color::Yellow),
        ];

        for (i, (title, unit, color)) in kpis.iter().enumerate() {
            let value = sensors::unit_average(&self.sensors, unit);
            let lines = vec![
                Line::from(Span::styled(
                    format!("{} {}", value, unit),
                    Style::default().fg(*color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "promedio actual",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let card = Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(format!(" {} ", title)),
            );
            f.render_widget(card, cards[i]);
        }
    }

    fn render_dashboard_chart(&self, f: &mut Frame, area: Rect) {
        // All categories: one chart per parameter in a 2x2 grid. A specific
        // category gets its parameter full width.
        if self.dash_filter == CategoryFilter::All {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);
            let top = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[0]);
            let bottom = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[1]);

            self.render_parameter_chart(f, top[0], CategoryFilter::Water);
            self.render_parameter_chart(f, top[1], CategoryFilter::Air);
            self.render_parameter_chart(f, bottom[0], CategoryFilter::Sound);
            self.render_temperature_chart(f, bottom[1]);
        } else {
            self.render_parameter_chart(f, area, self.dash_filter);
        }
    }

    fn render_parameter_chart(&self, f: &mut Frame, area: Rect, filter: CategoryFilter) {
        let (title, unit, color): (&str, &str, Color) = match filter {
            CategoryFilter::Air => ("CO₂ (24h)", "ppm", Color::Cyan),
            CategoryFilter::Water => ("Nivel de Agua (24h)", "m", Color::Blue),
            CategoryFilter::Sound => ("Ruido (24h)", "dB", Color::Magenta),
            CategoryFilter::All => ("Temperatura (24h)", "°C", Color::Yellow),
        };
        let data: Vec<(f64, f64)> = self
            .hourly
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let v = match filter {
                    CategoryFilter::Air => s.co2,
                    CategoryFilter::Water => s.agua,
                    CategoryFilter::Sound => s.ruido,
                    CategoryFilter::All => s.temperatura,
                };
                (i as f64, v)
            })
            .collect();
        render_series(f, area, title, unit, color, &data);
    }

    fn render_temperature_chart(&self, f: &mut Frame, area: Rect) {
        let data: Vec<(f64, f64)> = self
            .hourly
            .iter()
            .enumerate()
            .map(|(i, s)| (i as f64, s.temperatura))
            .collect();
        render_series(f, area, "Temperatura (24h)", "°C", Color::Yellow, &data);
    }
}

fn render_series(
    f: &mut Frame,
    area: Rect,
    title: &str,
    unit: &str,
    color: Color,
    data: &[(f64, f64)],
) {
    let (y_min, y_max) = bounds_of(data);

    let dataset = Dataset::default()
        .name(unit)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(data);

    let x_len = data.len().saturating_sub(1).max(1) as f64;
    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {} ", title)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_len])
                .labels(["00:00", "12:00", "23:00"]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([y_min, y_max])
                .labels([format!("{:.0}", y_min), format!("{:.0}", y_max)]),
        );
    f.render_widget(chart, area);
}

/// Y bounds with a small margin so a flat series still renders visibly.
pub(super) fn bounds_of(data: &[(f64, f64)]) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for (_, v) in data {
        min = min.min(*v);
        max = max.max(*v);
    }
    if data.is_empty() {
        return (0.0, 1.0);
    }
    let margin = ((max - min) * 0.1).max(0.5);
    (min - margin, max + margin)
}
