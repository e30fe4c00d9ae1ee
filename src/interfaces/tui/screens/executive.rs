use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
};

use crate::api::models::SensorKind;
use crate::data::preview::{PreviewState, columns_of, render_cell};

use super::TuiApp;

impl TuiApp {
    pub(super) fn render_executive(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(4)])
            .split(area);

        let tabs = Tabs::new(SensorKind::ALL.iter().map(|k| k.label()))
            .select(self.preview_idx % SensorKind::ALL.len())
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
                    .title(" Colección "),
            );
        f.render_widget(tabs, chunks[0]);

        let kind = self.preview_kind();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" Datos recientes · {} ", kind.label()));

        match self.previews.get(kind.endpoint()) {
            None | Some(PreviewState::Loading) => {
                let widget = Paragraph::new("Cargando datos...")
                    .style(Style::default().fg(Color::Yellow))
                    .block(block);
                f.render_widget(widget, chunks[1]);
            }
            Some(PreviewState::Failed(detail)) => {
                let widget = Paragraph::new(format!("✖ {}", detail))
                    .style(Style::default().fg(Color::Red))
                    .block(block);
                f.render_widget(widget, chunks[1]);
            }
            Some(PreviewState::Empty) => {
                let widget = Paragraph::new("No hay datos para mostrar.")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block);
                f.render_widget(widget, chunks[1]);
            }
            Some(PreviewState::Loaded(rows)) => {
                let columns = columns_of(rows);
                let header = Row::new(
                    columns
                        .iter()
                        .map(|c| Cell::from(c.clone()))
                        .collect::<Vec<_>>(),
                )
                .style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                );

                let body: Vec<Row> = rows
                    .iter()
                    .map(|row| {
                        Row::new(
                            columns
                                .iter()
                                .map(|col| {
                                    let text = render_cell(row, col);
                                    let style = if text == "N/A" {
                                        Style::default().fg(Color::DarkGray)
                                    } else {
                                        Style::default().fg(Color::White)
                                    };
                                    Cell::from(Span::styled(text, style))
                                })
                                .collect::<Vec<_>>(),
                        )
                    })
                    .collect();

                let share = (100 / columns.len().max(1)) as u16;
                let widths: Vec<Constraint> = columns
                    .iter()
                    .map(|_| Constraint::Percentage(share))
                    .collect();

                let table = Table::new(body, widths).header(header).block(block);
                f.render_widget(table, chunks[1]);
            }
        }
    }
}
