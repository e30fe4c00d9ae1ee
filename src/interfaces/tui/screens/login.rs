use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{TuiApp, centered_rect};

impl TuiApp {
    pub(super) fn render_login(&self, f: &mut Frame) {
        let area = centered_rect(50, 50, f.area());

        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" EcoVista · Iniciar Sesión ");
        f.render_widget(outer, area);

        let inner = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(area);

        let tagline = Paragraph::new(Line::from(Span::styled(
            "Monitoreo ambiental municipal de Cochabamba",
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(tagline, inner[0]);

        self.render_field(f, inner[1], "Correo electrónico", &self.form.values[0], self.form.focus == 0, false);
        self.render_field(f, inner[2], "Contraseña", &self.form.values[1], self.form.focus == 1, true);

        let hints = Paragraph::new(Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" ingresar   "),
            Span::styled("Tab", Style::default().fg(Color::Cyan)),
            Span::raw(" cambiar campo   "),
            Span::styled("Ctrl+R", Style::default().fg(Color::Cyan)),
            Span::raw(" crear cuenta   "),
            Span::styled("Ctrl+C", Style::default().fg(Color::Cyan)),
            Span::raw(" salir"),
        ]))
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hints, inner[3]);
    }

    pub(super) fn render_field(
        &self,
        f: &mut Frame,
        area: ratatui::layout::Rect,
        label: &str,
        value: &str,
        focused: bool,
        masked: bool,
    ) {
        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let shown = if masked {
            "•".repeat(value.chars().count())
        } else {
            value.to_string()
        };
        let cursor = if focused { "█" } else { "" };
        let widget = Paragraph::new(format!("{}{}", shown, cursor))
            .style(Style::default().fg(Color::White).add_modifier(if focused {
                Modifier::BOLD
            } else {
                Modifier::empty()
            }))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!(" {} ", label)),
            );
        f.render_widget(widget, area);
    }
}
