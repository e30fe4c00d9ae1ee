use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::Role;

use super::{TuiApp, centered_rect};

impl TuiApp {
    pub(super) fn render_register(&self, f: &mut Frame) {
        let area = centered_rect(50, 70, f.area());

        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" EcoVista · Crear Cuenta ");
        f.render_widget(outer, area);

        let inner = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(area);

        self.render_field(f, inner[0], "Nombre completo", &self.form.values[0], self.form.focus == 0, false);
        self.render_field(f, inner[1], "Correo electrónico", &self.form.values[1], self.form.focus == 1, false);
        self.render_field(f, inner[2], "Contraseña", &self.form.values[2], self.form.focus == 2, true);

        // Role selector, focused as the fourth "field".
        let focused = self.form.focus == 3;
        let mut spans: Vec<Span> = Vec::new();
        for (i, role) in Role::ALL.iter().enumerate() {
            let style = if i == self.form.role_idx {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(format!(" {} ", role.label()), style));
            spans.push(Span::raw("  "));
        }
        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let roles = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" Rol "),
        );
        f.render_widget(roles, inner[3]);

        let hints = Paragraph::new(Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" registrarse   "),
            Span::styled("Tab", Style::default().fg(Color::Cyan)),
            Span::raw(" cambiar campo   "),
            Span::styled("←/→", Style::default().fg(Color::Cyan)),
            Span::raw(" rol   "),
            Span::styled("Esc", Style::default().fg(Color::Cyan)),
            Span::raw(" volver"),
        ]))
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hints, inner[4]);
    }
}
