use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Widget},
};

/// A numbered list of choices with a heading and a key hint underneath
#[derive(Debug, Clone, PartialEq)]
pub struct MenuView<'a> {
    /// Draw the large boxed title instead of the plain one
    pub banner: bool,
    pub prompt: Option<&'a str>,
    pub options: Vec<(char, &'a str)>,
    /// What ESC does on this menu, e.g. "quit" or "go back"
    pub escape_action: &'a str,
}

impl MenuView<'_> {
    fn lines(&self) -> Vec<Line<'static>> {
        let cyan = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let key = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);

        let mut lines = Vec::new();
        if self.banner {
            lines.push(Line::from(Span::styled("╔══════════════════════════════════════╗", cyan)));
            lines.push(Line::from(Span::styled("║           TYPEMASTER                 ║", cyan)));
            lines.push(Line::from(Span::styled("╚══════════════════════════════════════╝", cyan)));
        } else {
            lines.push(Line::from(Span::styled("TYPEMASTER", cyan)));
        }
        lines.push(Line::from(""));

        if let Some(prompt) = self.prompt {
            lines.push(Line::from(prompt.to_string()));
            lines.push(Line::from(""));
        }

        for (k, label) in &self.options {
            lines.push(Line::from(vec![
                Span::styled(format!("  [{k}] "), key),
                Span::raw(format!("{label:<34}")),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Press ", dim),
            Span::styled("ESC", dim.add_modifier(Modifier::BOLD)),
            Span::styled(format!(" to {}", self.escape_action), dim),
        ]));
        lines
    }
}

impl Widget for &MenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::new(4, 4, 1, 1));

        Paragraph::new(self.lines())
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
