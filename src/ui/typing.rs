use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::session::{Mode, Session};

/// Visible stand-in for a line break the user has to type
const NEWLINE_GLYPH: char = '↵';

/// How one character of the target is displayed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Wrong,
    Cursor,
    Pending,
}

pub fn char_state(idx: usize, target: &[char], typed: &[char]) -> CharState {
    match typed.get(idx) {
        Some(c) if Some(c) == target.get(idx) => CharState::Correct,
        Some(_) => CharState::Wrong,
        None if idx == typed.len() => CharState::Cursor,
        None => CharState::Pending,
    }
}

/// Target text broken into display rows
#[derive(Debug, Default, PartialEq)]
pub struct TextLayout {
    pub rows: Vec<Vec<(char, CharState)>>,
    pub cursor_row: usize,
}

/// Break the target into rows no wider than `width`, splitting at line breaks
/// and wherever a row runs out of room.
pub fn layout_text(target: &[char], typed: &[char], width: usize) -> TextLayout {
    let width = width.max(1);
    let mut rows: Vec<Vec<(char, CharState)>> = vec![Vec::new()];
    let mut row_width = 0;
    let mut cursor_row = None;

    for (idx, &c) in target.iter().enumerate() {
        let state = char_state(idx, target, typed);

        if c == '\n' {
            if matches!(state, CharState::Wrong | CharState::Cursor) {
                if let Some(row) = rows.last_mut() {
                    row.push((NEWLINE_GLYPH, state));
                }
            }
            if state == CharState::Cursor {
                cursor_row = Some(rows.len() - 1);
            }
            rows.push(Vec::new());
            row_width = 0;
            continue;
        }

        let glyph = if c == '\t' { ' ' } else { c };
        let glyph_width = glyph.width().unwrap_or(1).max(1);
        if row_width > 0 && row_width + glyph_width > width {
            rows.push(Vec::new());
            row_width = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push((glyph, state));
        }
        row_width += glyph_width;

        if state == CharState::Cursor {
            cursor_row = Some(rows.len() - 1);
        }
    }

    let cursor_row = cursor_row.unwrap_or(rows.len() - 1);
    TextLayout { rows, cursor_row }
}

/// First row to show so the cursor stays in the upper third of the view
pub fn scroll_offset(total_rows: usize, cursor_row: usize, height: usize) -> usize {
    if total_rows <= height || height == 0 {
        return 0;
    }
    cursor_row
        .saturating_sub(height / 3)
        .min(total_rows - height)
}

struct Palette {
    correct: Style,
    wrong: Style,
    cursor: Style,
    pending: Style,
}

impl Palette {
    fn for_mode(mode: Mode) -> Self {
        let wrong = Style::default().fg(Color::White).bg(Color::Red);
        let cursor = Style::default().add_modifier(Modifier::REVERSED);
        match mode {
            Mode::Logs => Self {
                correct: Style::default().fg(Color::Gray),
                wrong: Style::default().fg(Color::Red),
                cursor,
                pending: Style::default().fg(Color::DarkGray),
            },
            Mode::Shell => Self {
                correct: Style::default().fg(Color::White),
                wrong,
                cursor,
                pending: Style::default().add_modifier(Modifier::DIM),
            },
            Mode::Code | Mode::Paragraph | Mode::Line => Self {
                correct: Style::default().fg(Color::Green),
                wrong,
                cursor,
                pending: Style::default().add_modifier(Modifier::DIM),
            },
        }
    }

    fn style(&self, state: CharState) -> Style {
        match state {
            CharState::Correct => self.correct,
            CharState::Wrong => self.wrong,
            CharState::Cursor => self.cursor,
            CharState::Pending => self.pending,
        }
    }
}

/// Title and border colour of the frame around the text
fn chrome(mode: Mode) -> (&'static str, Color) {
    match mode {
        Mode::Code => ("vim: /src/backend/engine.py", Color::Blue),
        Mode::Logs => ("tail -f /var/log/syslog", Color::Green),
        Mode::Shell => ("user@server:~$", Color::Yellow),
        Mode::Paragraph => ("Type the Paragraph", Color::Cyan),
        Mode::Line => ("Type the Line", Color::Magenta),
    }
}

/// Everything needed to draw one frame of a running test
#[derive(Debug, Clone, Copy)]
pub struct LiveFrame<'a> {
    pub mode: Mode,
    pub target: &'a [char],
    pub typed: &'a [char],
    pub wpm: f64,
    pub accuracy: f64,
    pub time_remaining: Option<f64>,
}

impl<'a> LiveFrame<'a> {
    pub fn from_session(session: &'a Session, now: Instant) -> Self {
        Self {
            mode: session.mode(),
            target: session.target(),
            typed: session.typed(),
            wpm: session.wpm(),
            accuracy: session.accuracy(),
            time_remaining: session.time_remaining(now),
        }
    }

    fn timer_text(&self) -> String {
        match self.time_remaining {
            Some(left) if left > 0.0 => format!(" | Time: {left:.0}s"),
            _ => String::new(),
        }
    }

    /// Line and column of the cursor within the target, 1-based line
    fn cursor_position(&self) -> (usize, usize) {
        let line = self.typed.iter().filter(|&&c| c == '\n').count() + 1;
        let col = self
            .typed
            .iter()
            .rev()
            .take_while(|&&c| c != '\n')
            .count();
        (line, col)
    }

    pub fn status_text(&self) -> String {
        let timer = self.timer_text();
        match self.mode {
            Mode::Code => {
                let (line, col) = self.cursor_position();
                format!(
                    " NORMAL | main.py | python | WPM: {:3.0} | ACC: {:3.0}%{timer} | Ln {line}, Col {col} ",
                    self.wpm, self.accuracy
                )
            }
            Mode::Paragraph => format!(
                "WPM: {:.0} | ACC: {:.0}%{timer} | {}/{} chars",
                self.wpm,
                self.accuracy,
                self.typed.len(),
                self.target.len()
            ),
            Mode::Line | Mode::Logs | Mode::Shell => {
                format!("WPM: {:.0} | ACC: {:.0}%{timer}", self.wpm, self.accuracy)
            }
        }
    }
}

impl Widget for &LiveFrame<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, border) = chrome(self.mode);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(Span::styled(
                title,
                Style::default().fg(border).add_modifier(Modifier::BOLD),
            ))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
            .split(inner);

        let prompt = if self.mode == Mode::Shell { "$ " } else { "" };
        let text_width = (chunks[0].width as usize).saturating_sub(prompt.len());
        let layout = layout_text(self.target, self.typed, text_width);
        let height = chunks[0].height as usize;
        let offset = scroll_offset(layout.rows.len(), layout.cursor_row, height);

        let palette = Palette::for_mode(self.mode);
        let lines: Vec<Line> = layout
            .rows
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(row_idx, row)| {
                let mut spans = Vec::with_capacity(row.len() + 1);
                if !prompt.is_empty() {
                    let lead = if row_idx == 0 { prompt } else { "  " };
                    spans.push(Span::styled(
                        lead,
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ));
                }
                spans.extend(
                    row.iter()
                        .map(|&(c, state)| Span::styled(c.to_string(), palette.style(state))),
                );
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .alignment(if self.mode == Mode::Line {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .render(chunks[0], buf);

        let status_style = match self.mode {
            Mode::Code => Style::default()
                .fg(Color::Black)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            Mode::Paragraph => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            _ => Style::default().fg(border),
        };
        let status_alignment = match self.mode {
            Mode::Code => Alignment::Right,
            Mode::Paragraph => Alignment::Center,
            _ => Alignment::Left,
        };
        Paragraph::new(Span::styled(self.status_text(), status_style))
            .alignment(status_alignment)
            .render(chunks[1], buf);
    }
}
