use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table, Widget},
};

use crate::history::{HistoryEntry, HistoryStats};
use crate::ui::charting::{history_graph, GRAPH_HEIGHT};
use crate::ui::results::accuracy_color;
use crate::util::format_duration;

const TITLE: &str = "TYPEMASTER STATS";

/// Stats dashboard over the aggregated history
pub struct DashboardView<'a> {
    pub stats: &'a HistoryStats,
}

impl<'a> DashboardView<'a> {
    pub fn new(stats: &'a HistoryStats) -> Self {
        Self { stats }
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Time column of the recent tests table: the limit for timed tests, the
/// elapsed time otherwise
pub fn entry_time(entry: &HistoryEntry) -> String {
    if entry.time_limit > 0 {
        format!("{}s", entry.time_limit)
    } else {
        format!("{:.0}s", entry.elapsed)
    }
}

/// Pure presenter for one row of the recent tests table
pub fn present_row(entry: &HistoryEntry) -> Row<'static> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    Row::new(vec![
        Cell::from(entry.timestamp.format("%b %d %H:%M").to_string()).style(dim),
        Cell::from(format!("{:.0}", entry.wpm)).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(format!("{:.0}%", entry.accuracy))
            .style(Style::default().fg(accuracy_color(entry.accuracy))),
        Cell::from(entry.mode.to_string()).style(dim.fg(Color::Cyan)),
        Cell::from(entry_time(entry)).style(dim),
    ])
}

fn overview(stats: &HistoryStats) -> Table<'static> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let row = |a: &'static str, av: String, b: &'static str, bv: String| {
        Row::new(vec![
            Cell::from(a).style(dim),
            Cell::from(av).style(value),
            Cell::from(b).style(dim),
            Cell::from(bv).style(value),
        ])
    };

    let rows = vec![
        row(
            "Tests Taken",
            stats.tests.to_string(),
            "Total Chars",
            group_thousands(stats.total_chars),
        ),
        row("Total Time", format_duration(stats.total_secs), "", String::new()),
        row(
            "Avg WPM",
            format!("{:.0}", stats.avg_wpm),
            "Best WPM",
            format!("{:.0}", stats.best_wpm),
        ),
        row(
            "Avg Acc",
            format!("{:.1}%", stats.avg_accuracy),
            "Best Acc",
            format!("{:.1}%", stats.best_accuracy),
        ),
    ];

    Table::new(rows, [Constraint::Ratio(1, 4); 4])
        .column_spacing(2)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title("Overview"),
        )
}

fn recent_table(stats: &HistoryStats) -> Table<'static> {
    let header = Row::new(vec!["Date", "WPM", "Acc", "Mode", "Time"])
        .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
    Table::new(
        stats.recent.iter().map(present_row),
        [
            Constraint::Length(14),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .column_spacing(2)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Recent Tests"),
    )
}

fn outer_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightCyan))
        .title(TITLE)
        .padding(Padding::new(2, 2, 1, 1))
}

fn footer(text: &'static str) -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
}

fn render_empty(area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No stats yet!",
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Take your first test to start tracking."),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to go back",
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(outer_block())
        .render(area, buf);
}

impl Widget for &DashboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let stats = self.stats;
        if stats.is_empty() {
            render_empty(area, buf);
            return;
        }

        let block = outer_block();
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),                      // Overview
                Constraint::Length(GRAPH_HEIGHT as u16 + 4), // History graph
                Constraint::Min(3),                         // Recent tests
                Constraint::Length(1),                      // Footer
            ])
            .split(inner);

        Widget::render(overview(stats), chunks[0], buf);

        Paragraph::new(history_graph(
            &stats.wpm_series,
            &stats.accuracy_series,
            GRAPH_HEIGHT,
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().add_modifier(Modifier::DIM))
                .title("History"),
        )
        .render(chunks[1], buf);

        Widget::render(recent_table(stats), chunks[2], buf);
        footer("Press any key to go back").render(chunks[3], buf);
    }
}
