use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Widget},
};

use crate::session::SessionSummary;

const BAR_LEN: usize = 40;
/// WPM that fills the speed bar
const BAR_MAX_WPM: f64 = 150.0;

/// Rank awarded from speed weighted by accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Legendary,
    SpeedDemon,
    SwiftTyper,
    SteadyHands,
    WarmingUp,
    Beginner,
}

impl Rank {
    pub fn from_score(wpm: f64, accuracy: f64) -> Self {
        let score = wpm * (accuracy / 100.0);
        if score >= 100.0 {
            Rank::Legendary
        } else if score >= 70.0 {
            Rank::SpeedDemon
        } else if score >= 50.0 {
            Rank::SwiftTyper
        } else if score >= 30.0 {
            Rank::SteadyHands
        } else if score >= 15.0 {
            Rank::WarmingUp
        } else {
            Rank::Beginner
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rank::Legendary => "LEGENDARY",
            Rank::SpeedDemon => "SPEED DEMON",
            Rank::SwiftTyper => "SWIFT TYPER",
            Rank::SteadyHands => "STEADY HANDS",
            Rank::WarmingUp => "WARMING UP",
            Rank::Beginner => "BEGINNER",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Rank::Legendary => Color::LightMagenta,
            Rank::SpeedDemon => Color::LightRed,
            Rank::SwiftTyper => Color::LightYellow,
            Rank::SteadyHands => Color::LightGreen,
            Rank::WarmingUp => Color::LightCyan,
            Rank::Beginner => Color::White,
        }
    }
}

/// Accuracy colour shared with the stats dashboard
pub fn accuracy_color(accuracy: f64) -> Color {
    if accuracy >= 95.0 {
        Color::Green
    } else if accuracy >= 85.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// A `len` wide bar filled to `fraction` (clamped to 0..=1)
pub fn bar(fraction: f64, len: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * len as f64) as usize).min(len);
    format!("{}{}", "█".repeat(filled), "░".repeat(len - filled))
}

/// Final figures shown once a test ends
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsFrame {
    pub wpm: f64,
    pub accuracy: f64,
    pub chars_typed: usize,
    pub elapsed_secs: f64,
    pub time_limit_secs: u64,
}

impl From<&SessionSummary> for ResultsFrame {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            wpm: summary.wpm,
            accuracy: summary.accuracy,
            chars_typed: summary.chars_typed,
            elapsed_secs: summary.elapsed_secs,
            time_limit_secs: summary.time_limit_secs,
        }
    }
}

impl ResultsFrame {
    pub fn rank(&self) -> Rank {
        Rank::from_score(self.wpm, self.accuracy)
    }

    pub fn time_text(&self) -> String {
        if self.time_limit_secs > 0 {
            format!("{}s (timed)", self.time_limit_secs)
        } else {
            format!("{:.1}s", self.elapsed_secs)
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let rank = self.rank();
        let rank_style = Style::default().fg(rank.color());
        let banner = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let acc_style = Style::default().fg(accuracy_color(self.accuracy));

        vec![
            Line::from(""),
            Line::from(Span::styled("╔══════════════════════════════════════╗", banner)),
            Line::from(Span::styled("║         RACE COMPLETE!               ║", banner)),
            Line::from(Span::styled("╚══════════════════════════════════════╝", banner)),
            Line::from(""),
            Line::from(vec![
                Span::raw("Your Rank:  "),
                Span::styled(rank.label(), rank_style.add_modifier(Modifier::BOLD)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Speed       ", dim),
                Span::styled(format!("{:.0} WPM", self.wpm), bold),
            ]),
            Line::from(vec![
                Span::raw("            "),
                Span::styled(bar(self.wpm / BAR_MAX_WPM, BAR_LEN), rank_style),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Accuracy    ", dim),
                Span::styled(
                    format!("{:.1}%", self.accuracy),
                    acc_style.add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::raw("            "),
                Span::styled(bar(self.accuracy / 100.0, BAR_LEN), acc_style),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Characters  ", dim),
                Span::styled(self.chars_typed.to_string(), bold),
            ]),
            Line::from(vec![
                Span::styled("Time        ", dim),
                Span::styled(self.time_text(), bold),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to exit",
                Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
            )),
        ]
    }
}

impl Widget for &ResultsFrame {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rank = self.rank();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(rank.color()))
            .title("RESULTS")
            .padding(Padding::new(2, 2, 1, 1));

        Paragraph::new(self.lines())
            .block(block)
            .alignment(Alignment::Left)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Mode;

    fn frame(wpm: f64, accuracy: f64, time_limit_secs: u64) -> ResultsFrame {
        ResultsFrame {
            wpm,
            accuracy,
            chars_typed: 250,
            elapsed_secs: 47.26,
            time_limit_secs,
        }
    }

    #[test]
    fn test_rank_thresholds() {
        assert_eq!(Rank::from_score(120.0, 100.0), Rank::Legendary);
        assert_eq!(Rank::from_score(100.0, 80.0), Rank::SpeedDemon);
        assert_eq!(Rank::from_score(50.0, 100.0), Rank::SwiftTyper);
        assert_eq!(Rank::from_score(40.0, 90.0), Rank::SteadyHands);
        assert_eq!(Rank::from_score(20.0, 80.0), Rank::WarmingUp);
        assert_eq!(Rank::from_score(10.0, 100.0), Rank::Beginner);
        assert_eq!(Rank::from_score(0.0, 100.0), Rank::Beginner);
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0, 4), "░░░░");
        assert_eq!(bar(0.5, 4), "██░░");
        assert_eq!(bar(2.0, 4), "████");
        assert_eq!(bar(-1.0, 4), "░░░░");
    }

    #[test]
    fn test_accuracy_color() {
        assert_eq!(accuracy_color(99.0), Color::Green);
        assert_eq!(accuracy_color(90.0), Color::Yellow);
        assert_eq!(accuracy_color(50.0), Color::Red);
    }

    #[test]
    fn test_time_text() {
        assert_eq!(frame(40.0, 95.0, 0).time_text(), "47.3s");
        assert_eq!(frame(40.0, 95.0, 30).time_text(), "30s (timed)");
    }

    #[test]
    fn test_from_summary() {
        let summary = SessionSummary {
            wpm: 55.5,
            accuracy: 97.0,
            chars_typed: 120,
            elapsed_secs: 26.0,
            mode: Mode::Paragraph,
            time_limit_secs: 0,
        };
        let frame = ResultsFrame::from(&summary);
        assert_eq!(frame.wpm, 55.5);
        assert_eq!(frame.chars_typed, 120);
        assert_eq!(frame.rank(), Rank::SwiftTyper);
    }

    #[test]
    fn test_render_results() {
        let frame = frame(72.0, 98.5, 60);
        let area = Rect::new(0, 0, 80, 30);
        let mut buffer = Buffer::empty(area);
        (&frame).render(area, &mut buffer);

        let rendered = buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(rendered.contains("RESULTS"));
        assert!(rendered.contains("SPEED DEMON"));
        assert!(rendered.contains("72 WPM"));
        assert!(rendered.contains("98.5%"));
        assert!(rendered.contains("60s (timed)"));
        assert!(rendered.contains("Press any key to exit"));
    }
}
