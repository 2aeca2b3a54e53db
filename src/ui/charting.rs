use itertools::{Itertools, MinMaxResult};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Rows in the history graph
pub const GRAPH_HEIGHT: usize = 8;

/// WPM axis bounds for the history graph: 10 below the slowest test (never
/// below zero) up to 10 above the fastest.
pub fn wpm_bounds(wpms: &[f64]) -> Option<(f64, f64)> {
    let (lo, hi) = match wpms.iter().copied().minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => return None,
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    Some(((lo - 10.0).max(0.0), hi + 10.0))
}

/// Number of filled rows (1..=height) for `value` on the `lo..hi` scale
pub fn bar_height(value: f64, lo: f64, hi: f64, height: usize) -> usize {
    let range = if hi - lo > 0.0 { hi - lo } else { 1.0 };
    let rows = ((value - lo) / range * height as f64).round();
    (rows.max(1.0) as usize).min(height)
}

/// Paired wpm (green) and accuracy (yellow) columns, one pair per test, with
/// the wpm scale on the left and the 0-100% accuracy scale on the right.
pub fn history_graph(wpms: &[f64], accuracies: &[f64], height: usize) -> Vec<Line<'static>> {
    let Some((lo, hi)) = wpm_bounds(wpms) else {
        return Vec::new();
    };
    let height = height.max(1);
    let n = wpms.len().min(accuracies.len());

    let wpm_rows: Vec<usize> = wpms[..n]
        .iter()
        .map(|&v| bar_height(v, lo, hi, height))
        .collect();
    let acc_rows: Vec<usize> = accuracies[..n]
        .iter()
        .map(|&v| bar_height(v, 0.0, 100.0, height))
        .collect();

    let dim = Style::default().add_modifier(Modifier::DIM);
    let green = Style::default().fg(Color::Green);
    let yellow = Style::default().fg(Color::Yellow);
    let labelled = |row: usize| row == height || row == 1 || row == height / 2;

    let mut lines = Vec::with_capacity(height + 2);
    for row in (1..=height).rev() {
        let mut spans = Vec::with_capacity(n * 3 + 4);

        if labelled(row) {
            let wpm_val = lo + (row as f64 / height as f64) * (hi - lo);
            spans.push(Span::styled(format!("{wpm_val:>4.0} "), green));
        } else {
            spans.push(Span::raw("     "));
        }
        spans.push(Span::styled("│", dim));

        for col in 0..n {
            spans.push(cell(wpm_rows[col] >= row, green));
            spans.push(cell(acc_rows[col] >= row, yellow));
            if col + 1 < n {
                spans.push(Span::raw(" "));
            }
        }

        spans.push(Span::styled("│", dim));
        if labelled(row) {
            let acc_val = (row as f64 / height as f64) * 100.0;
            spans.push(Span::styled(format!(" {acc_val:>3.0}%"), yellow));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(Span::styled(
        format!("     └{}┘", "─".repeat((n * 3).saturating_sub(1))),
        dim,
    )));
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("█ WPM", green.add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled("█ Accuracy", yellow.add_modifier(Modifier::BOLD)),
    ]));
    lines
}

fn cell(filled: bool, style: Style) -> Span<'static> {
    if filled {
        Span::styled("█", style)
    } else {
        Span::raw(" ")
    }
}
