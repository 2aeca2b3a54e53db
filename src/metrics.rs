use std::time::Duration;

/// Characters that make up one "word" for WPM purposes
pub const CHARS_PER_WORD: f64 = 5.0;

/// Gross words per minute: `(chars / 5) / minutes`.
///
/// Returns `None` when no time has elapsed so callers can keep their previous
/// value instead of dividing by zero.
pub fn wpm(chars_typed: usize, elapsed: Duration) -> Option<f64> {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        Some((chars_typed as f64 / CHARS_PER_WORD) / (secs / 60.0))
    } else {
        None
    }
}

/// Percentage of typed characters that match the target at the same position.
///
/// Empty input is 100%. Positions past the end of the target count as misses.
pub fn accuracy(typed: &[char], target: &[char]) -> f64 {
    if typed.is_empty() {
        return 100.0;
    }

    let hits = typed
        .iter()
        .zip(target.iter())
        .filter(|(typed, expected)| typed == expected)
        .count();

    100.0 * hits as f64 / typed.len() as f64
}
