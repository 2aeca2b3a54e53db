/// Ctrl+C as delivered by a terminal in raw mode
pub const ETX: char = '\x03';
pub const ESC: char = '\x1b';
pub const DEL: char = '\x7f';
pub const BS: char = '\x08';
pub const CR: char = '\r';
pub const LF: char = '\n';

/// What a single raw character means to a typing session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Leave the session without results
    Cancel,
    /// Remove the last typed character
    Erase,
    /// Append a character to the typed text
    Insert(char),
}

/// Classify a raw character. Carriage return is normalized to newline so the
/// Enter key matches line breaks in the target text.
pub fn classify(c: char) -> KeyAction {
    match c {
        ETX | ESC => KeyAction::Cancel,
        DEL | BS => KeyAction::Erase,
        CR => KeyAction::Insert(LF),
        other => KeyAction::Insert(other),
    }
}
