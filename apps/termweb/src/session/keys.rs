/// Keys the session controller understands, already decoded from whatever
/// input surface produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    /// A block of text arriving at once (bracketed paste).
    Paste(String),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Enter,
    Up,
    Down,
    /// Ctrl+L.
    ClearScreen,
}
