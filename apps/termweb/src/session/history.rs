/// Submitted commands plus a recall cursor.
///
/// The cursor is `None` while the user edits fresh input and otherwise
/// always indexes a recorded entry.
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `command`. Blank input is ignored; repeats are kept.
    pub fn record(&mut self, command: &str) {
        if command.trim().is_empty() {
            return;
        }
        self.entries.push(command.to_string());
    }

    /// Step towards older entries, stopping at the oldest one.
    /// Returns the entry now under the cursor, or `None` with no history.
    pub fn recall_previous(&mut self) -> Option<&str> {
        let last = self.entries.len().checked_sub(1)?;
        let index = match self.cursor {
            None => last,
            Some(cursor) => cursor.saturating_sub(1),
        };
        self.cursor = Some(index);
        Some(&self.entries[index])
    }

    /// Step towards newer entries. Walking past the newest entry drops back
    /// to fresh input.
    pub fn recall_next(&mut self) -> Recall<'_> {
        let Some(cursor) = self.cursor else {
            return Recall::Unchanged;
        };
        let next = cursor + 1;
        if next >= self.entries.len() {
            self.cursor = None;
            return Recall::Fresh;
        }
        self.cursor = Some(next);
        Recall::Entry(&self.entries[next])
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of [`HistoryBuffer::recall_next`].
#[derive(Debug, PartialEq, Eq)]
pub enum Recall<'a> {
    /// Not browsing; nothing changed.
    Unchanged,
    /// Moved onto a newer entry.
    Entry(&'a str),
    /// Left history; the caller should clear its buffer.
    Fresh,
}
