/// Stable identity of a transcript line. Ids are handed out in increasing
/// order and never reused within a session, so a renderer can key on them;
/// they carry no ordering meaning beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(u64);

impl LineId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Input,
    Output,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub id: LineId,
    pub kind: LineKind,
    pub text: String,
    /// Prompt exactly as it was displayed when the command was submitted.
    /// Only present on [`LineKind::Input`] lines.
    pub prompt: Option<String>,
}

/// Append-only log of what the user has seen, reset only by [`Transcript::clear`].
#[derive(Debug, Default)]
pub struct Transcript {
    lines: Vec<TranscriptLine>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: LineKind, text: String, prompt: Option<String>) -> LineId {
        let id = LineId(self.next_id);
        self.next_id += 1;
        self.lines.push(TranscriptLine {
            id,
            kind,
            text,
            prompt,
        });
        id
    }

    pub fn push_input(&mut self, prompt: impl Into<String>, text: impl Into<String>) -> LineId {
        self.push(LineKind::Input, text.into(), Some(prompt.into()))
    }

    pub fn push_output(&mut self, text: impl Into<String>) -> LineId {
        self.push(LineKind::Output, text.into(), None)
    }

    pub fn push_error(&mut self, text: impl Into<String>) -> LineId {
        self.push(LineKind::Error, text.into(), None)
    }

    /// Drop every line at once. Ids keep counting so keys stay unique.
    pub fn clear(&mut self) {
        self.lines = Vec::new();
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn last(&self) -> Option<&TranscriptLine> {
        self.lines.last()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
