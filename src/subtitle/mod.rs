pub mod classify;
pub mod srt;

pub use classify::{classify, LineKind};
pub use srt::{read_subtitles, write_subtitles};

/// One raw line of a subtitle file, terminator included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleLine {
    raw: String,
}

impl SubtitleLine {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The line exactly as stored, terminator included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The line without its terminator.
    pub fn content(&self) -> &str {
        &self.raw[..self.raw.len() - self.terminator().len()]
    }

    /// `"\r\n"`, `"\n"`, or `""` for a final line with no newline.
    pub fn terminator(&self) -> &str {
        if self.raw.ends_with("\r\n") {
            "\r\n"
        } else if self.raw.ends_with('\n') {
            "\n"
        } else {
            ""
        }
    }

    pub fn kind(&self) -> LineKind {
        classify(&self.raw)
    }

    /// Replace the text while keeping the line's terminator.
    ///
    /// Line breaks inside `text` are folded into spaces so the line stays a
    /// single line on disk. A line that had no terminator gets `"\n"`.
    pub fn replace_text(&mut self, text: &str) {
        let terminator = match self.terminator() {
            "" => "\n",
            t => t,
        }
        .to_string();
        let folded = text
            .trim()
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        self.raw = folded + &terminator;
    }
}

/// An ordered, in-memory subtitle file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleDocument {
    lines: Vec<SubtitleLine>,
}

impl SubtitleDocument {
    /// Split text into lines the way the file is laid out, keeping terminators.
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(SubtitleLine::new).collect(),
        }
    }

    pub fn lines(&self) -> &[SubtitleLine] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [SubtitleLine] {
        &mut self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Dialogue lines joined with spaces, for language detection.
    pub fn dialogue_text(&self) -> String {
        self.lines
            .iter()
            .filter(|l| l.kind() == LineKind::Dialogue)
            .map(|l| l.content().trim())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn dialogue_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.kind() == LineKind::Dialogue)
            .count()
    }

    /// Serialize back to text, every line as stored.
    pub fn to_text(&self) -> String {
        self.lines.iter().map(SubtitleLine::raw).collect()
    }
}
