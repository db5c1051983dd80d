//! Per-line classification of subtitle text.

/// Marker separating start and end of a cue's time range.
pub const TIMING_MARKER: &str = "-->";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Cue number.
    Index,
    /// `00:00:01,000 --> 00:00:02,000`
    Timing,
    Blank,
    /// Text to translate.
    Dialogue,
}

impl LineKind {
    pub fn is_translatable(&self) -> bool {
        matches!(self, LineKind::Dialogue)
    }
}

/// Classify a single line. A leading byte-order mark is ignored.
pub fn classify(line: &str) -> LineKind {
    let trimmed = line.trim_start_matches('\u{feff}').trim();

    if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.chars().all(char::is_numeric) {
        LineKind::Index
    } else if trimmed.contains(TIMING_MARKER) {
        LineKind::Timing
    } else {
        LineKind::Dialogue
    }
}
