// SRT file reading and writing
use super::SubtitleDocument;
use crate::error::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read a UTF-8 subtitle file. Invalid UTF-8 is reported as an IO error.
pub fn read_subtitles(path: &Path) -> Result<SubtitleDocument> {
    let text = fs::read_to_string(path)?;
    let document = SubtitleDocument::parse(&text);
    debug!("Read {} lines from {:?}", document.len(), path);
    Ok(document)
}

/// Write every line as stored, replacing any existing file.
pub fn write_subtitles(path: &Path, document: &SubtitleDocument) -> Result<()> {
    fs::write(path, document.to_text())?;
    debug!("Wrote {} lines to {:?}", document.len(), path);
    Ok(())
}
