use crate::Result;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use tracing::{debug, warn};

use super::schema::RawEntry;

/// Read every line of a transcript.
///
/// Invalid UTF-8 is replaced rather than rejected so that one damaged line
/// does not hide the rest of the file.
pub fn read_transcript(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect())
}

/// Open a transcript for streaming
pub fn open_transcript(path: &Path) -> Result<TranscriptLines<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(TranscriptLines::new(BufReader::new(file)))
}

/// Lines of a transcript from any reader. A read error ends the stream.
pub struct TranscriptLines<R> {
    lines: Lines<R>,
    done: bool,
}

impl<R: BufRead> TranscriptLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for TranscriptLines<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        match self.lines.next() {
            Some(Ok(line)) => Some(line),
            Some(Err(err)) => {
                warn!(error = %err, "transcript read stopped early");
                self.done = true;
                None
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// Decode lines into entries, dropping blank and malformed ones
pub(crate) fn decode_entries<I>(lines: I) -> impl Iterator<Item = RawEntry>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(idx, line)| decode_line(idx + 1, line.as_ref()))
}

fn decode_line(line_no: usize, line: &str) -> Option<RawEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<RawEntry>(line) {
        Ok(entry) => Some(entry),
        Err(err) => {
            debug!(line = line_no, error = %err, "skipping undecodable transcript line");
            None
        }
    }
}
