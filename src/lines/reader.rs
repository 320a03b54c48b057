//! Line readers
//!
//! Forward streaming iteration and a chunked reverse read of the last line.
//!
//! Lines are split on raw bytes. A line that is not valid UTF-8 (for example a
//! write torn inside a multibyte character) still counts as a line; the text
//! views replace the bad bytes with U+FFFD, and positional rewrites copy the
//! original bytes through untouched.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

use crate::error::Result;

/// Chunk size for reading backwards from the end of file
const REVERSE_CHUNK_SIZE: u64 = 4096;

/// Streaming iterator over the raw bytes of each line, terminator stripped
pub(super) struct RawLines {
    reader: BufReader<File>,
}

impl RawLines {
    pub(super) fn new(file: File) -> Self {
        Self {
            reader: BufReader::new(file),
        }
    }
}

impl Iterator for RawLines {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => {
                let len = strip_terminator(&line).len();
                line.truncate(len);
                Some(Ok(line))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Streaming iterator over the lines of a file, first line first
///
/// Line terminators (`\n` or `\r\n`) are stripped. Each call to
/// `LineFile::lines` opens a fresh iterator, so a scan can be restarted.
pub struct LineIter {
    inner: RawLines,
}

impl LineIter {
    pub(super) fn new(file: File) -> Self {
        Self {
            inner: RawLines::new(file),
        }
    }
}

impl Iterator for LineIter {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|line| line.map(|bytes| to_text(&bytes)).map_err(Into::into))
    }
}

/// Read the physically last line of an open file without loading all of it
///
/// Returns `None` for an empty file. A single trailing terminator is ignored,
/// so `"a\nb\n"` and `"a\nb"` both yield `"b"`.
pub(super) fn read_last_line(file: &mut File) -> io::Result<Option<String>> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(None);
    }

    let mut pos = len;
    let mut tail: Vec<u8> = Vec::new();

    loop {
        let chunk_len = REVERSE_CHUNK_SIZE.min(pos);
        pos -= chunk_len;

        file.seek(SeekFrom::Start(pos))?;
        let mut chunk = vec![0u8; chunk_len as usize];
        file.read_exact(&mut chunk)?;
        chunk.extend_from_slice(&tail);
        tail = chunk;

        let content = strip_terminator(&tail);
        if let Some(idx) = content.iter().rposition(|&b| b == b'\n') {
            return Ok(Some(to_text(&content[idx + 1..])));
        }

        if pos == 0 {
            return Ok(Some(to_text(content)));
        }
    }
}

/// Drop one trailing `\n` (or `\r\n`) from the end of the buffer
fn strip_terminator(bytes: &[u8]) -> &[u8] {
    match bytes.strip_suffix(b"\n") {
        Some(bytes) => bytes.strip_suffix(b"\r").unwrap_or(bytes),
        None => bytes,
    }
}

fn to_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
