//! Line File
//!
//! Handles line-level reads and writes against a single file.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::SyncStrategy;
use crate::error::{Result, StoreError};

use super::reader::{self, LineIter, RawLines};

/// A text file addressed one line at a time
///
/// Holds only a validated path; every operation opens the file afresh, so a
/// `LineFile` is cheap to clone and safe to share between threads.
#[derive(Debug, Clone)]
pub struct LineFile {
    /// Path to the backing file (never empty)
    path: PathBuf,

    /// Whether writes are followed by fsync
    sync_strategy: SyncStrategy,
}

impl LineFile {
    /// Suffix of the scratch file used by positional rewrites
    const REWRITE_SUFFIX: &'static str = ".rewrite";

    /// Bind to a path. Fails with `InvalidArgument` if the path is empty.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(StoreError::invalid_argument("File's path cannot be empty."));
        }

        Ok(Self {
            path,
            sync_strategy: SyncStrategy::OsBuffered,
        })
    }

    /// Set the sync strategy used after appends and rewrites
    pub fn with_sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.sync_strategy = strategy;
        self
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Whole-file Operations
    // =========================================================================

    /// Check whether the file is present
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create an empty file. Fails with `AlreadyExists` if it is present.
    pub fn create(&self) -> Result<()> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(StoreError::AlreadyExists(self.path.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the file. Fails with `FileNotFound` if it is absent.
    pub fn remove(&self) -> Result<()> {
        fs::remove_file(&self.path).map_err(|e| self.map_not_found(e))
    }

    /// Truncate the file to zero length
    ///
    /// An absent file is left absent; creating it is the caller's job.
    pub fn clear(&self) -> Result<()> {
        match OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
        {
            Ok(file) => self.sync(&file),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Appending
    // =========================================================================

    /// Append one line, terminator included
    ///
    /// Fails with `InvalidArgument` if `text` contains a line terminator,
    /// since that would split it into several lines.
    pub fn append_line(&self, text: &str) -> Result<()> {
        Self::check_single_line(text)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // One write call so concurrent readers never see text without its newline
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');
        file.write_all(line.as_bytes())?;

        self.sync(&file)
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Stream the file's lines, first line first
    ///
    /// Bytes that are not valid UTF-8 come through as U+FFFD.
    pub fn lines(&self) -> Result<LineIter> {
        Ok(LineIter::new(self.open_for_read()?))
    }

    /// Read every line into memory
    pub fn read_all_lines(&self) -> Result<Vec<String>> {
        self.lines()?.collect()
    }

    /// Count the physical lines in the file
    pub fn line_count(&self) -> Result<usize> {
        let mut count = 0;
        for line in self.lines()? {
            line?;
            count += 1;
        }
        Ok(count)
    }

    /// Read the physically last line
    ///
    /// Returns `None` if the file is empty or absent. Reads backwards from the
    /// end of file, so cost is proportional to the last line, not the file.
    pub fn read_last_line(&self) -> Result<Option<String>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(reader::read_last_line(&mut file)?)
    }

    // =========================================================================
    // Positional Writes
    // =========================================================================

    /// Replace the line at a 1-based position
    ///
    /// Fails with `InvalidArgument` if `position < 1` or `text` spans several
    /// lines, and with `OutOfRange` if the file has fewer than `position` lines.
    pub fn replace_line(&self, text: &str, position: usize) -> Result<()> {
        Self::check_single_line(text)?;
        self.rewrite(position, |writer| writeln!(writer, "{}", text))
    }

    /// Remove the line at a 1-based position, shifting later lines up by one
    ///
    /// Same position contract as `replace_line`.
    pub fn remove_line(&self, position: usize) -> Result<()> {
        self.rewrite(position, |_writer| Ok(()))
    }

    /// Stream the file into a scratch file, letting `edit` decide what to
    /// write for the target line, then rename the scratch file into place.
    ///
    /// Other lines are copied byte for byte, undecodable ones included. On any
    /// failure the scratch file is discarded and the original is left untouched.
    fn rewrite<F>(&self, position: usize, mut edit: F) -> Result<()>
    where
        F: FnMut(&mut BufWriter<File>) -> io::Result<()>,
    {
        if position < 1 {
            return Err(StoreError::invalid_argument(format!(
                "Line position must be at least 1, got {}",
                position
            )));
        }

        let lines = RawLines::new(self.open_for_read()?);
        let scratch_path = self.rewrite_path();
        let mut writer = BufWriter::new(File::create(&scratch_path)?);

        let mut line_count = 0;
        let copied = (|| -> Result<()> {
            for line in lines {
                let line = line?;
                line_count += 1;
                if line_count == position {
                    edit(&mut writer)?;
                } else {
                    writer.write_all(&line)?;
                    writer.write_all(b"\n")?;
                }
            }
            writer.flush()?;
            Ok(())
        })();

        if let Err(e) = copied {
            let _ = fs::remove_file(&scratch_path);
            return Err(e);
        }

        if position > line_count {
            let _ = fs::remove_file(&scratch_path);
            return Err(StoreError::OutOfRange {
                position,
                line_count,
            });
        }

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        self.sync(&file)?;
        drop(file);

        if let Err(e) = fs::rename(&scratch_path, &self.path) {
            let _ = fs::remove_file(&scratch_path);
            return Err(e.into());
        }

        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn check_single_line(text: &str) -> Result<()> {
        if text.contains(['\n', '\r']) {
            return Err(StoreError::invalid_argument(
                "Line text cannot contain a line terminator.",
            ));
        }
        Ok(())
    }

    fn sync(&self, file: &File) -> Result<()> {
        if self.sync_strategy == SyncStrategy::EveryWrite {
            file.sync_all()?;
        }
        Ok(())
    }

    /// "invoices.jsonl" -> "invoices.jsonl.rewrite"
    fn rewrite_path(&self) -> PathBuf {
        let mut name: OsString = self.path.as_os_str().to_owned();
        name.push(Self::REWRITE_SUFFIX);
        PathBuf::from(name)
    }

    fn open_for_read(&self) -> Result<File> {
        File::open(&self.path).map_err(|e| self.map_not_found(e))
    }

    fn map_not_found(&self, err: io::Error) -> StoreError {
        if err.kind() == io::ErrorKind::NotFound {
            StoreError::FileNotFound(self.path.clone())
        } else {
            err.into()
        }
    }
}
