//! Trace Reader - parses text traces into [`TraceRecord`]s.
//!
//! The [`TraceReader`] handles:
//! - Line-by-line parsing with 1-based line numbers in errors
//! - Skipping blank lines
//! - A running CRC32 digest of every record it yields

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::trace::TraceRecord;

/// Streams [`TraceRecord`]s out of a text trace.
///
/// # Digest
/// Every yielded record is fed to a CRC32 hasher, so two replays can be
/// checked to have consumed the same access stream via
/// [`checksum`](Self::checksum) and [`records`](Self::records).
///
/// # Example
/// ```
/// use epochsim::trace::{TraceReader, TraceRecord};
///
/// let text = "0 64 10\n\n1 128 3\n";
/// let mut reader = TraceReader::new(text.as_bytes());
///
/// assert_eq!(reader.next().unwrap().unwrap(), TraceRecord::write(64, 10));
/// assert_eq!(reader.next().unwrap().unwrap(), TraceRecord::read(128, 3));
/// assert!(reader.next().is_none());
/// assert_eq!(reader.records(), 2);
/// ```
pub struct TraceReader<R> {
    inner: R,
    buf: String,
    /// 1-based number of the last line read.
    line: u64,
    records: u64,
    hasher: crc32fast::Hasher,
    /// Set after an error or end of input; the iterator is fused.
    done: bool,
}

impl TraceReader<BufReader<File>> {
    /// Open a trace file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        debug!(target: "epochsim::trace", path = %path.as_ref().display(), "opened trace");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TraceReader<R> {
    /// Wrap any buffered reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: String::new(),
            line: 0,
            records: 0,
            hasher: crc32fast::Hasher::new(),
            done: false,
        }
    }

    /// Number of records yielded so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Number of lines consumed so far, blank ones included.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// CRC32 over every record yielded so far.
    pub fn checksum(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Read the next non-blank line as a record.
    fn read_record(&mut self) -> Result<Option<TraceRecord>> {
        loop {
            self.buf.clear();
            if self.inner.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }

            let record = TraceRecord::parse(text).map_err(|reason| Error::MalformedRecord {
                line: self.line,
                reason,
            })?;
            self.hasher.update(&record.digest_bytes());
            self.records += 1;
            return Ok(Some(record));
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
