//! Streaming CSV reader that hands out rows in fixed-size chunks.
//!
//! The header row is parsed when the reader is opened, so a file that cannot
//! be opened or has no columns fails before any chunk is requested. Each call
//! to [`ChunkedReader::next_chunk`] reads at most `chunk_size` records and
//! reports `None` once the input is exhausted.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::debug;

use crate::error::{Result, ViewerError};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// A batch of rows pulled from the source in one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Column names from the header row.
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct ChunkedReader<R> {
    inner: csv::Reader<R>,
    columns: Vec<String>,
    chunk_size: usize,
    record: StringRecord,
    rows_read: usize,
    exhausted: bool,
}

impl ChunkedReader<File> {
    /// Opens `path` and parses its header row.
    pub fn open(path: &Path, chunk_size: usize, delimiter: u8) -> Result<Self> {
        let file = File::open(path).map_err(|source| ViewerError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, chunk_size, delimiter)
    }
}

impl<R: Read> ChunkedReader<R> {
    pub fn from_reader(rdr: R, chunk_size: usize, delimiter: u8) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ViewerError::InvalidChunkSize);
        }

        // Ragged rows are reshaped by the table, not rejected here.
        let mut inner = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(rdr);

        let columns: Vec<String> = inner.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() {
            return Err(ViewerError::NoColumns);
        }

        Ok(ChunkedReader {
            inner,
            columns,
            chunk_size,
            record: StringRecord::new(),
            rows_read: 0,
            exhausted: false,
        })
    }

    /// Reads the next batch of up to `chunk_size` rows.
    ///
    /// Returns `Ok(None)` at end of input, and on every call after that. A
    /// parse error also ends the stream; rows already read into the failed
    /// batch are discarded.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut rows = Vec::new();
        while rows.len() < self.chunk_size {
            match self.inner.read_record(&mut self.record) {
                Ok(true) => rows.push(self.record.iter().map(str::to_string).collect()),
                Ok(false) => {
                    self.exhausted = true;
                    break;
                }
                Err(e) => {
                    self.exhausted = true;
                    return Err(e.into());
                }
            }
        }

        if rows.is_empty() {
            debug!("reader exhausted after {} rows", self.rows_read);
            return Ok(None);
        }

        self.rows_read += rows.len();
        Ok(Some(Chunk {
            columns: self.columns.clone(),
            rows,
        }))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Total data rows handed out so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl<R: Read> Iterator for ChunkedReader<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}
