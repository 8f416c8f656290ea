use log::{debug, warn};

use crate::reader::Chunk;

/// Background for highlighted rows (light green).
pub const HIGHLIGHT_RGB: (u8, u8, u8) = (144, 238, 144);

/// Rows appended so far plus the column schema of the current session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DisplayTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// What a single `append_chunk` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendSummary {
    /// Absolute index of the first appended row.
    pub start_row: usize,
    pub appended: usize,
    /// Rows padded or truncated to fit the schema.
    pub reshaped: usize,
}

impl DisplayTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_schema(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Even absolute row indices are highlighted, whatever chunk they came from.
    pub fn is_highlighted(row: usize) -> bool {
        row % 2 == 0
    }

    /// Appends every row of `chunk` at the end of the table.
    ///
    /// The schema is taken from the first chunk of a session and never
    /// replaced afterwards. Rows whose width differs from the schema are
    /// padded with empty fields or truncated.
    pub fn append_chunk(&mut self, chunk: Chunk) -> AppendSummary {
        let start_row = self.rows.len();
        if chunk.is_empty() {
            return AppendSummary {
                start_row,
                appended: 0,
                reshaped: 0,
            };
        }

        if !self.has_schema() {
            self.columns = chunk.columns;
            debug!("column schema set: {:?}", self.columns);
        }

        let width = self.columns.len();
        let appended = chunk.rows.len();
        let mut reshaped = 0;
        self.rows.reserve(appended);
        for mut row in chunk.rows {
            if row.len() != width {
                reshaped += 1;
                row.resize(width, String::new());
            }
            self.rows.push(row);
        }

        if reshaped > 0 {
            warn!(
                "{} of {} rows starting at row {} did not match the {} column header",
                reshaped, appended, start_row, width
            );
        }
        debug!(
            "start_row={} appended={} columns={}",
            start_row, appended, width
        );

        AppendSummary {
            start_row,
            appended,
            reshaped,
        }
    }

    /// Drops all rows and the schema.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.columns.clear();
    }
}
