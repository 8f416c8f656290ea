//! The viewer window's state, independent of any widget toolkit.
//!
//! Front ends feed it the three triggers it reacts to (open, close and
//! scrollbar movement) and render [`Viewer::table`]. Everything runs on the
//! caller's thread; a chunk read blocks until it is done.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{error, info};

use crate::config::ViewerConfig;
use crate::error::Result;
use crate::reader::ChunkedReader;
use crate::scroll::{ScrollEvents, ScrollTrigger};
use crate::table::DisplayTable;

/// Asks the user for a CSV file. `None` means the user cancelled.
pub trait FilePicker {
    fn pick_csv(&mut self, default_dir: Option<&Path>) -> Option<PathBuf>;
}

/// Picker for front ends without a file dialog.
pub struct NoDialog;

impl FilePicker for NoDialog {
    fn pick_csv(&mut self, _default_dir: Option<&Path>) -> Option<PathBuf> {
        None
    }
}

pub struct Viewer {
    /// Contents of the path text field.
    pub path_input: String,
    config: ViewerConfig,
    reader: Option<ChunkedReader<File>>,
    table: DisplayTable,
    trigger: ScrollTrigger,
    source: Option<PathBuf>,
    loaded_at: Option<DateTime<Local>>,
    error: Option<String>,
    status: String,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        let trigger = ScrollTrigger::new(config.trigger_fraction);
        Viewer {
            path_input: String::new(),
            config,
            reader: None,
            table: DisplayTable::new(),
            trigger,
            source: None,
            loaded_at: None,
            error: None,
            status: "Ready".to_string(),
        }
    }

    /// Open-file trigger: uses the path field, or the picker when the field
    /// is blank. Failures end up in [`Viewer::error_message`].
    ///
    /// Returns the number of rows shown from the first chunk, or `None` when
    /// nothing was loaded. Ignored while an error dialog is pending.
    pub fn load(&mut self, picker: &mut dyn FilePicker) -> Option<usize> {
        if self.error.is_some() {
            return None;
        }
        let typed = self.path_input.trim();
        let path = if typed.is_empty() {
            match picker.pick_csv(self.config.default_dir.as_deref()) {
                Some(path) => path,
                None => {
                    self.status = "No file selected".to_string();
                    return None;
                }
            }
        } else {
            PathBuf::from(typed)
        };

        match self.open_path(&path) {
            Ok(rows) => Some(rows),
            Err(e) => {
                error!("failed to load {}: {}", path.display(), e);
                self.error = Some(format!("Error loading CSV: {}", e));
                self.status = "Load failed".to_string();
                None
            }
        }
    }

    /// Opens `path` and shows its first chunk, replacing the current session.
    ///
    /// Nothing is replaced unless both the open and the first read succeed.
    pub fn open_path(&mut self, path: &Path) -> Result<usize> {
        let mut reader = ChunkedReader::open(path, self.config.chunk_size, self.config.delimiter)?;
        let first = reader.next_chunk()?;

        self.close();
        info!(
            "opened {} ({} columns, chunk size {})",
            path.display(),
            reader.columns().len(),
            reader.chunk_size()
        );
        self.reader = Some(reader);
        self.source = Some(path.to_path_buf());
        self.loaded_at = Some(Local::now());

        let appended = match first {
            Some(chunk) => self.table.append_chunk(chunk).appended,
            None => 0,
        };
        self.status = format!("Loaded {} rows from {}", appended, self.source_name());
        Ok(appended)
    }

    /// Clears the table and drops the reader.
    pub fn close(&mut self) {
        if let Some(path) = self.source.take() {
            info!("closed {}", path.display());
        }
        self.table.clear();
        self.reader = None;
        self.loaded_at = None;
        self.status = "Ready".to_string();
    }

    /// Appends the next chunk from the open reader. Returns the number of rows
    /// appended; `0` when no file is open or the file is exhausted.
    pub fn load_next_chunk(&mut self) -> Result<usize> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(0);
        };

        match reader.next_chunk() {
            Ok(Some(chunk)) => {
                let summary = self.table.append_chunk(chunk);
                self.status = format!(
                    "Loaded {} rows from {}",
                    self.table.row_count(),
                    self.source_name()
                );
                Ok(summary.appended)
            }
            Ok(None) => {
                self.status = format!(
                    "End of file: {} rows from {}",
                    self.table.row_count(),
                    self.source_name()
                );
                Ok(0)
            }
            Err(e) => {
                // Keep what is already shown; the stream cannot continue.
                self.reader = None;
                Err(e)
            }
        }
    }

    pub fn on_scroll_range_changed(&mut self, min: i32, max: i32) {
        self.trigger.on_range_changed(min, max);
    }

    /// Loads the next chunk when `value` reaches the trigger threshold.
    /// Returns the number of rows appended.
    pub fn on_scroll_value_changed(&mut self, value: i32) -> usize {
        if !self.trigger.should_load(value) {
            return 0;
        }
        match self.load_next_chunk() {
            Ok(rows) => rows,
            Err(e) => {
                error!("failed to read next chunk: {}", e);
                self.error = Some(format!("Error loading CSV: {}", e));
                self.status = "Read failed".to_string();
                0
            }
        }
    }

    /// Sends a tracker's events in scrollbar order: range first, then value.
    pub fn apply_scroll(&mut self, events: ScrollEvents) -> usize {
        if let Some((min, max)) = events.range {
            self.on_scroll_range_changed(min, max);
        }
        match events.value {
            Some(value) => self.on_scroll_value_changed(value),
            None => 0,
        }
    }

    pub fn table(&self) -> &DisplayTable {
        &self.table
    }

    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Local>> {
        self.loaded_at
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Message for the modal error dialog, if one is pending.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn source_name(&self) -> String {
        self.source
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
