pub mod config;
pub mod error;
pub mod logger;
pub mod reader;
pub mod scroll;
pub mod table;
pub mod viewer;

// Terminal front end, exported so tests can drive it directly
#[cfg(feature = "cli_app")]
pub mod cli_app {
    use std::io::{self, BufRead, Write};
    use std::path::PathBuf;
    use std::time::Instant;

    use log::debug;

    use crate::config::ViewerConfig;
    use crate::scroll::ScrollTracker;
    use crate::table::DisplayTable;
    use crate::viewer::{NoDialog, Viewer};

    /// Rows shown per screen; also the step for `w` / `s`.
    pub const PAGE_ROWS: i32 = 10;
    const CELL_WIDTH: usize = 12;

    /// A viewer plus the terminal's scroll position.
    ///
    /// Paging is reported to the viewer through a [`ScrollTracker`]: the
    /// range is `[0, rows - PAGE_ROWS]` and the value is the top row.
    pub struct Pager {
        pub viewer: Viewer,
        pub top_row: i32,
        tracker: ScrollTracker,
    }

    impl Pager {
        pub fn new(viewer: Viewer) -> Self {
            Pager {
                viewer,
                top_row: 0,
                tracker: ScrollTracker::new(),
            }
        }

        pub fn scroll_max(&self) -> i32 {
            let rows = self.viewer.table().row_count().min(i32::MAX as usize) as i32;
            (rows - PAGE_ROWS).max(0)
        }

        /// Feeds scroll events to the viewer until the screen settles, the
        /// way a window would over successive repaints.
        pub fn sync(&mut self) {
            loop {
                let total = self.viewer.table().row_count();
                let top = self.top_row.max(0) as usize;
                let visible = total.saturating_sub(top).min(PAGE_ROWS as usize);
                let events = self.tracker.update(total, top, visible);
                if events.is_empty() {
                    break;
                }
                let appended = self.viewer.apply_scroll(events);
                if appended > 0 {
                    debug!("scroll at row {} pulled {} rows", self.top_row, appended);
                }
            }
        }

        pub fn scroll_by(&mut self, delta: i32) {
            self.top_row = clamp_top_row(self.top_row.saturating_add(delta), self.scroll_max());
            self.sync();
        }

        /// Opens `path_text` through the viewer's load path.
        pub fn open(&mut self, path_text: &str) {
            self.viewer.path_input = path_text.trim().to_string();
            if self.viewer.load(&mut NoDialog).is_some() {
                self.top_row = 0;
                self.tracker.reset();
            }
            self.sync();
        }

        pub fn close(&mut self) {
            self.viewer.close();
            self.top_row = 0;
            self.tracker.reset();
            self.sync();
        }
    }

    pub fn clamp_top_row(top_row: i32, max: i32) -> i32 {
        top_row.clamp(0, max.max(0))
    }

    fn fit_cell(text: &str) -> String {
        let mut cell: String = text.chars().take(CELL_WIDTH - 1).collect();
        if cell.chars().count() < text.chars().count() {
            cell.pop();
            cell.push('~');
        }
        format!("{:<width$}", cell, width = CELL_WIDTH)
    }

    /// Renders the file line, column headers and one page of rows from
    /// `top_row`. Highlighted rows carry a `*` after the row number.
    pub fn render_view(viewer: &Viewer, top_row: i32) -> String {
        let table = viewer.table();
        let mut out = String::new();

        match (viewer.source(), viewer.loaded_at()) {
            (Some(path), Some(at)) => out.push_str(&format!(
                "{} (opened {})\n",
                path.display(),
                at.format("%H:%M:%S")
            )),
            _ => out.push_str("(no file)\n"),
        }
        if !table.has_schema() {
            return out;
        }

        out.push_str("       ");
        for name in table.columns() {
            out.push_str(&fit_cell(name));
        }
        out.push('\n');

        let start = top_row.max(0) as usize;
        let end = (start + PAGE_ROWS as usize).min(table.row_count());
        for r in start..end {
            let marker = if DisplayTable::is_highlighted(r) { '*' } else { ' ' };
            out.push_str(&format!("{:<5}{} ", r + 1, marker));
            if let Some(cells) = table.row(r) {
                for value in cells {
                    out.push_str(&fit_cell(value));
                }
            }
            out.push('\n');
        }
        out
    }

    /// Applies one command line to the pager.
    pub fn process_command(pager: &mut Pager, cmd: &str, status_msg: &mut String) {
        if cmd == "s" {
            pager.scroll_by(PAGE_ROWS);
        } else if cmd == "w" {
            pager.scroll_by(-PAGE_ROWS);
        } else if cmd == "close" {
            pager.close();
        } else if cmd == "open" || cmd.starts_with("open ") {
            pager.open(cmd["open".len()..].trim());
        } else {
            *status_msg = "unrecognized cmd".to_string();
            return;
        }

        *status_msg = match pager.viewer.error_message() {
            Some(message) => message.to_string(),
            None => pager.viewer.status().to_string(),
        };
        pager.viewer.dismiss_error();
    }

    pub fn run(config: ViewerConfig, path: Option<PathBuf>) -> io::Result<()> {
        let mut pager = Pager::new(Viewer::new(config));
        let mut status_msg = "ok".to_string();
        if let Some(path) = path {
            process_command(&mut pager, &format!("open {}", path.display()), &mut status_msg);
        }

        let interactive = atty::is(atty::Stream::Stdin);
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut elapsed_time = 0.0;

        print_screen(&mut stdout, &pager, elapsed_time, &status_msg, interactive)?;

        let mut line = String::new();
        loop {
            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let cmd = line.trim();
            if cmd == "q" {
                break;
            }
            if cmd.is_empty() {
                continue;
            }

            let start = Instant::now();
            process_command(&mut pager, cmd, &mut status_msg);
            elapsed_time = start.elapsed().as_secs_f64();

            print_screen(&mut stdout, &pager, elapsed_time, &status_msg, interactive)?;
        }
        Ok(())
    }

    fn print_screen(
        out: &mut impl Write,
        pager: &Pager,
        elapsed_time: f64,
        status_msg: &str,
        interactive: bool,
    ) -> io::Result<()> {
        write!(out, "{}", render_view(&pager.viewer, pager.top_row))?;
        if interactive {
            write!(out, "[{:.1}] ({}) > ", elapsed_time, status_msg)?;
        } else {
            writeln!(out, "[{:.1}] ({})", elapsed_time, status_msg)?;
        }
        out.flush()
    }
}
