#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use csv_viewer::config::ViewerConfig;
    use csv_viewer::table::DisplayTable;
    use csv_viewer::viewer::*;
    use tempfile::TempDir;

    fn config(chunk_size: usize) -> ViewerConfig {
        ViewerConfig {
            chunk_size,
            trigger_fraction: 0.8,
            delimiter: b',',
            default_dir: None,
        }
    }

    fn write_csv(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn numbered_csv(n: usize) -> String {
        let mut data = String::from("id,name\n");
        for i in 0..n {
            data.push_str(&format!("{},row{}\n", i, i));
        }
        data
    }

    /// Picker that hands back a fixed answer and remembers what it was asked.
    struct StubPicker {
        answer: Option<PathBuf>,
        calls: usize,
        asked_dir: Option<PathBuf>,
    }

    impl StubPicker {
        fn new(answer: Option<PathBuf>) -> Self {
            StubPicker {
                answer,
                calls: 0,
                asked_dir: None,
            }
        }
    }

    impl FilePicker for StubPicker {
        fn pick_csv(&mut self, default_dir: Option<&Path>) -> Option<PathBuf> {
            self.calls += 1;
            self.asked_dir = default_dir.map(Path::to_path_buf);
            self.answer.clone()
        }
    }

    #[test]
    fn test_three_row_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "data.csv", b"a,b\n1,2\n3,4\n5,6\n");
        let mut viewer = Viewer::new(config(2));

        // Opening shows the first chunk
        assert_eq!(viewer.open_path(&path).unwrap(), 2);
        let table = viewer.table();
        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.row(0).unwrap(), ["1", "2"]);
        assert!(DisplayTable::is_highlighted(0));
        assert_eq!(table.row(1).unwrap(), ["3", "4"]);
        assert!(!DisplayTable::is_highlighted(1));

        assert_eq!(viewer.load_next_chunk().unwrap(), 1);
        assert_eq!(viewer.table().row(2).unwrap(), ["5", "6"]);
        assert!(DisplayTable::is_highlighted(2));

        assert_eq!(viewer.load_next_chunk().unwrap(), 0);
        assert_eq!(viewer.table().row_count(), 3);
        assert!(viewer.status().starts_with("End of file"));
    }

    #[test]
    fn test_all_rows_loaded_in_ceil_n_over_c_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "rows.csv", numbered_csv(23).as_bytes());
        let mut viewer = Viewer::new(config(5));

        let mut reads = 1;
        let mut total = viewer.open_path(&path).unwrap();
        loop {
            let appended = viewer.load_next_chunk().unwrap();
            if appended == 0 {
                break;
            }
            reads += 1;
            total += appended;
        }
        assert_eq!(reads, 5);
        assert_eq!(total, 23);
        assert_eq!(viewer.table().row_count(), 23);
        assert_eq!(viewer.table().cell(22, 1), Some("row22"));
        // Exhausted reader stays a no-op
        assert_eq!(viewer.load_next_chunk().unwrap(), 0);
    }

    #[test]
    fn test_close_then_load_next_chunk_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "rows.csv", numbered_csv(10).as_bytes());
        let mut viewer = Viewer::new(config(3));
        viewer.open_path(&path).unwrap();
        assert!(viewer.is_open());
        assert!(viewer.loaded_at().is_some());

        viewer.close();
        assert!(!viewer.is_open());
        assert_eq!(viewer.source(), None);
        assert_eq!(viewer.loaded_at(), None);
        assert!(!viewer.table().has_schema());

        assert_eq!(viewer.load_next_chunk().unwrap(), 0);
        assert_eq!(viewer.table().row_count(), 0);
    }

    #[test]
    fn test_close_without_file() {
        let mut viewer = Viewer::new(config(3));
        viewer.close();
        assert_eq!(viewer.status(), "Ready");
        assert_eq!(viewer.load_next_chunk().unwrap(), 0);
    }

    #[test]
    fn test_second_file_replaces_first() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_csv(&dir, "first.csv", numbered_csv(4).as_bytes());
        let second = write_csv(&dir, "second.csv", b"x,y,z\n7,8,9\n");
        let mut viewer = Viewer::new(config(10));

        viewer.open_path(&first).unwrap();
        assert_eq!(viewer.table().row_count(), 4);

        viewer.open_path(&second).unwrap();
        assert_eq!(viewer.table().row_count(), 1);
        assert_eq!(viewer.table().columns(), ["x", "y", "z"]);
        assert_eq!(viewer.source(), Some(second.as_path()));
    }

    #[test]
    fn test_failed_load_keeps_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_csv(&dir, "good.csv", b"a,b\n1,2\n");
        let mut viewer = Viewer::new(config(10));
        viewer.open_path(&good).unwrap();

        viewer.path_input = dir.path().join("nope.csv").display().to_string();
        let mut picker = StubPicker::new(None);
        assert_eq!(viewer.load(&mut picker), None);
        assert_eq!(picker.calls, 0);

        let message = viewer.error_message().unwrap();
        assert!(message.starts_with("Error loading CSV:"));
        assert!(message.contains("nope.csv"));
        assert_eq!(viewer.table().row_count(), 1);
        assert_eq!(viewer.source(), Some(good.as_path()));

        viewer.dismiss_error();
        assert_eq!(viewer.error_message(), None);
    }

    #[test]
    fn test_malformed_first_chunk_keeps_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_csv(&dir, "good.csv", b"a,b\n1,2\n3,4\n");
        let bad = write_csv(&dir, "bad.csv", b"a,b\n\xff\xfe,1\n");
        let mut viewer = Viewer::new(config(10));
        viewer.open_path(&good).unwrap();

        viewer.path_input = bad.display().to_string();
        assert_eq!(viewer.load(&mut StubPicker::new(None)), None);
        assert!(viewer.error_message().is_some());
        assert_eq!(viewer.table().row_count(), 2);
        assert!(viewer.is_open());
    }

    #[test]
    fn test_empty_file_reports_no_columns() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write_csv(&dir, "empty.csv", b"");
        let mut viewer = Viewer::new(config(10));
        viewer.path_input = empty.display().to_string();
        viewer.load(&mut StubPicker::new(None));
        assert_eq!(
            viewer.error_message(),
            Some("Error loading CSV: No columns to parse from file")
        );
    }

    #[test]
    fn test_header_only_file_shows_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "header.csv", b"a,b\n");
        let mut viewer = Viewer::new(config(10));
        assert_eq!(viewer.open_path(&path).unwrap(), 0);
        assert!(!viewer.table().has_schema());
        assert_eq!(viewer.load_next_chunk().unwrap(), 0);
    }

    #[test]
    fn test_blank_path_asks_picker() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "picked.csv", b"a\n1\n2\n");
        let mut viewer = Viewer::new(ViewerConfig {
            default_dir: Some(dir.path().to_path_buf()),
            ..config(10)
        });
        viewer.path_input = "   ".to_string();

        let mut picker = StubPicker::new(Some(path.clone()));
        assert_eq!(viewer.load(&mut picker), Some(2));
        assert_eq!(picker.calls, 1);
        assert_eq!(picker.asked_dir.as_deref(), Some(dir.path()));
        assert_eq!(viewer.source(), Some(path.as_path()));
    }

    #[test]
    fn test_cancelled_picker_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "kept.csv", b"a\n1\n");
        let mut viewer = Viewer::new(config(10));
        viewer.open_path(&path).unwrap();

        let mut picker = StubPicker::new(None);
        assert_eq!(viewer.load(&mut picker), None);
        assert_eq!(picker.calls, 1);
        assert_eq!(viewer.error_message(), None);
        assert_eq!(viewer.status(), "No file selected");
        assert_eq!(viewer.table().row_count(), 1);
    }

    #[test]
    fn test_typed_path_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "typed.csv", b"a\n1\n");
        let mut viewer = Viewer::new(config(10));
        viewer.path_input = format!("  {}  ", path.display());
        assert_eq!(viewer.load(&mut NoDialog), Some(1));
    }

    #[test]
    fn test_scroll_threshold_gates_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "rows.csv", numbered_csv(10).as_bytes());
        let mut viewer = Viewer::new(config(2));
        viewer.open_path(&path).unwrap();

        // No range reported yet
        assert_eq!(viewer.on_scroll_value_changed(1000), 0);

        viewer.on_scroll_range_changed(0, 500);
        assert_eq!(viewer.trigger().threshold(), Some(400.0));
        assert_eq!(viewer.on_scroll_value_changed(399), 0);
        assert_eq!(viewer.table().row_count(), 2);
        assert_eq!(viewer.on_scroll_value_changed(400), 2);
        assert_eq!(viewer.table().row_count(), 4);
    }

    #[test]
    fn test_repeated_scroll_events_load_sequential_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "rows.csv", numbered_csv(7).as_bytes());
        let mut viewer = Viewer::new(config(2));
        viewer.open_path(&path).unwrap();
        viewer.on_scroll_range_changed(0, 10);

        let loaded: Vec<usize> = (0..5).map(|_| viewer.on_scroll_value_changed(9)).collect();
        assert_eq!(loaded, vec![2, 2, 1, 0, 0]);
        let ids: Vec<&str> = (0..7).map(|r| viewer.table().cell(r, 0).unwrap()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_read_error_while_scrolling_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "broken.csv", b"a,b\n1,2\n3,4\n\xff,5\n");
        let mut viewer = Viewer::new(config(2));
        viewer.open_path(&path).unwrap();
        viewer.on_scroll_range_changed(0, 0);

        assert_eq!(viewer.on_scroll_value_changed(0), 0);
        assert!(viewer.error_message().unwrap().starts_with("Error loading CSV:"));
        assert_eq!(viewer.table().row_count(), 2);
        assert!(!viewer.is_open());
    }

    #[test]
    fn test_ragged_rows_fit_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "ragged.csv", b"a,b\n1\n2,3,4\n");
        let mut viewer = Viewer::new(config(10));
        viewer.open_path(&path).unwrap();
        assert_eq!(viewer.table().row(0).unwrap(), ["1", ""]);
        assert_eq!(viewer.table().row(1).unwrap(), ["2", "3"]);
    }

    #[test]
    fn test_load_ignored_while_error_pending() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_csv(&dir, "good.csv", b"a\n1\n");
        let mut viewer = Viewer::new(config(10));

        viewer.path_input = dir.path().join("absent.csv").display().to_string();
        assert_eq!(viewer.load(&mut NoDialog), None);
        let first_error = viewer.error_message().unwrap().to_string();

        // The dialog has not been acknowledged yet
        viewer.path_input = good.display().to_string();
        let mut picker = StubPicker::new(Some(good.clone()));
        assert_eq!(viewer.load(&mut picker), None);
        assert_eq!(picker.calls, 0);
        assert_eq!(viewer.error_message(), Some(first_error.as_str()));
        assert!(!viewer.table().has_schema());

        viewer.dismiss_error();
        assert_eq!(viewer.load(&mut picker), Some(1));
        assert_eq!(viewer.source(), Some(good.as_path()));
    }
}
