use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use csv_viewer::config::{Args, ViewerConfig};
use csv_viewer::logger::setup_logging;

#[cfg(feature = "gui_app")]
mod gui_app {
    use std::path::{Path, PathBuf};
    use std::time::Instant;

    use eframe::egui;
    use egui::{Color32, Key, KeyboardShortcut, Modifiers, RichText};
    use egui_extras::{Column, TableBuilder};

    use csv_viewer::config::ViewerConfig;
    use csv_viewer::scroll::ScrollTracker;
    use csv_viewer::table::{DisplayTable, HIGHLIGHT_RGB};
    use csv_viewer::viewer::{FilePicker, Viewer};

    const HIGHLIGHT: Color32 =
        Color32::from_rgb(HIGHLIGHT_RGB.0, HIGHLIGHT_RGB.1, HIGHLIGHT_RGB.2);
    const OPEN_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::O);
    const QUIT_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Q);

    /// Native open dialog filtered to CSV files.
    struct RfdPicker;

    impl FilePicker for RfdPicker {
        fn pick_csv(&mut self, default_dir: Option<&Path>) -> Option<PathBuf> {
            let mut dialog = rfd::FileDialog::new()
                .set_title("Open CSV File")
                .add_filter("CSV Files", &["csv"]);
            if let Some(dir) = default_dir {
                dialog = dialog.set_directory(dir);
            }
            dialog.pick_file()
        }
    }

    struct CsvViewerApp {
        viewer: Viewer,
        picker: RfdPicker,
        tracker: ScrollTracker,
        last_elapsed_time: f64,
    }

    impl CsvViewerApp {
        fn new(
            cc: &eframe::CreationContext<'_>,
            config: ViewerConfig,
            path: Option<PathBuf>,
        ) -> Self {
            egui::Context::set_visuals(&cc.egui_ctx, egui::Visuals::dark());

            let mut app = CsvViewerApp {
                viewer: Viewer::new(config),
                picker: RfdPicker,
                tracker: ScrollTracker::new(),
                last_elapsed_time: 0.0,
            };
            if let Some(path) = path {
                app.viewer.path_input = path.display().to_string();
                app.open();
            }
            app
        }

        fn open(&mut self) {
            let start = Instant::now();
            if self.viewer.load(&mut self.picker).is_some() {
                self.tracker.reset();
            }
            self.last_elapsed_time = start.elapsed().as_secs_f64();
        }

        fn close(&mut self) {
            self.viewer.close();
            self.tracker.reset();
        }

        /// Reports the table's scroll position to the viewer as a per-row
        /// scrollbar.
        fn dispatch_scroll(&mut self, ctx: &egui::Context, visible: Option<(usize, usize)>) {
            let total = self.viewer.table().row_count();
            let (first, shown) = match visible {
                Some((first, last)) => (first, last - first + 1),
                None => (0, 0),
            };
            let events = self.tracker.update(total, first, shown);
            if events.is_empty() {
                return;
            }
            let start = Instant::now();
            if self.viewer.apply_scroll(events) > 0 {
                self.last_elapsed_time = start.elapsed().as_secs_f64();
                ctx.request_repaint();
            }
        }
    }

    /// Lays out the loaded table and returns the first and last row indices
    /// that made it on screen.
    fn show_table(ui: &mut egui::Ui, table: &DisplayTable) -> Option<(usize, usize)> {
        if !table.has_schema() {
            ui.centered_and_justified(|ui| {
                ui.label("No file loaded");
            });
            return None;
        }

        let text_height = egui::TextStyle::Body.resolve(ui.style()).size;
        let row_height = text_height + 4.0;
        let mut first_visible = usize::MAX;
        let mut last_visible = 0;

        TableBuilder::new(ui)
            .striped(false)
            .resizable(true)
            .column(Column::exact(50.0))
            .columns(
                Column::initial(100.0).at_least(30.0).clip(true),
                table.column_count(),
            )
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("");
                });
                for name in table.columns() {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                // Only rows on screen are laid out.
                body.rows(row_height, table.row_count(), |mut row| {
                    let index = row.index();
                    first_visible = first_visible.min(index);
                    last_visible = last_visible.max(index);
                    let highlighted = DisplayTable::is_highlighted(index);

                    row.col(|ui| {
                        ui.label(format!("{}", index + 1));
                    });
                    if let Some(cells) = table.row(index) {
                        for value in cells {
                            row.col(|ui| {
                                if highlighted {
                                    ui.painter().rect_filled(ui.max_rect(), 0.0, HIGHLIGHT);
                                    ui.label(RichText::new(value).color(Color32::BLACK));
                                } else {
                                    ui.label(value);
                                }
                            });
                        }
                    }
                });
            });

        (first_visible <= last_visible).then_some((first_visible, last_visible))
    }

    impl eframe::App for CsvViewerApp {
        fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
            let modal_open = self.viewer.error_message().is_some();

            if !modal_open {
                if ctx.input_mut(|i| i.consume_shortcut(&OPEN_SHORTCUT)) {
                    self.open();
                }
                if ctx.input_mut(|i| i.consume_shortcut(&QUIT_SHORTCUT)) {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }

            // --- Menu Bar ---
            egui::TopBottomPanel::top("menu_panel").show(ctx, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.add_enabled_ui(!modal_open, |ui| {
                        ui.menu_button("File", |ui| {
                            let open = egui::Button::new("Open")
                                .shortcut_text(ui.ctx().format_shortcut(&OPEN_SHORTCUT));
                            if ui.add(open).clicked() {
                                ui.close_menu();
                                self.open();
                            }
                            if ui.button("Close").clicked() {
                                ui.close_menu();
                                self.close();
                            }
                            let exit = egui::Button::new("Exit")
                                .shortcut_text(ui.ctx().format_shortcut(&QUIT_SHORTCUT));
                            if ui.add(exit).clicked() {
                                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                            }
                        });
                    });
                });
            });

            // --- Path Panel ---
            egui::TopBottomPanel::top("path_panel").show(ctx, |ui| {
                ui.add_enabled_ui(!modal_open, |ui| {
                    ui.label("Enter CSV file path:");
                    ui.horizontal(|ui| {
                        let field_width = (ui.available_width() - 90.0).max(0.0);
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut self.viewer.path_input)
                                .desired_width(field_width),
                        );
                        let submitted =
                            response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
                        if ui.button("Load CSV").clicked() || submitted {
                            self.open();
                        }
                    });
                });
            });

            // --- Status Bar Panel ---
            egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(format!("Status: {}", self.viewer.status()));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!("[{:.1} ms]", self.last_elapsed_time * 1000.0));
                        let table = self.viewer.table();
                        ui.label(format!(
                            "{} rows x {} columns",
                            table.row_count(),
                            table.column_count()
                        ));
                        if let Some(at) = self.viewer.loaded_at() {
                            ui.label(format!("opened {}", at.format("%H:%M:%S")));
                        }
                    });
                });
            });

            // --- Table ---
            // Disabled while the error dialog is up, so it cannot scroll.
            let mut visible = None;
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.add_enabled_ui(!modal_open, |ui| {
                    visible = show_table(ui, self.viewer.table());
                });
            });

            if !modal_open {
                self.dispatch_scroll(ctx, visible);
            }

            // --- Error Dialog ---
            if let Some(message) = self.viewer.error_message().map(str::to_owned) {
                let mut dismissed = false;
                egui::Window::new("Error")
                    .collapsible(false)
                    .resizable(false)
                    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        ui.label(message);
                        if ui.button("OK").clicked() {
                            dismissed = true;
                        }
                    });
                if dismissed {
                    self.viewer.dismiss_error();
                }
            }
        }
    }

    pub fn main(config: ViewerConfig, path: Option<PathBuf>) -> Result<(), eframe::Error> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([800.0, 600.0])
                .with_title("CSV Reader"),
            ..Default::default()
        };

        eframe::run_native(
            "CSV Reader",
            options,
            Box::new(move |cc| Box::new(CsvViewerApp::new(cc, config, path))),
        )
    }
}

#[cfg(feature = "gui_app")]
fn run(config: ViewerConfig, path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    gui_app::main(config, path).map_err(|e| Box::new(e) as Box<dyn Error>)
}

#[cfg(all(feature = "cli_app", not(feature = "gui_app")))]
fn run(config: ViewerConfig, path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    csv_viewer::cli_app::run(config, path)?;
    Ok(())
}

#[cfg(not(any(feature = "cli_app", feature = "gui_app")))]
fn run(_config: ViewerConfig, _path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    Err("No application feature ('cli_app' or 'gui_app') enabled. \
         Build with --features cli_app or --features gui_app"
        .into())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging();

    let config = ViewerConfig::from_args(&args);
    run(config, args.path)
}
