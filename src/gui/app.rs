//! Brede Welvaart Main Application
//! Main window with control panel and dashboard view.

use crate::config::DashboardConfig;
use crate::data::{IndicatorLoader, IndicatorTable, LoaderError, Query, COL_LABEL};
use crate::export;
use crate::gui::{
    ControlPanel, ControlPanelAction, DashboardView, SelectionKey, ViewModel, Warning,
};
use crate::i18n::{text, Key};
use crate::map::{ChoroplethRenderer, GeoJsonError, RegionShapes};
use egui::SidePanel;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

/// Size of an exported map
const EXPORT_MAP_SIZE: (u32, u32) = (1000, 1200);
/// View models kept before the cache is flushed
const VIEW_CACHE_LIMIT: usize = 64;

/// Loading result from a background thread
enum LoadResult {
    Progress(String),
    Table(IndicatorTable),
    Shapes(RegionShapes),
    TableError(LoaderError),
    ShapesError(GeoJsonError),
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    table: Option<IndicatorTable>,
    shapes: Option<RegionShapes>,
    control_panel: ControlPanel,
    dashboard: DashboardView,

    views: HashMap<SelectionKey, ViewModel>,
    failed_view: Option<SelectionKey>,
    /// Indicator the year list was built for
    years_indicator: Option<String>,

    table_warning: Option<Warning>,
    shapes_warning: Option<Warning>,

    // Async loading
    load_tx: Sender<LoadResult>,
    load_rx: Receiver<LoadResult>,
    pending_loads: usize,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let (load_tx, load_rx) = channel();
        let mut app = Self {
            control_panel: ControlPanel::new(config.language, config.color_theme),
            config,
            table: None,
            shapes: None,
            dashboard: DashboardView::new(),
            views: HashMap::new(),
            failed_view: None,
            years_indicator: None,
            table_warning: None,
            shapes_warning: None,
            load_tx,
            load_rx,
            pending_loads: 0,
        };

        let data_path = app.config.data_path.clone();
        let geojson_path = app.config.geojson_path.clone();
        if data_path.exists() {
            app.load_table(data_path);
        } else {
            warn!("Indicator file {} not found", data_path.display());
        }
        if geojson_path.exists() {
            app.load_shapes(geojson_path);
        } else {
            warn!("Shape file {} not found", geojson_path.display());
        }
        app
    }

    /// Read the indicator CSV in a background thread
    fn load_table(&mut self, path: PathBuf) {
        self.control_panel.csv_path = Some(path.clone());
        self.control_panel
            .set_status(text(Key::Loading, self.control_panel.selection.language));
        self.pending_loads += 1;

        let tx = self.load_tx.clone();
        let options = self.config.csv_options();
        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(format!("Reading {}", path.display())));
            let result = match IndicatorLoader::load_csv(&path, &options) {
                Ok(table) => LoadResult::Table(table),
                Err(e) => LoadResult::TableError(e),
            };
            let _ = tx.send(result);
        });
    }

    /// Parse the GeoJSON shapes in a background thread
    fn load_shapes(&mut self, path: PathBuf) {
        self.control_panel.geojson_path = Some(path.clone());
        self.pending_loads += 1;

        let tx = self.load_tx.clone();
        let region_key = self.config.region_key.clone();
        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(format!("Reading {}", path.display())));
            let result = match RegionShapes::load(&path, &region_key) {
                Ok(shapes) => LoadResult::Shapes(shapes),
                Err(e) => LoadResult::ShapesError(e),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        while let Ok(result) = self.load_rx.try_recv() {
            match result {
                LoadResult::Progress(status) => {
                    self.control_panel.set_status(&status);
                }
                LoadResult::Table(table) => {
                    self.pending_loads = self.pending_loads.saturating_sub(1);
                    self.apply_table(table);
                }
                LoadResult::Shapes(shapes) => {
                    self.pending_loads = self.pending_loads.saturating_sub(1);
                    info!(
                        "Loaded {} regions ({} skipped)",
                        shapes.regions.len(),
                        shapes.skipped
                    );
                    self.control_panel
                        .set_status(&format!("{} regions loaded", shapes.regions.len()));
                    self.shapes_warning = None;
                    self.shapes = Some(shapes);
                    self.dashboard.clear();
                }
                LoadResult::TableError(e) => {
                    self.pending_loads = self.pending_loads.saturating_sub(1);
                    error!("Loading indicators failed: {}", e);
                    self.table_warning = Some(warning_for(&e));
                    self.control_panel.set_status(&format!("Error: {}", e));
                    self.table = None;
                    self.clear_views();
                    self.control_panel.clear_data();
                }
                LoadResult::ShapesError(e) => {
                    self.pending_loads = self.pending_loads.saturating_sub(1);
                    error!("Loading shapes failed: {}", e);
                    self.shapes_warning = Some(Warning::Failed(e.to_string()));
                    self.control_panel.set_status(&format!("Error: {}", e));
                    self.shapes = None;
                    self.dashboard.clear();
                }
            }
            self.refresh_warnings();
        }
    }

    fn apply_table(&mut self, table: IndicatorTable) {
        self.clear_views();
        self.years_indicator = None;

        match indicators_or_warning(&table) {
            Ok(indicators) => {
                info!(
                    "Loaded {} rows with {} indicators",
                    table.row_count(),
                    indicators.len()
                );
                self.control_panel.set_status(&format!(
                    "{} rows, {} indicators",
                    table.row_count(),
                    indicators.len()
                ));
                self.control_panel.update_indicators(indicators, table.regions());
                self.table_warning = None;
            }
            Err(warning) => {
                self.control_panel.clear_data();
                self.table_warning = Some(warning);
            }
        }

        self.table = Some(table);
        self.refresh_years();
    }

    fn refresh_warnings(&mut self) {
        self.control_panel.warnings = self
            .table_warning
            .iter()
            .chain(self.shapes_warning.iter())
            .cloned()
            .collect();
    }

    fn clear_views(&mut self) {
        self.views.clear();
        self.failed_view = None;
        self.dashboard.clear();
    }

    /// Rebuild the year list when the indicator changed
    fn refresh_years(&mut self) {
        let indicator = self.control_panel.selection.indicator.clone();
        if indicator == self.years_indicator {
            return;
        }
        let years = match (&self.table, &indicator) {
            (Some(table), Some(indicator)) => {
                Query::years_for(table, indicator).unwrap_or_else(|e| {
                    warn!("No years for {}: {}", indicator, e);
                    Vec::new()
                })
            }
            _ => Vec::new(),
        };
        debug!("Indicator {:?} has years {:?}", indicator, years);
        self.control_panel.update_years(years);
        self.years_indicator = indicator;
    }

    /// Key of the current view, computing it if it is not cached yet
    fn ensure_view(&mut self) -> Option<SelectionKey> {
        let table = self.table.as_ref()?;
        let key = SelectionKey::from_selection(&self.control_panel.selection)?;
        if self.views.contains_key(&key) {
            return Some(key);
        }
        if self.failed_view.as_ref() == Some(&key) {
            return None;
        }

        if self.views.len() >= VIEW_CACHE_LIMIT {
            self.views.clear();
        }
        match ViewModel::compute(table, key.clone()) {
            Ok(view) => {
                self.views.insert(key.clone(), view);
                Some(key)
            }
            Err(e) => {
                error!("Selection {:?} failed: {}", key, e);
                self.control_panel.set_status(&format!("Error: {}", e));
                self.failed_view = Some(key);
                None
            }
        }
    }

    fn handle_open_csv(&mut self) {
        if self.pending_loads > 0 {
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.load_table(path);
        }
    }

    fn handle_open_geojson(&mut self) {
        if self.pending_loads > 0 {
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("GeoJSON", &["geojson", "json"])
            .pick_file()
        {
            self.load_shapes(path);
        }
    }

    fn handle_selection_changed(&mut self, ctx: &egui::Context) {
        let selection = &self.control_panel.selection;
        debug!(
            "Selection: {:?} {:?} (reference {:?}), theme {}",
            selection.indicator,
            selection.year,
            selection.reference_year,
            selection.theme.name()
        );
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(
            text(Key::AppTitle, selection.language).to_string(),
        ));
        self.refresh_years();
    }

    fn handle_export_table(&mut self) {
        let Some(key) = self.ensure_view() else {
            return;
        };
        let Some(view) = self.views.get(&key) else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(export_file_name(&key.indicator, key.year, "csv"))
            .save_file()
        else {
            return;
        };

        match export::export_table_csv(&view.rows, &path) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Exported {}", display_name(&path)));
                export::reveal_in_folder(&path);
            }
            Err(e) => {
                error!("Table export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn handle_export_map(&mut self) {
        let Some(key) = self.ensure_view() else {
            return;
        };
        let (Some(view), Some(shapes)) = (self.views.get(&key), self.shapes.as_ref()) else {
            return;
        };
        let Some(scale) = view.map_scale else {
            self.control_panel.set_status("Error: no values to map");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(export_file_name(&key.indicator, key.year, "png"))
            .save_file()
        else {
            return;
        };

        let theme = self.control_panel.selection.theme;
        let result = ChoroplethRenderer::render(shapes, &view.values, scale, theme, EXPORT_MAP_SIZE)
            .map_err(|e| e.to_string())
            .and_then(|map| export::export_map_png(&map.image, &path).map_err(|e| e.to_string()));

        match result {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Exported {}", display_name(&path)));
                export::reveal_in_folder(&path);
            }
            Err(e) => {
                error!("Map export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

/// Suggested export file name, e.g. `Werkloosheid_2022.csv`.
fn export_file_name(indicator: &str, year: Option<i64>, extension: &str) -> String {
    let stem: String = indicator
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    match year {
        Some(year) => format!("{}_{}.{}", stem, year, extension),
        None => format!("{}.{}", stem, extension),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        let is_loading = self.pending_loads > 0;
        if is_loading {
            ctx.request_repaint();
        }
        self.control_panel.is_loading = is_loading;
        self.control_panel.can_export_map = self.shapes.is_some() && self.table.is_some();

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::OpenCsv => self.handle_open_csv(),
                        ControlPanelAction::OpenGeoJson => self.handle_open_geojson(),
                        ControlPanelAction::SelectionChanged => self.handle_selection_changed(ctx),
                        ControlPanelAction::ExportTable => self.handle_export_table(),
                        ControlPanelAction::ExportMap => self.handle_export_map(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        let key = self.ensure_view();

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            let view = key.as_ref().and_then(|k| self.views.get(k));
            self.dashboard.show(
                ui,
                view,
                self.shapes.as_ref(),
                &self.control_panel.selection,
                is_loading,
            );
        });
    }
}

/// Sidebar warning for a failed indicator load.
fn warning_for(error: &LoaderError) -> Warning {
    match error {
        LoaderError::MissingColumn(column) if column == COL_LABEL => Warning::LabelColumnMissing,
        LoaderError::NoIndicators => Warning::NoValidIndicators,
        other => Warning::Failed(other.to_string()),
    }
}

/// Indicator labels of a freshly loaded table, or the warning to show instead.
fn indicators_or_warning(table: &IndicatorTable) -> Result<Vec<String>, Warning> {
    table.require_indicators().map_err(|e| {
        warn!("{}", e);
        warning_for(&e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn table_with_labels(labels: &[Option<&str>]) -> IndicatorTable {
        let n = labels.len();
        let df = df!(
            "label" => labels,
            "jaar" => vec![2022i64; n],
            "waarde" => vec![1.0; n],
            "statnaam" => vec!["Assen"; n],
        )
        .unwrap();
        IndicatorTable::from_dataframe(df).unwrap()
    }

    #[test]
    fn missing_label_column_gets_its_own_warning() {
        let error = LoaderError::MissingColumn(COL_LABEL.to_string());
        assert_eq!(warning_for(&error), Warning::LabelColumnMissing);

        let error = LoaderError::MissingColumn("jaar".to_string());
        assert_eq!(
            warning_for(&error),
            Warning::Failed("The 'jaar' column does not exist in the data".to_string())
        );
    }

    #[test]
    fn table_without_labels_warns_no_valid_indicators() {
        let table = table_with_labels(&[None, Some("  "), None]);
        assert_eq!(
            indicators_or_warning(&table),
            Err(Warning::NoValidIndicators)
        );

        let table = table_with_labels(&[None, Some("Werkloosheid")]);
        assert_eq!(
            indicators_or_warning(&table),
            Ok(vec!["Werkloosheid".to_string()])
        );
    }

    #[test]
    fn export_names_are_file_safe() {
        assert_eq!(
            export_file_name("Werkloosheid", Some(2022), "csv"),
            "Werkloosheid_2022.csv"
        );
        assert_eq!(
            export_file_name(" Natuur- en bosgebieden ", None, "png"),
            "Natuur__en_bosgebieden.png"
        );
        assert_eq!(
            export_file_name("Tevredenheid met leven", Some(2020), "png"),
            "Tevredenheid_met_leven_2020.png"
        );
    }
}
