//! Control Panel Widget
//! Left side panel with language, indicator, year and theme selection.

use crate::charts::{ChartKind, ColorTheme};
use crate::data::SortOrder;
use crate::i18n::{display_label, text, Key, Language};
use egui::{Color32, ComboBox, RichText};
use std::path::{Path, PathBuf};

/// Current dashboard selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub language: Language,
    pub indicator: Option<String>,
    pub year: Option<i64>,
    /// Year shown in the second map
    pub reference_year: Option<i64>,
    pub highlight: Option<String>,
    /// Order of the table and bar chart
    pub sort: SortOrder,
    pub theme: ColorTheme,
    pub chart: ChartKind,
}

/// Problems shown above the selectors.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    LabelColumnMissing,
    NoValidIndicators,
    Failed(String),
}

impl Warning {
    fn message(&self, lang: Language) -> String {
        match self {
            Warning::LabelColumnMissing => text(Key::LabelColumnMissing, lang).to_string(),
            Warning::NoValidIndicators => text(Key::NoValidIndicators, lang).to_string(),
            Warning::Failed(msg) => msg.clone(),
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub selection: Selection,
    pub indicators: Vec<String>,
    pub years: Vec<i64>,
    pub regions: Vec<String>,
    pub csv_path: Option<PathBuf>,
    pub geojson_path: Option<PathBuf>,
    pub warnings: Vec<Warning>,
    pub status: String,
    pub is_loading: bool,
    pub can_export_map: bool,
}

impl ControlPanel {
    pub fn new(language: Language, theme: ColorTheme) -> Self {
        Self {
            selection: Selection {
                language,
                theme,
                ..Selection::default()
            },
            indicators: Vec::new(),
            years: Vec::new(),
            regions: Vec::new(),
            csv_path: None,
            geojson_path: None,
            warnings: Vec::new(),
            status: String::new(),
            is_loading: false,
            can_export_map: false,
        }
    }

    /// Replace the indicator list, keeping the current choice when it still exists.
    pub fn update_indicators(&mut self, indicators: Vec<String>, regions: Vec<String>) {
        let keep = self
            .selection
            .indicator
            .as_ref()
            .is_some_and(|current| indicators.contains(current));
        if !keep {
            self.selection.indicator = indicators.first().cloned();
        }
        if let Some(ref region) = self.selection.highlight {
            if !regions.contains(region) {
                self.selection.highlight = None;
            }
        }
        self.indicators = indicators;
        self.regions = regions;
    }

    /// New years for the selected indicator: latest year, earliest as reference.
    pub fn update_years(&mut self, years: Vec<i64>) {
        if !self.selection.year.is_some_and(|y| years.contains(&y)) {
            self.selection.year = years.last().copied();
        }
        if !self.selection.reference_year.is_some_and(|y| years.contains(&y)) {
            self.selection.reference_year = years.first().copied();
        }
        self.years = years;
    }

    pub fn clear_data(&mut self) {
        self.indicators.clear();
        self.years.clear();
        self.regions.clear();
        self.selection.indicator = None;
        self.selection.year = None;
        self.selection.reference_year = None;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        let before = self.selection.clone();
        let lang = self.selection.language;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new(text(Key::SidebarTitle, lang))
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);

        let label_width = 90.0;
        let combo_width = 190.0;

        ui.horizontal(|ui| {
            ui.add_sized(
                [label_width, 20.0],
                egui::Label::new(text(Key::LanguageLabel, lang)),
            );
            ComboBox::from_id_salt("language")
                .width(combo_width)
                .selected_text(lang.name())
                .show_ui(ui, |ui| {
                    for option in Language::ALL {
                        ui.selectable_value(&mut self.selection.language, option, option.name());
                    }
                });
        });

        ui.add_space(5.0);
        ui.separator();
        ui.add_space(5.0);

        for warning in &self.warnings {
            ui.label(
                RichText::new(format!("⚠ {}", warning.message(lang)))
                    .size(12.0)
                    .color(Color32::from_rgb(255, 165, 0)),
            );
        }

        // ===== Indicator =====
        ui.label(RichText::new(text(Key::SelectIndicator, lang)).size(14.0).strong());
        ui.add_space(5.0);

        let selected_text = self
            .selection
            .indicator
            .as_deref()
            .map(|label| display_label(label, lang))
            .unwrap_or_default();
        ComboBox::from_id_salt("indicator")
            .width(ui.available_width() - 10.0)
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for label in &self.indicators {
                    let selected = self.selection.indicator.as_ref() == Some(label);
                    if ui
                        .selectable_label(selected, display_label(label, lang))
                        .clicked()
                    {
                        self.selection.indicator = Some(label.clone());
                    }
                }
            });

        if let Some(ref label) = self.selection.indicator {
            ui.label(
                RichText::new(format!(
                    "{}: {}",
                    text(Key::YouSelected, lang),
                    display_label(label, lang)
                ))
                .size(12.0)
                .color(Color32::GRAY),
            );
        }

        ui.add_space(10.0);

        // ===== Years =====
        let year_text = |year: Option<i64>| year.map(|y| y.to_string()).unwrap_or_default();
        ui.horizontal(|ui| {
            ui.add_sized(
                [label_width, 20.0],
                egui::Label::new(text(Key::YearLabel, lang)),
            );
            ComboBox::from_id_salt("year")
                .width(combo_width)
                .selected_text(year_text(self.selection.year))
                .show_ui(ui, |ui| {
                    for year in self.years.iter().rev() {
                        ui.selectable_value(
                            &mut self.selection.year,
                            Some(*year),
                            year.to_string(),
                        );
                    }
                });
        });
        ui.add_space(5.0);
        ui.label(RichText::new(text(Key::ReferenceYearLabel, lang)).size(12.0));
        ComboBox::from_id_salt("reference_year")
            .width(combo_width)
            .selected_text(year_text(self.selection.reference_year))
            .show_ui(ui, |ui| {
                for year in &self.years {
                    ui.selectable_value(
                        &mut self.selection.reference_year,
                        Some(*year),
                        year.to_string(),
                    );
                }
            });

        ui.add_space(10.0);

        ui.label(RichText::new(text(Key::RegionLabel, lang)).size(12.0));
        let none_text = text(Key::NoRegion, lang);
        ComboBox::from_id_salt("highlight")
            .width(ui.available_width() - 10.0)
            .selected_text(self.selection.highlight.as_deref().unwrap_or(none_text))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.selection.highlight, None, none_text);
                for region in &self.regions {
                    ui.selectable_value(
                        &mut self.selection.highlight,
                        Some(region.clone()),
                        region,
                    );
                }
            });

        ui.add_space(8.0);
        ui.label(RichText::new(text(Key::SortLabel, lang)).size(12.0));
        ui.horizontal(|ui| {
            for (order, key) in [
                (SortOrder::Descending, Key::SortDescending),
                (SortOrder::Ascending, Key::SortAscending),
            ] {
                ui.radio_value(&mut self.selection.sort, order, text(key, lang));
            }
        });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Appearance =====
        ui.label(RichText::new(text(Key::ColorTheme, lang)).size(14.0).strong());
        ComboBox::from_id_salt("color_theme")
            .width(combo_width)
            .selected_text(self.selection.theme.name())
            .show_ui(ui, |ui| {
                for theme in ColorTheme::ALL {
                    ui.selectable_value(&mut self.selection.theme, theme, theme.name());
                }
            });

        ui.add_space(8.0);
        ui.label(RichText::new(text(Key::ChartKind, lang)).size(14.0).strong());
        ui.horizontal(|ui| {
            for kind in ChartKind::ALL {
                let key = match kind {
                    ChartKind::Bar => Key::ChartBar,
                    ChartKind::Heatmap => Key::ChartHeatmap,
                    ChartKind::Trend => Key::ChartTrend,
                };
                ui.radio_value(&mut self.selection.chart, kind, text(key, lang));
            }
        });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source =====
        ui.label(
            RichText::new(format!("📁 {}", text(Key::DataSource, lang)))
                .size(14.0)
                .strong(),
        );
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let loading = self.is_loading;
                if Self::source_row(
                    ui,
                    self.csv_path.as_deref(),
                    text(Key::OpenCsv, lang),
                    loading,
                ) {
                    action = ControlPanelAction::OpenCsv;
                }
                if Self::source_row(
                    ui,
                    self.geojson_path.as_deref(),
                    text(Key::OpenGeoJson, lang),
                    loading,
                ) {
                    action = ControlPanelAction::OpenGeoJson;
                }
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.add_enabled_ui(self.selection.indicator.is_some(), |ui| {
                if ui.button(format!("💾 {}", text(Key::ExportTable, lang))).clicked() {
                    action = ControlPanelAction::ExportTable;
                }
            });
            ui.add_enabled_ui(self.can_export_map, |ui| {
                if ui.button(format!("🗺 {}", text(Key::ExportMap, lang))).clicked() {
                    action = ControlPanelAction::ExportMap;
                }
            });
        });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Status =====
        ui.horizontal(|ui| {
            ui.label(RichText::new(text(Key::Status, lang)).size(14.0).strong());
            if self.is_loading {
                ui.spinner();
            }
        });
        let status_color = if self.warnings.iter().any(|w| matches!(w, Warning::Failed(_))) {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        if action == ControlPanelAction::None && self.selection != before {
            action = ControlPanelAction::SelectionChanged;
        }
        action
    }

    fn source_row(ui: &mut egui::Ui, path: Option<&Path>, button: &str, loading: bool) -> bool {
        let mut clicked = false;
        ui.horizontal(|ui| {
            let name = path
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "-".to_string());
            ui.label(RichText::new(name).size(12.0));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_enabled_ui(!loading, |ui| {
                    clicked = ui.button(button).clicked();
                });
            });
        });
        clicked
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    OpenCsv,
    OpenGeoJson,
    SelectionChanged,
    ExportTable,
    ExportMap,
}
