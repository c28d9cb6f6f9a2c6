//! Dashboard View
//! Central panel: descriptions, metrics, the selected chart, the data table and two maps.

use crate::charts::{
    ChartKind, ChartPlotter, ColorTheme, DonutColor, ValueScale, HIGHLIGHT_COLOR,
};
use crate::data::{
    ChangeSummary, HeatmapGrid, IndicatorQuery, IndicatorRow, IndicatorTable, Query, QueryError,
    SortOrder,
};
use crate::format::{format_number, format_value};
use crate::gui::Selection;
use crate::i18n::{about_paragraphs, describe, display_label, text, Key, Language};
use crate::map::{hit_test, ChoroplethRenderer, RegionShapes, RenderedMap};
use crate::stats::SummaryStats;
use egui::{Color32, ColorImage, RichText, ScrollArea, TextureHandle, TextureOptions};
use log::{debug, warn};
use std::collections::HashMap;

const CHART_HEIGHT: f32 = 320.0;
const TABLE_HEIGHT: f32 = 260.0;
/// Textures kept before the map cache is flushed
const MAP_CACHE_LIMIT: usize = 16;

/// What a view model is computed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionKey {
    pub indicator: String,
    pub year: Option<i64>,
    pub reference_year: Option<i64>,
    pub highlight: Option<String>,
    pub sort: SortOrder,
}

impl SelectionKey {
    pub fn from_selection(selection: &Selection) -> Option<Self> {
        Some(Self {
            indicator: selection.indicator.clone()?,
            year: selection.year,
            reference_year: selection.reference_year,
            highlight: selection.highlight.clone(),
            sort: selection.sort,
        })
    }
}

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone)]
pub struct ViewModel {
    pub key: SelectionKey,
    pub rows: Vec<IndicatorRow>,
    pub stats: Option<SummaryStats>,
    pub change: Option<ChangeSummary>,
    pub heatmap: HeatmapGrid,
    /// Region shown in the trend chart
    pub trend_region: Option<String>,
    pub trend: Vec<(i64, f64)>,
    pub mean: Vec<(i64, f64)>,
    pub values: HashMap<String, f64>,
    pub reference_values: HashMap<String, f64>,
    /// Shared by both maps so their colors compare
    pub map_scale: Option<ValueScale>,
}

impl ViewModel {
    pub fn compute(table: &IndicatorTable, key: SelectionKey) -> Result<Self, QueryError> {
        let query = IndicatorQuery {
            sort: key.sort,
            ..IndicatorQuery::new(&key.indicator, key.year)
        };
        let rows = Query::filter(table, &query)?;
        let reference_rows = match key.reference_year {
            Some(year) if Some(year) != key.year => {
                let reference = IndicatorQuery {
                    year: Some(year),
                    ..query.clone()
                };
                Query::filter(table, &reference)?
            }
            _ => rows.clone(),
        };

        let stats = SummaryStats::from_rows(&rows);
        let change = match key.year {
            Some(year) => Query::year_over_year(table, &key.indicator, year)?,
            None => None,
        };

        let trend_region = key
            .highlight
            .clone()
            .or_else(|| stats.as_ref().map(|s| s.highest.region.clone()));
        let trend = match trend_region {
            Some(ref region) => Query::trend(table, &key.indicator, region)?,
            None => Vec::new(),
        };

        let values = Query::region_values(&rows);
        let reference_values = Query::region_values(&reference_rows);
        let map_scale =
            ValueScale::from_values(values.values().chain(reference_values.values()).copied());

        debug!(
            "View for {:?} {:?}: {} rows, {} map values",
            key.indicator,
            key.year,
            rows.len(),
            values.len()
        );

        Ok(Self {
            heatmap: Query::heatmap_grid(table, &key.indicator)?,
            mean: Query::yearly_mean(table, &key.indicator)?,
            key,
            rows,
            stats,
            change,
            trend_region,
            trend,
            values,
            reference_values,
            map_scale,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MapKey {
    indicator: String,
    year: Option<i64>,
    scale: (u64, u64),
    theme: ColorTheme,
    size: (u32, u32),
}

struct MapTexture {
    texture: TextureHandle,
    rendered: RenderedMap,
}

/// Central dashboard panel.
#[derive(Default)]
pub struct DashboardView {
    maps: HashMap<MapKey, MapTexture>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop cached map textures, e.g. after new shapes were loaded.
    pub fn clear(&mut self) {
        self.maps.clear();
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        view: Option<&ViewModel>,
        shapes: Option<&RegionShapes>,
        selection: &Selection,
        is_loading: bool,
    ) {
        let lang = selection.language;
        let Some(view) = view else {
            ui.centered_and_justified(|ui| {
                let key = if is_loading { Key::Loading } else { Key::NoData };
                ui.label(RichText::new(text(key, lang)).size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new(text(Key::AppTitle, lang))
                        .size(26.0)
                        .strong(),
                );
                ui.add_space(10.0);

                Self::draw_descriptions(ui, &view.key.indicator, lang);
                ui.add_space(15.0);
                Self::draw_metrics(ui, view, lang);
                ui.add_space(15.0);
                ui.separator();

                Self::draw_chart(ui, view, selection);
                ui.add_space(10.0);
                Self::draw_lookup(ui, view, lang);
                ui.add_space(10.0);
                ui.separator();

                Self::draw_table(ui, view, lang);
                ui.add_space(15.0);
                ui.separator();

                self.draw_maps(ui, view, shapes, selection);
            });
    }

    fn draw_descriptions(ui: &mut egui::Ui, indicator: &str, lang: Language) {
        let description = describe(indicator, lang);
        ui.columns(2, |columns| {
            let ui = &mut columns[0];
            ui.label(RichText::new(text(Key::AboutTitle, lang)).size(18.0).strong());
            for paragraph in about_paragraphs(lang) {
                ui.label(paragraph);
                ui.add_space(4.0);
            }

            let ui = &mut columns[1];
            ui.label(RichText::new(&description.title).size(18.0).strong());
            if let Some(ref sentence) = description.theme_sentence {
                ui.label(sentence);
            }
            if !description.note.is_empty() {
                ui.add_space(4.0);
                ui.label(RichText::new(&description.note).size(12.0).color(Color32::GRAY));
            }
        });
    }

    fn draw_metrics(ui: &mut egui::Ui, view: &ViewModel, lang: Language) {
        ui.columns(4, |columns| {
            match view.stats {
                Some(ref stats) => {
                    let extremes = [
                        (Key::Highest, &stats.highest),
                        (Key::Lowest, &stats.lowest),
                    ];
                    for (ui, (key, extreme)) in columns.iter_mut().zip(extremes) {
                        let detail =
                            format!("{} ({})", extreme.region, format_value(extreme.value));
                        ChartPlotter::draw_metric(
                            ui,
                            text(key, lang),
                            &format_number(extreme.value),
                            Some(&detail),
                        );
                    }
                }
                None => {
                    columns[0].label(text(Key::NoData, lang));
                }
            }

            match view.change {
                Some(change) => {
                    let since = format!(
                        "{} ({})",
                        text(Key::SincePreviousYear, lang),
                        change.previous_year
                    );
                    ChartPlotter::draw_donut(
                        &mut columns[2],
                        change.rising_percent(),
                        &format!("{} {}", text(Key::Rising, lang), since),
                        DonutColor::Green,
                    );
                    ChartPlotter::draw_donut(
                        &mut columns[3],
                        change.falling_percent(),
                        &format!("{} {}", text(Key::Falling, lang), since),
                        DonutColor::Red,
                    );
                }
                None => {
                    columns[2].label(
                        RichText::new(text(Key::NoPreviousYear, lang)).color(Color32::GRAY),
                    );
                }
            }
        });
    }

    fn draw_chart(ui: &mut egui::Ui, view: &ViewModel, selection: &Selection) {
        let lang = selection.language;
        let title = display_label(&view.key.indicator, lang);
        ui.label(RichText::new(&title).size(16.0).strong());
        ui.add_space(5.0);

        match selection.chart {
            ChartKind::Bar => ChartPlotter::draw_bar_chart(
                ui,
                "main",
                &view.rows,
                selection.theme,
                view.key.highlight.as_deref(),
                CHART_HEIGHT,
            ),
            ChartKind::Heatmap => {
                ScrollArea::vertical()
                    .id_salt("heatmap_scroll")
                    .max_height(CHART_HEIGHT + 100.0)
                    .show(ui, |ui| {
                        ChartPlotter::draw_heatmap(
                            ui,
                            &view.heatmap,
                            selection.theme,
                            text(Key::YearLabel, lang),
                        );
                    });
            }
            ChartKind::Trend => {
                let region = view.trend_region.as_deref().unwrap_or_default();
                ChartPlotter::draw_trend(
                    ui,
                    "main",
                    &view.trend,
                    &view.mean,
                    region,
                    text(Key::Average, lang),
                    selection.theme.sample_color32(0.8),
                    CHART_HEIGHT,
                );
            }
        }
    }

    fn draw_lookup(ui: &mut egui::Ui, view: &ViewModel, lang: Language) {
        let Some(ref region) = view.key.highlight else {
            return;
        };
        let year = view.key.year.map(|y| y.to_string()).unwrap_or_default();
        match Query::value_for(&view.rows, region) {
            Some(value) => {
                ui.label(
                    RichText::new(format!(
                        "{} {} ({}): {}",
                        text(Key::ValueFor, lang),
                        region,
                        year,
                        format_value(value)
                    ))
                    .size(14.0)
                    .color(HIGHLIGHT_COLOR),
                );
            }
            None => {
                ui.label(
                    RichText::new(format!("{} {} ({})", text(Key::NoValueFor, lang), region, year))
                        .size(14.0)
                        .color(Color32::from_rgb(255, 165, 0)),
                );
            }
        }
    }

    fn draw_table_rows(ui: &mut egui::Ui, view: &ViewModel, lang: Language) {
        for key in [Key::TableRegion, Key::TableYear, Key::TableValue] {
            ui.label(RichText::new(text(key, lang)).strong().size(12.0));
        }
        ui.end_row();

        let default_text_color = ui.visuals().text_color();
        for row in &view.rows {
            let highlighted = view.key.highlight.as_deref() == Some(row.region.as_str());
            let color = if highlighted {
                HIGHLIGHT_COLOR
            } else {
                default_text_color
            };
            let year = row.year.map(|y| y.to_string()).unwrap_or_default();
            let value = row.value.map(format_value).unwrap_or_else(|| "-".into());
            ui.label(RichText::new(&row.region).size(12.0).color(color));
            ui.label(RichText::new(year).size(12.0));
            ui.label(RichText::new(value).size(12.0));
            ui.end_row();
        }
    }

    fn draw_table(ui: &mut egui::Ui, view: &ViewModel, lang: Language) {
        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.set_width((ui.available_width() * 0.6).max(300.0));
                ScrollArea::vertical()
                    .id_salt("data_table_scroll")
                    .max_height(TABLE_HEIGHT)
                    .show(ui, |ui| {
                        egui::Grid::new("data_table")
                            .striped(true)
                            .min_col_width(80.0)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| Self::draw_table_rows(ui, view, lang));
                    });
            });

            ui.add_space(20.0);
            if let Some(ref stats) = view.stats {
                Self::draw_stats_table(ui, stats, lang);
            }
        });
    }

    fn draw_stats_table(ui: &mut egui::Ui, stats: &SummaryStats, lang: Language) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(text(Key::Statistics, lang)).strong().size(13.0));
                egui::Grid::new("stats_table")
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        let std_dev = stats.std_dev.map(format_value).unwrap_or_else(|| "-".into());
                        let lines = [
                            (text(Key::Count, lang), stats.count.to_string()),
                            (text(Key::Mean, lang), format_value(stats.mean)),
                            (text(Key::Median, lang), format_value(stats.median)),
                            (text(Key::StdDev, lang), std_dev),
                            ("Q1", format_value(stats.q1)),
                            ("Q3", format_value(stats.q3)),
                        ];
                        for (name, value) in lines {
                            ui.label(RichText::new(name).size(11.0));
                            ui.label(RichText::new(value).size(11.0));
                            ui.end_row();
                        }
                    });
            });
    }

    fn draw_maps(
        &mut self,
        ui: &mut egui::Ui,
        view: &ViewModel,
        shapes: Option<&RegionShapes>,
        selection: &Selection,
    ) {
        let lang = selection.language;
        ui.label(RichText::new(text(Key::Maps, lang)).size(16.0).strong());

        let (Some(shapes), Some(scale)) = (shapes, view.map_scale) else {
            ui.label(RichText::new(text(Key::MapsUnavailable, lang)).color(Color32::GRAY));
            return;
        };

        // Snap to 50 px so resizing does not re-render every frame
        let column_width = ((ui.available_width() - 20.0) / 2.0).clamp(200.0, 700.0);
        let width = ((column_width / 50.0).floor() * 50.0) as u32;
        let size = (width, width * 6 / 5);

        if self.maps.len() > MAP_CACHE_LIMIT {
            self.maps.clear();
        }

        let panels = [
            (view.key.year, &view.values),
            (view.key.reference_year, &view.reference_values),
        ];
        ui.columns(2, |columns| {
            for (ui, (year, values)) in columns.iter_mut().zip(panels) {
                let heading = year.map(|y| y.to_string()).unwrap_or_default();
                ui.label(RichText::new(heading).size(14.0).strong());

                let key = MapKey {
                    indicator: view.key.indicator.clone(),
                    year,
                    scale: (scale.min.to_bits(), scale.max.to_bits()),
                    theme: selection.theme,
                    size,
                };
                let Some(map) =
                    self.map_texture(ui.ctx(), key, shapes, values, scale, selection.theme)
                else {
                    ui.label(RichText::new(text(Key::MapsUnavailable, lang)).color(Color32::GRAY));
                    continue;
                };
                Self::draw_map_image(ui, map, shapes, values, lang);
            }
        });

        ui.add_space(5.0);
        ChartPlotter::draw_color_legend(ui, selection.theme, scale, 300.0);
    }

    fn map_texture(
        &mut self,
        ctx: &egui::Context,
        key: MapKey,
        shapes: &RegionShapes,
        values: &HashMap<String, f64>,
        scale: ValueScale,
        theme: ColorTheme,
    ) -> Option<&MapTexture> {
        if !self.maps.contains_key(&key) {
            let rendered = ChoroplethRenderer::render(shapes, values, scale, theme, key.size);
            let rendered = match rendered {
                Ok(rendered) => rendered,
                Err(e) => {
                    warn!("Map rendering failed: {}", e);
                    return None;
                }
            };
            let (w, h) = rendered.image.dimensions();
            let image = ColorImage::from_rgb([w as usize, h as usize], rendered.image.as_raw());
            let name = format!("map_{}_{:?}", key.indicator, key.year);
            let texture = ctx.load_texture(name, image, TextureOptions::LINEAR);
            self.maps.insert(key.clone(), MapTexture { texture, rendered });
        }
        self.maps.get(&key)
    }

    fn draw_map_image(
        ui: &mut egui::Ui,
        map: &MapTexture,
        shapes: &RegionShapes,
        values: &HashMap<String, f64>,
        lang: Language,
    ) {
        let (w, h) = map.rendered.image.dimensions();
        let response = ui.add(
            egui::Image::new(&map.texture)
                .fit_to_exact_size(egui::vec2(w as f32, h as f32))
                .sense(egui::Sense::hover()),
        );

        let Some(pos) = response.hover_pos() else {
            return;
        };
        let rect = response.rect;
        let px = (pos.x - rect.min.x) as f64 * w as f64 / rect.width() as f64;
        let py = (pos.y - rect.min.y) as f64 * h as f64 / rect.height() as f64;
        let world = map.rendered.viewport.to_world((px, py));

        if let Some(region) = hit_test(shapes, world) {
            let value = values
                .get(region)
                .map(|v| format_value(*v))
                .unwrap_or_else(|| text(Key::NoData, lang).to_string());
            response.on_hover_text(format!("{}\n{}", region, value));
        }
    }
}
