//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot and the egui painter.

use super::palette::{ColorTheme, DonutColor, ValueScale, NO_DATA_COLOR};
use crate::data::{HeatmapGrid, IndicatorRow};
use crate::format::format_value;
use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

/// Outline for the highlighted region
pub const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(231, 76, 60);

/// Mean line color in the trend chart
pub const MEAN_COLOR: Color32 = Color32::from_rgb(150, 150, 150);

const HEATMAP_ROW_HEIGHT: f32 = 14.0;
const HEATMAP_LABEL_WIDTH: f32 = 170.0;
const HEATMAP_HEADER_HEIGHT: f32 = 20.0;

/// The interchangeable main chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Heatmap,
    Trend,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Heatmap, ChartKind::Trend];
}

fn no_data_color32() -> Color32 {
    let [r, g, b] = NO_DATA_COLOR;
    Color32::from_rgb(r, g, b)
}

/// Creates the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Bar per region in the given (sorted) order, colored by value.
    pub fn draw_bar_chart(
        ui: &mut egui::Ui,
        id: &str,
        rows: &[IndicatorRow],
        theme: ColorTheme,
        highlight: Option<&str>,
        height: f32,
    ) {
        let valued: Vec<(&str, f64)> = rows
            .iter()
            .filter_map(|r| Some((r.region.as_str(), r.value?)))
            .collect();
        let scale = ValueScale::from_values(valued.iter().map(|(_, v)| *v))
            .unwrap_or(ValueScale::new(0.0, 1.0));

        let bars: Vec<Bar> = valued
            .iter()
            .enumerate()
            .map(|(i, (region, value))| {
                let mut bar = Bar::new(i as f64, *value)
                    .name(region)
                    .width(0.8)
                    .fill(theme.sample_color32(scale.normalize(*value)));
                if highlight == Some(*region) {
                    bar = bar.stroke(Stroke::new(2.0, HIGHLIGHT_COLOR));
                }
                bar
            })
            .collect();

        let labels: Vec<String> = valued.iter().map(|(r, _)| r.to_string()).collect();

        Plot::new(format!("bar_{}", id))
            .height(height)
            .allow_scroll(false)
            .allow_drag(true)
            .allow_zoom(true)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                if mark.value.fract() != 0.0 || mark.value < 0.0 {
                    return String::new();
                }
                labels.get(mark.value as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).element_formatter(Box::new(
                    |bar: &Bar, _chart: &BarChart| {
                        format!("{}\n{}", bar.name, format_value(bar.value))
                    },
                )));
            });
    }

    /// Region × year grid; hover shows region, year and value.
    pub fn draw_heatmap(
        ui: &mut egui::Ui,
        grid: &HeatmapGrid,
        theme: ColorTheme,
        year_label: &str,
    ) {
        if grid.is_empty() {
            return;
        }
        let scale = ValueScale::fitted(grid.values()).unwrap_or(ValueScale::new(0.0, 1.0));

        let cols = grid.years.len();
        let width = ui.available_width().max(HEATMAP_LABEL_WIDTH + 40.0);
        let cell_w = ((width - HEATMAP_LABEL_WIDTH) / cols as f32).max(4.0);
        let total = Vec2::new(
            HEATMAP_LABEL_WIDTH + cell_w * cols as f32,
            HEATMAP_HEADER_HEIGHT + HEATMAP_ROW_HEIGHT * grid.regions.len() as f32,
        );

        let (response, painter) = ui.allocate_painter(total, Sense::hover());
        let origin = response.rect.min;
        let text_color = ui.visuals().text_color();
        let small = FontId::proportional(10.0);
        let grid_stroke = Stroke::new(0.25, Color32::BLACK);

        for (c, year) in grid.years.iter().enumerate() {
            let x = origin.x + HEATMAP_LABEL_WIDTH + cell_w * (c as f32 + 0.5);
            painter.text(
                Pos2::new(x, origin.y + HEATMAP_HEADER_HEIGHT / 2.0),
                Align2::CENTER_CENTER,
                year,
                small.clone(),
                text_color,
            );
        }

        let clip = ui.clip_rect();
        for (r, region) in grid.regions.iter().enumerate() {
            let y = origin.y + HEATMAP_HEADER_HEIGHT + HEATMAP_ROW_HEIGHT * r as f32;
            if y + HEATMAP_ROW_HEIGHT < clip.min.y || y > clip.max.y {
                continue;
            }
            painter.text(
                Pos2::new(origin.x + HEATMAP_LABEL_WIDTH - 6.0, y + HEATMAP_ROW_HEIGHT / 2.0),
                Align2::RIGHT_CENTER,
                region,
                small.clone(),
                text_color,
            );
            for c in 0..cols {
                let cell = egui::Rect::from_min_size(
                    Pos2::new(origin.x + HEATMAP_LABEL_WIDTH + cell_w * c as f32, y),
                    Vec2::new(cell_w, HEATMAP_ROW_HEIGHT),
                );
                let fill = grid
                    .get(r, c)
                    .map(|v| theme.sample_color32(scale.normalize(v)))
                    .unwrap_or_else(no_data_color32);
                painter.rect_filled(cell, 0.0, fill);
                painter.rect_stroke(cell, 0.0, grid_stroke);
            }
        }

        if let Some(pos) = response.hover_pos() {
            let col = ((pos.x - origin.x - HEATMAP_LABEL_WIDTH) / cell_w).floor();
            let row = ((pos.y - origin.y - HEATMAP_HEADER_HEIGHT) / HEATMAP_ROW_HEIGHT).floor();
            if col >= 0.0 && row >= 0.0 {
                let (row, col) = (row as usize, col as usize);
                if let (Some(region), Some(year)) = (grid.regions.get(row), grid.years.get(col)) {
                    let value = grid
                        .get(row, col)
                        .map(format_value)
                        .unwrap_or_else(|| "-".into());
                    response.on_hover_text(format!(
                        "{}\n{} {}: {}",
                        region, year_label, year, value
                    ));
                }
            }
        }
    }

    /// Yearly line of one region against the all-region mean.
    pub fn draw_trend(
        ui: &mut egui::Ui,
        id: &str,
        trend: &[(i64, f64)],
        mean: &[(i64, f64)],
        region_label: &str,
        mean_label: &str,
        color: Color32,
        height: f32,
    ) {
        let to_points = |series: &[(i64, f64)]| -> Vec<[f64; 2]> {
            series.iter().map(|&(y, v)| [y as f64, v]).collect()
        };
        let trend_points = to_points(trend);
        let mean_points = to_points(mean);

        Plot::new(format!("trend_{}", id))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_formatter(|mark, _range| {
                if mark.value.fract() == 0.0 {
                    format!("{}", mark.value as i64)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                if !mean_points.is_empty() {
                    plot_ui.line(
                        Line::new(PlotPoints::from(mean_points.clone()))
                            .color(MEAN_COLOR)
                            .width(1.5)
                            .name(mean_label),
                    );
                }
                if !trend_points.is_empty() {
                    plot_ui.line(
                        Line::new(PlotPoints::from(trend_points.clone()))
                            .color(color)
                            .width(2.0)
                            .name(region_label),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(trend_points.clone()))
                            .radius(3.0)
                            .color(color),
                    );
                }
            });
    }

    /// Ring gauge: dark background ring, bright arc for `percent`, label in the middle.
    pub fn draw_donut(ui: &mut egui::Ui, percent: u32, caption: &str, color: DonutColor) {
        let (fg, bg) = color.colors();
        let size = 130.0;
        let thickness = 14.0;

        ui.vertical_centered(|ui| {
            let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::hover());
            let center = response.rect.center();
            let radius = size / 2.0 - thickness;

            painter.add(Shape::circle_stroke(center, radius, Stroke::new(thickness, bg)));

            let fraction = percent.min(100) as f32 / 100.0;
            if fraction > 0.0 {
                let steps = ((64.0 * fraction).ceil() as usize).max(2);
                let sweep = std::f32::consts::TAU * fraction;
                let start = -std::f32::consts::FRAC_PI_2;
                let points: Vec<Pos2> = (0..=steps)
                    .map(|i| {
                        let angle = start + sweep * i as f32 / steps as f32;
                        center + Vec2::angled(angle) * radius
                    })
                    .collect();
                painter.add(Shape::line(points, Stroke::new(thickness, fg)));
            }

            painter.text(
                center,
                Align2::CENTER_CENTER,
                format!("{} %", percent.min(100)),
                FontId::proportional(22.0),
                fg,
            );
            ui.label(RichText::new(caption).size(12.0));
        });
    }

    /// Metric card: label, big value, optional smaller line below.
    pub fn draw_metric(ui: &mut egui::Ui, label: &str, value: &str, detail: Option<&str>) {
        egui::Frame::none()
            .fill(Color32::from_rgb(0x39, 0x39, 0x39))
            .rounding(5.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(label).size(12.0).color(Color32::LIGHT_GRAY));
                    ui.label(RichText::new(value).size(24.0).strong().color(Color32::WHITE));
                    if let Some(detail) = detail {
                        ui.label(RichText::new(detail).size(11.0).color(Color32::GRAY));
                    }
                });
            });
    }

    /// Horizontal gradient bar with the scale's end values.
    pub fn draw_color_legend(ui: &mut egui::Ui, theme: ColorTheme, scale: ValueScale, width: f32) {
        let steps = 64;
        let height = 12.0;
        ui.horizontal(|ui| {
            ui.label(RichText::new(format_value(scale.min)).size(11.0));
            let (response, painter) =
                ui.allocate_painter(Vec2::new(width, height), Sense::hover());
            let rect = response.rect;
            let step_w = rect.width() / steps as f32;
            for i in 0..steps {
                let t = i as f64 / (steps - 1) as f64;
                let slice = egui::Rect::from_min_size(
                    Pos2::new(rect.min.x + step_w * i as f32, rect.min.y),
                    Vec2::new(step_w + 0.5, height),
                );
                painter.rect_filled(slice, 0.0, theme.sample_color32(t));
            }
            ui.label(RichText::new(format_value(scale.max)).size(11.0));
        });
    }
}
