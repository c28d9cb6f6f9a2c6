//! Charts module - Color themes and dashboard charts

mod palette;
mod plotter;

pub use palette::{ColorTheme, DonutColor, ValueScale, NO_DATA_COLOR};
pub use plotter::{ChartKind, ChartPlotter, HIGHLIGHT_COLOR};
