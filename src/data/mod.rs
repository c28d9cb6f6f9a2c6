//! Data module - Indicator CSV loading and selections

mod loader;
mod query;

pub use loader::{
    CsvOptions, IndicatorLoader, IndicatorTable, LoaderError, COL_LABEL, COL_REGION, COL_VALUE,
    COL_YEAR,
};
pub use query::{
    ChangeSummary, HeatmapGrid, IndicatorQuery, IndicatorRow, Query, QueryError, SortOrder,
};
