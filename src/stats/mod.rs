//! Stats module - Descriptive statistics of the current selection

mod summary;

pub use summary::SummaryStats;
