//! Indicator Query Module
//! Equality filters, one sort and a column projection over the indicator table.

use super::loader::{IndicatorTable, COL_LABEL, COL_REGION, COL_VALUE, COL_YEAR};
use log::warn;
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Sort direction for the value column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

/// One row of the projected view.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub region: String,
    pub year: Option<i64>,
    pub value: Option<f64>,
}

/// Selection applied to the table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorQuery {
    pub indicator: String,
    pub year: Option<i64>,
    pub sort: SortOrder,
}

impl IndicatorQuery {
    pub fn new(indicator: impl Into<String>, year: Option<i64>) -> Self {
        Self {
            indicator: indicator.into(),
            year,
            sort: SortOrder::default(),
        }
    }
}

/// Region × year matrix of max(waarde).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatmapGrid {
    pub regions: Vec<String>,
    pub years: Vec<i64>,
    /// Row-major: `regions.len()` rows of `years.len()` cells
    pub cells: Vec<Option<f64>>,
}

impl HeatmapGrid {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.regions.len() || col >= self.years.len() {
            return None;
        }
        self.cells[row * self.years.len() + col]
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() || self.years.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().flatten().copied()
    }
}

/// Regions that rose or fell relative to the previous available year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSummary {
    pub previous_year: i64,
    pub compared: usize,
    pub rising: usize,
    pub falling: usize,
}

impl ChangeSummary {
    pub fn rising_percent(&self) -> u32 {
        Self::percent(self.rising, self.compared)
    }

    pub fn falling_percent(&self) -> u32 {
        Self::percent(self.falling, self.compared)
    }

    fn percent(part: usize, whole: usize) -> u32 {
        if whole == 0 {
            0
        } else {
            ((part as f64 / whole as f64) * 100.0).round() as u32
        }
    }
}

/// Stateless selections over an [`IndicatorTable`].
pub struct Query;

impl Query {
    fn label_filter(indicator: &str) -> Expr {
        col(COL_LABEL).eq(lit(indicator))
    }

    /// The value column with NaN turned into null, so aggregations skip it.
    fn valid_values() -> Expr {
        col(COL_VALUE).fill_nan(lit(NULL))
    }

    /// Distinct years available for an indicator, ascending.
    pub fn years_for(table: &IndicatorTable, indicator: &str) -> Result<Vec<i64>, QueryError> {
        let df = table
            .dataframe()
            .clone()
            .lazy()
            .filter(Self::label_filter(indicator))
            .select([col(COL_YEAR)])
            .collect()?;

        let years: BTreeSet<i64> = df.column(COL_YEAR)?.i64()?.into_iter().flatten().collect();
        Ok(years.into_iter().collect())
    }

    /// Filter by indicator (and year), sort by value, project region/year/value.
    ///
    /// Rows without a value always come last; ties keep table order.
    pub fn filter(
        table: &IndicatorTable,
        query: &IndicatorQuery,
    ) -> Result<Vec<IndicatorRow>, QueryError> {
        let mut predicate = Self::label_filter(&query.indicator);
        if let Some(year) = query.year {
            predicate = predicate.and(col(COL_YEAR).eq(lit(year)));
        }

        let sort_options = SortMultipleOptions::default()
            .with_order_descending(query.sort == SortOrder::Descending)
            .with_nulls_last(true)
            .with_maintain_order(true);

        let df = table
            .dataframe()
            .clone()
            .lazy()
            .filter(predicate)
            .sort([COL_VALUE], sort_options)
            .select([col(COL_REGION), col(COL_YEAR), col(COL_VALUE)])
            .collect()?;

        let mut rows = Self::rows_from_frame(&df)?;
        // NaN sorts as the largest float; push it behind real values with the nulls
        rows.sort_by_key(|row| row.value.is_none());
        Ok(rows)
    }

    /// Rows without a region name are kept with an empty `region`.
    fn rows_from_frame(df: &DataFrame) -> Result<Vec<IndicatorRow>, QueryError> {
        let regions = df.column(COL_REGION)?.str()?;
        let years = df.column(COL_YEAR)?.i64()?;
        let values = df.column(COL_VALUE)?.f64()?;

        let unnamed = regions.null_count();
        if unnamed > 0 {
            warn!("{} selected rows have no {}", unnamed, COL_REGION);
        }

        Ok(regions
            .into_iter()
            .zip(years)
            .zip(values)
            .map(|((region, year), value)| IndicatorRow {
                region: region.unwrap_or_default().to_string(),
                year,
                value: value.filter(|v| v.is_finite()),
            })
            .collect())
    }

    /// Guarded lookup of a region's value in a filtered view.
    pub fn value_for(rows: &[IndicatorRow], region: &str) -> Option<f64> {
        let region = region.trim();
        if region.is_empty() {
            return None;
        }
        rows.iter()
            .find(|row| row.region.trim() == region)
            .and_then(|row| row.value)
    }

    /// Region name to value for the map join. Duplicate regions keep their
    /// largest value, like the heatmap cells; unnamed rows are left out.
    pub fn region_values(rows: &[IndicatorRow]) -> HashMap<String, f64> {
        let mut values: HashMap<String, f64> = HashMap::new();
        for row in rows {
            let region = row.region.trim();
            let Some(value) = row.value else {
                continue;
            };
            if region.is_empty() {
                continue;
            }
            values
                .entry(region.to_string())
                .and_modify(|v| *v = v.max(value))
                .or_insert(value);
        }
        values
    }

    /// max(waarde) per region and year for one indicator.
    pub fn heatmap_grid(
        table: &IndicatorTable,
        indicator: &str,
    ) -> Result<HeatmapGrid, QueryError> {
        let df = table
            .dataframe()
            .clone()
            .lazy()
            .filter(Self::label_filter(indicator))
            .with_column(Self::valid_values())
            .group_by([col(COL_REGION), col(COL_YEAR)])
            .agg([col(COL_VALUE).max()])
            .collect()?;

        let regions = df.column(COL_REGION)?.str()?;
        let years = df.column(COL_YEAR)?.i64()?;
        let values = df.column(COL_VALUE)?.f64()?;

        let mut cells_by_key: HashMap<(String, i64), f64> = HashMap::new();
        let mut region_set = BTreeSet::new();
        let mut year_set = BTreeSet::new();

        for ((region, year), value) in regions.into_iter().zip(years).zip(values) {
            let (Some(region), Some(year)) = (region, year) else {
                continue;
            };
            region_set.insert(region.to_string());
            year_set.insert(year);
            if let Some(v) = value.filter(|v| v.is_finite()) {
                cells_by_key.insert((region.to_string(), year), v);
            }
        }

        let regions: Vec<String> = region_set.into_iter().collect();
        let years: Vec<i64> = year_set.into_iter().collect();
        let cells = regions
            .iter()
            .flat_map(|r| {
                years
                    .iter()
                    .map(|y| cells_by_key.get(&(r.clone(), *y)).copied())
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(HeatmapGrid {
            regions,
            years,
            cells,
        })
    }

    /// Yearly values of one region, ascending by year.
    pub fn trend(
        table: &IndicatorTable,
        indicator: &str,
        region: &str,
    ) -> Result<Vec<(i64, f64)>, QueryError> {
        let df = table
            .dataframe()
            .clone()
            .lazy()
            .filter(Self::label_filter(indicator).and(col(COL_REGION).eq(lit(region))))
            .sort([COL_YEAR], SortMultipleOptions::default())
            .select([col(COL_YEAR), col(COL_VALUE)])
            .collect()?;
        Self::year_value_pairs(&df)
    }

    /// Mean across all regions per year, ascending by year.
    pub fn yearly_mean(
        table: &IndicatorTable,
        indicator: &str,
    ) -> Result<Vec<(i64, f64)>, QueryError> {
        let df = table
            .dataframe()
            .clone()
            .lazy()
            .filter(Self::label_filter(indicator))
            .with_column(Self::valid_values())
            .group_by([col(COL_YEAR)])
            .agg([col(COL_VALUE).mean()])
            .sort([COL_YEAR], SortMultipleOptions::default())
            .collect()?;
        Self::year_value_pairs(&df)
    }

    fn year_value_pairs(df: &DataFrame) -> Result<Vec<(i64, f64)>, QueryError> {
        let years = df.column(COL_YEAR)?.i64()?;
        let values = df.column(COL_VALUE)?.f64()?;
        Ok(years
            .into_iter()
            .zip(values)
            .filter_map(|(y, v)| Some((y?, v.filter(|v| v.is_finite())?)))
            .collect())
    }

    /// Compare each region's value in `year` with the previous available year.
    ///
    /// Returns `None` when there is no earlier year for the indicator.
    pub fn year_over_year(
        table: &IndicatorTable,
        indicator: &str,
        year: i64,
    ) -> Result<Option<ChangeSummary>, QueryError> {
        let years = Self::years_for(table, indicator)?;
        let Some(previous_year) = years.into_iter().filter(|y| *y < year).max() else {
            return Ok(None);
        };

        let current = Self::filter(table, &IndicatorQuery::new(indicator, Some(year)))?;
        let previous = Self::filter(table, &IndicatorQuery::new(indicator, Some(previous_year)))?;

        let previous_by_region: HashMap<&str, f64> = previous
            .iter()
            .filter(|row| !row.region.is_empty())
            .filter_map(|row| Some((row.region.as_str(), row.value?)))
            .collect();

        let mut summary = ChangeSummary {
            previous_year,
            compared: 0,
            rising: 0,
            falling: 0,
        };
        for row in &current {
            let (Some(now), Some(before)) = (row.value, previous_by_region.get(row.region.as_str()))
            else {
                continue;
            };
            summary.compared += 1;
            if now > *before {
                summary.rising += 1;
            } else if now < *before {
                summary.falling += 1;
            }
        }
        Ok(Some(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> IndicatorTable {
        let df = df!(
            "label" => [
                "Werkloosheid",
                "Werkloosheid",
                "Werkloosheid",
                "Werkloosheid",
                "Werkloosheid",
                "Werkloosheid",
                "Overgewicht",
            ],
            "jaar" => [2021i64, 2021, 2021, 2022, 2022, 2022, 2022],
            "waarde" => [Some(4.0), Some(5.0), Some(3.0), Some(3.5), None, Some(3.5), Some(50.0)],
            "statnaam" => ["Assen", "Groningen", "Emmen", "Assen", "Groningen", "Emmen", "Assen"],
        )
        .unwrap();
        IndicatorTable::from_dataframe(df).unwrap()
    }

    #[test]
    fn years_are_distinct_and_sorted() {
        let table = sample_table();
        assert_eq!(Query::years_for(&table, "Werkloosheid").unwrap(), vec![2021, 2022]);
        assert_eq!(Query::years_for(&table, "Overgewicht").unwrap(), vec![2022]);
        assert!(Query::years_for(&table, "Onbekend").unwrap().is_empty());
    }

    #[test]
    fn filter_sorts_descending_with_nulls_last() {
        let table = sample_table();
        let rows = Query::filter(&table, &IndicatorQuery::new("Werkloosheid", Some(2022))).unwrap();
        let regions: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
        // Assen and Emmen tie; input order is kept
        assert_eq!(regions, vec!["Assen", "Emmen", "Groningen"]);
        assert_eq!(rows[2].value, None);
        assert!(rows.iter().all(|r| r.year == Some(2022)));
    }

    #[test]
    fn filter_ascending_without_year() {
        let table = sample_table();
        let query = IndicatorQuery {
            indicator: "Werkloosheid".to_string(),
            year: None,
            sort: SortOrder::Ascending,
        };
        let rows = Query::filter(&table, &query).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].value, Some(3.0));
        assert_eq!(rows[5].value, None);
    }

    #[test]
    fn value_lookup_falls_back_to_none() {
        let table = sample_table();
        let rows = Query::filter(&table, &IndicatorQuery::new("Werkloosheid", Some(2021))).unwrap();
        assert_eq!(Query::value_for(&rows, "Groningen"), Some(5.0));
        assert_eq!(Query::value_for(&rows, " Emmen "), Some(3.0));
        assert_eq!(Query::value_for(&rows, "Zwolle"), None);
    }

    #[test]
    fn rows_without_region_are_kept() {
        let df = df!(
            "label" => ["A", "A", "A"],
            "jaar" => [2022i64, 2022, 2021],
            "waarde" => [3.0, 2.0, 1.0],
            "statnaam" => [None, Some("X"), Some("X")],
        )
        .unwrap();
        let table = IndicatorTable::from_dataframe(df).unwrap();
        let rows = Query::filter(&table, &IndicatorQuery::new("A", Some(2022))).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].region, "");
        assert_eq!(rows[0].value, Some(3.0));
        assert_eq!(Query::value_for(&rows, ""), None);
        assert_eq!(Query::region_values(&rows).len(), 1);

        // The unnamed row is not compared against any region
        let summary = Query::year_over_year(&table, "A", 2022).unwrap().unwrap();
        assert_eq!(summary.compared, 1);
    }

    #[test]
    fn region_values_skip_nulls_and_keep_max() {
        let row = |region: &str, value| IndicatorRow {
            region: region.into(),
            year: Some(2022),
            value,
        };
        let rows = vec![
            row("Assen", Some(1.0)),
            row("Assen ", Some(9.0)),
            row("Emmen", None),
        ];
        let values = Query::region_values(&rows);
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("Assen"), Some(&9.0));
    }

    #[test]
    fn heatmap_takes_max_per_cell() {
        let df = df!(
            "label" => ["A", "A", "A", "A"],
            "jaar" => [2020i64, 2020, 2021, 2021],
            "waarde" => [1.0, 7.0, 2.0, 3.0],
            "statnaam" => ["X", "X", "X", "Y"],
        )
        .unwrap();
        let table = IndicatorTable::from_dataframe(df).unwrap();
        let grid = Query::heatmap_grid(&table, "A").unwrap();
        assert_eq!(grid.regions, vec!["X", "Y"]);
        assert_eq!(grid.years, vec![2020, 2021]);
        assert_eq!(grid.get(0, 0), Some(7.0));
        assert_eq!(grid.get(0, 1), Some(2.0));
        assert_eq!(grid.get(1, 0), None);
        assert_eq!(grid.get(1, 1), Some(3.0));
        assert_eq!(grid.get(5, 0), None);
    }

    #[test]
    fn nan_values_do_not_poison_aggregates() {
        let df = df!(
            "label" => ["A", "A", "A", "A"],
            "jaar" => [2021i64, 2021, 2022, 2022],
            "waarde" => [1.0, f64::NAN, 2.0, 3.0],
            "statnaam" => ["X", "X", "X", "Y"],
        )
        .unwrap();
        let table = IndicatorTable::from_dataframe(df).unwrap();

        assert_eq!(
            Query::yearly_mean(&table, "A").unwrap(),
            vec![(2021, 1.0), (2022, 2.5)]
        );
        let grid = Query::heatmap_grid(&table, "A").unwrap();
        assert_eq!(grid.get(0, 0), Some(1.0));
    }

    #[test]
    fn trend_and_mean_follow_years() {
        let table = sample_table();
        assert_eq!(
            Query::trend(&table, "Werkloosheid", "Assen").unwrap(),
            vec![(2021, 4.0), (2022, 3.5)]
        );
        assert_eq!(
            Query::yearly_mean(&table, "Werkloosheid").unwrap(),
            vec![(2021, 4.0), (2022, 3.5)]
        );
    }

    #[test]
    fn year_over_year_counts_changes() {
        let table = sample_table();
        let summary = Query::year_over_year(&table, "Werkloosheid", 2022)
            .unwrap()
            .unwrap();
        assert_eq!(summary.previous_year, 2021);
        // Groningen has no 2022 value
        assert_eq!(summary.compared, 2);
        assert_eq!(summary.rising, 1);
        assert_eq!(summary.falling, 1);
        assert_eq!(summary.rising_percent(), 50);

        assert!(Query::year_over_year(&table, "Werkloosheid", 2021)
            .unwrap()
            .is_none());
    }
}
