//! Summary Statistics Module
//! Descriptive statistics over the values of a filtered selection.

use crate::data::IndicatorRow;
use statrs::statistics::{Data, Distribution, OrderStatistics};

/// A region together with its value.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionValue {
    pub region: String,
    pub value: f64,
}

/// Descriptive statistics for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// `None` with fewer than two values
    pub std_dev: Option<f64>,
    pub q1: f64,
    pub q3: f64,
    pub lowest: RegionValue,
    pub highest: RegionValue,
}

impl SummaryStats {
    /// Statistics over the rows that carry a value; `None` if there are none.
    pub fn from_rows(rows: &[IndicatorRow]) -> Option<Self> {
        let valued: Vec<(&str, f64)> = rows
            .iter()
            .filter_map(|row| Some((row.region.as_str(), row.value.filter(|v| v.is_finite())?)))
            .collect();

        let (first_region, first_value) = *valued.first()?;
        let mut lowest = RegionValue {
            region: first_region.to_string(),
            value: first_value,
        };
        let mut highest = lowest.clone();
        for &(region, value) in &valued[1..] {
            if value < lowest.value {
                lowest = RegionValue {
                    region: region.to_string(),
                    value,
                };
            }
            if value > highest.value {
                highest = RegionValue {
                    region: region.to_string(),
                    value,
                };
            }
        }

        let mut data = Data::new(valued.iter().map(|(_, v)| *v).collect::<Vec<f64>>());
        let count = data.len();
        let mean = data.mean().unwrap_or(f64::NAN);
        let std_dev = if count > 1 {
            data.std_dev().filter(|s| s.is_finite())
        } else {
            None
        };
        let median = data.median();
        let q1 = data.lower_quartile();
        let q3 = data.upper_quartile();

        Some(Self {
            count,
            mean,
            median,
            std_dev,
            q1,
            q3,
            lowest,
            highest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(region: &str, value: Option<f64>) -> IndicatorRow {
        IndicatorRow {
            region: region.to_string(),
            year: Some(2022),
            value,
        }
    }

    #[test]
    fn summarizes_valued_rows() {
        let rows = vec![
            row("Assen", Some(2.0)),
            row("Emmen", Some(4.0)),
            row("Groningen", None),
            row("Zwolle", Some(9.0)),
            row("Hoorn", Some(f64::NAN)),
        ];
        let stats = SummaryStats::from_rows(&rows).unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert_eq!(stats.median, 4.0);
        assert!((stats.std_dev.unwrap() - 13.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.lowest.region, "Assen");
        assert_eq!(stats.highest, RegionValue { region: "Zwolle".into(), value: 9.0 });
        assert!(stats.q1 <= stats.median && stats.median <= stats.q3);
    }

    #[test]
    fn single_value_has_no_spread() {
        let stats = SummaryStats::from_rows(&[row("Assen", Some(3.0))]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.std_dev, None);
        assert_eq!(stats.lowest, stats.highest);
    }

    #[test]
    fn empty_selection_has_no_stats() {
        assert!(SummaryStats::from_rows(&[]).is_none());
        assert!(SummaryStats::from_rows(&[row("Assen", None)]).is_none());
    }
}
