//! Export Module
//! Writes the filtered table as CSV and a rendered map as PNG.

use crate::data::{IndicatorRow, COL_REGION, COL_VALUE, COL_YEAR};
use image::{ImageFormat, RgbImage};
use log::{info, warn};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Nothing to export")]
    Empty,
}

/// Build the projected `statnaam`/`jaar`/`waarde` frame for a set of rows.
pub fn rows_to_dataframe(rows: &[IndicatorRow]) -> PolarsResult<DataFrame> {
    let regions: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
    let years: Vec<Option<i64>> = rows.iter().map(|r| r.year).collect();
    let values: Vec<Option<f64>> = rows.iter().map(|r| r.value).collect();

    df!(
        COL_REGION => regions,
        COL_YEAR => years,
        COL_VALUE => values,
    )
}

/// Write the rows as a `;` separated CSV with header.
pub fn export_table_csv(rows: &[IndicatorRow], path: &Path) -> Result<(), ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }
    let mut df = rows_to_dataframe(rows)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b';')
        .finish(&mut df)?;

    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn export_map_png(image: &RgbImage, path: &Path) -> Result<(), ExportError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ExportError::Empty);
    }
    image.save_with_format(path, ImageFormat::Png)?;
    info!(
        "Exported {}x{} map to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

/// Open the folder that contains `path` in the system file browser.
pub fn reveal_in_folder(path: &Path) {
    let Some(dir) = path.parent() else {
        return;
    };
    if let Err(e) = open::that(dir) {
        warn!("Could not open {}: {}", dir.display(), e);
    }
}
