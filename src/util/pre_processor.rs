// External crates
use anyhow::{bail, Context, Result};
use polars::prelude::*;
use std::path::Path;

// Local modules
use crate::constants::REQUIRED_COLUMNS;
use crate::util::file_utils::standardize_columns;

/// Loads and preprocesses a CSV of price bars into a DataFrame
///
/// Standardizes column names, verifies the required OHLCV columns are
/// present, sorts by the `time` column when one exists, and drops rows
/// with missing values.
pub fn load_and_preprocess<P: AsRef<Path>>(full_path: P) -> Result<DataFrame> {
    let path = full_path.as_ref();
    log::info!("loading series from {}", path.display());

    if !path.exists() {
        bail!("file not found: {}", path.display());
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let df = CsvReader::new(file)
        .finish()
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let mut df = standardize_columns(df)?;

    for &col in &REQUIRED_COLUMNS {
        if !df.schema().contains(col) {
            bail!("required column '{}' not found in {}", col, path.display());
        }
    }

    if df.schema().contains("time") {
        df = df.sort(vec!["time"], SortMultipleOptions::default())?;
    }

    let df = df.drop_nulls::<String>(None)?;
    log::info!("loaded {} rows", df.height());
    Ok(df)
}
