// External crates
use polars::prelude::*;
use rustalib::util::file_utils::read_financial_data;
use std::path::Path;

/// Standardizes provider column names on a loaded frame
///
/// Maps case-insensitive aliases onto `{open, high, low, close, volume,
/// time, adjusted_close}`, casts volume to Float64, and falls back to
/// `close` when the provider carries no adjusted close.
pub fn standardize_columns(mut df: DataFrame) -> PolarsResult<DataFrame> {
    let mut rename_columns = Vec::new();

    for column_name in df.get_column_names() {
        let col_lower = column_name.to_lowercase();

        let standard_name = match col_lower.as_str() {
            "open" | "o" | "op" | "openprice" | "open_price" => "open",
            "high" | "h" | "highprice" | "high_price" | "max" => "high",
            "low" | "l" | "lowprice" | "low_price" | "min" => "low",
            "close" | "c" | "cl" | "closeprice" | "close_price" => "close",
            "volume" | "vol" | "v" | "volumes" => "volume",
            "timestamp" | "time" | "date" | "t" | "datetime" | "dt" | "day" => "time",
            "adj close" | "adj_close" | "adjusted close" | "adjusted_close" | "adjclose"
            | "adj" => "adjusted_close",
            _ => continue,
        };

        if column_name.as_str() != standard_name {
            rename_columns.push((column_name.to_string(), standard_name.to_string()));
        }
    }

    for (old_name, new_name) in rename_columns {
        df.rename(&old_name, PlSmallStr::from(new_name.as_str()))?;
    }
    // `DataFrame::rename` populates the cached schema (via its duplicate-name
    // check) before mutating the column in place, leaving the cache holding the
    // pre-rename names. Drop it so the schema lookups below — and the frame we
    // hand back — reflect the standardized names.
    df.clear_schema();

    if df.schema().contains("volume") {
        let volume = df.column("volume")?;
        if volume.dtype() != &DataType::Float64 {
            let volume_f64 = volume.cast(&DataType::Float64)?;
            df.with_column(volume_f64)?;
        }
    }

    // Providers without an adjusted close get the raw close as one
    if !df.schema().contains("adjusted_close") && df.schema().contains("close") {
        let close = df.column("close")?.clone();
        df.with_column(close.with_name("adjusted_close".into()))?;
    }

    log::debug!("standardized columns: {:?}", df.get_column_names());
    Ok(df)
}

/// Reads a CSV of price bars with standardized column names
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
///
/// # Returns
///
/// Returns the standardized DataFrame and the detected column metadata.
pub fn read_series_csv<P: AsRef<Path>>(
    file_path: P,
) -> PolarsResult<(DataFrame, rustalib::util::file_utils::FinancialColumns)> {
    let (df, metadata) = read_financial_data(file_path.as_ref().to_str().unwrap())?;
    Ok((standardize_columns(df)?, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_onto_standard_names() {
        let df = df!(
            "Date" => &["2024-01-02", "2024-01-03"],
            "Open" => &[1.0f64, 2.0],
            "High" => &[1.5f64, 2.5],
            "Low" => &[0.5f64, 1.5],
            "Close" => &[1.2f64, 2.2],
            "Adj Close" => &[1.1f64, 2.1],
            "Vol" => &[100i64, 200],
        )
        .unwrap();

        let out = standardize_columns(df).unwrap();
        for col in ["time", "open", "high", "low", "close", "adjusted_close", "volume"] {
            assert!(out.schema().contains(col), "missing '{}'", col);
        }
        assert_eq!(out.column("volume").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn adjusted_close_falls_back_to_close() {
        let df = df!(
            "close" => &[10.0f64, 11.0],
            "volume" => &[1.0f64, 2.0],
        )
        .unwrap();

        let out = standardize_columns(df).unwrap();
        let adj: Vec<f64> = out
            .column("adjusted_close")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(adj, vec![10.0, 11.0]);
    }

    #[test]
    fn unrelated_columns_pass_through_untouched() {
        let df = df!(
            "close" => &[10.0f64],
            "volume" => &[1.0f64],
            "sentiment" => &[0.3f64],
        )
        .unwrap();

        let out = standardize_columns(df).unwrap();
        assert!(out.schema().contains("sentiment"));
    }
}
