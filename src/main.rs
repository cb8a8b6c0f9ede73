// External crates
use anyhow::{Context, Result};
use serde::Serialize;
use std::env;
use std::path::Path;

// Library modules
use stockcast::cache::{ForecastCache, ForecastKey};
use stockcast::forecaster::{forecast, ForecastMethod};
use stockcast::progress::LogProgress;
use stockcast::util::pre_processor;

#[derive(Serialize)]
struct ForecastReport<'a> {
    symbol: &'a str,
    interval: &'a str,
    column: &'a str,
    method: &'a str,
    periods: usize,
    computed_at: String,
    predictions: &'a [f64],
}

fn main() -> Result<()> {
    // Accept csv path, target column, horizon and method as arguments
    let args: Vec<String> = env::args().collect();
    let csv_path = args.get(1).map(|s| s.as_str()).unwrap_or("AAPL_daily_ohlcv.csv");
    let column = args.get(2).map(|s| s.as_str()).unwrap_or("close");
    let periods: usize = args
        .get(3)
        .map(|s| s.parse())
        .transpose()
        .context("periods must be a positive integer")?
        .unwrap_or(10);
    let method: ForecastMethod = args
        .get(4)
        .map(|s| s.parse())
        .transpose()
        .map_err(anyhow::Error::msg)?
        .unwrap_or(ForecastMethod::Lstm);
    let interval = "1d";

    let symbol = Path::new(csv_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    println!(
        "Forecasting {} steps of '{}' for {} with the {} method",
        periods, column, symbol, method
    );

    let df = pre_processor::load_and_preprocess(csv_path)?;
    println!("Loaded {} rows from {}", df.height(), csv_path);

    let mut cache = ForecastCache::new();
    let key = ForecastKey::new(symbol.as_str(), interval, column, method);

    if cache.get(&key).is_none() {
        let mut sink = LogProgress;
        let predictions = forecast(&df, column, periods, method, &mut sink)?;
        cache.insert(key.clone(), predictions);
    }
    let record = cache.get(&key).expect("forecast was just cached");

    let report = ForecastReport {
        symbol: &symbol,
        interval,
        column,
        method: method.as_str(),
        periods,
        computed_at: record.computed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        predictions: &record.values,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    for (step, value) in record.values.iter().enumerate() {
        println!("Step {}: {:.2}", step + 1, value);
    }

    Ok(())
}
