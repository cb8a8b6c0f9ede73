// External crates
use burn_ndarray::NdArrayDevice;
use polars::prelude::*;

// Internal modules
use crate::additive::step_1_decomposition::AdditiveModel;
use crate::constants::{TRAIN_SPLIT_RATIO, WINDOW_SIZE};
use crate::error::{ForecastError, Result};
use crate::lstm::step_1_data_preparation::{
    smooth_series, split_samples, window_series, MinMaxScaler,
};
use crate::lstm::step_4_train_model::{train_model, TrainingConfig};
use crate::lstm::step_5_prediction::{denormalize_predictions, rollout};
use crate::progress::ProgressSink;

/// Forecasting method selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastMethod {
    /// Stacked recurrent model with autoregressive rollout
    Lstm,
    /// Classical additive trend + seasonality decomposition
    Additive,
}

impl ForecastMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::Lstm => "lstm",
            ForecastMethod::Additive => "additive",
        }
    }
}

impl std::str::FromStr for ForecastMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lstm" => Ok(ForecastMethod::Lstm),
            "additive" | "trend" => Ok(ForecastMethod::Additive),
            other => Err(format!("unknown forecast method '{}'", other)),
        }
    }
}

impl std::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for the additive method
#[derive(Debug, Clone)]
pub struct AdditiveConfig {
    pub season_length: usize,
}

impl Default for AdditiveConfig {
    fn default() -> Self {
        Self { season_length: 7 }
    }
}

/// Produces `periods` future point predictions for `target_column`
///
/// Blocking: the call owns its model and rollout buffer exclusively and
/// returns only once every training pass and rollout step has finished.
/// On success the result always holds exactly `periods` values in the
/// original price units.
pub fn forecast(
    df: &DataFrame,
    target_column: &str,
    periods: usize,
    method: ForecastMethod,
    sink: &mut dyn ProgressSink,
) -> Result<Vec<f64>> {
    forecast_with_config(
        df,
        target_column,
        periods,
        method,
        &TrainingConfig::default(),
        &AdditiveConfig::default(),
        sink,
    )
}

/// [`forecast`] with explicit method configuration
pub fn forecast_with_config(
    df: &DataFrame,
    target_column: &str,
    periods: usize,
    method: ForecastMethod,
    training: &TrainingConfig,
    additive: &AdditiveConfig,
    sink: &mut dyn ProgressSink,
) -> Result<Vec<f64>> {
    // Horizon is validated before the series is touched
    if periods == 0 {
        return Err(ForecastError::InvalidPeriods(periods));
    }
    if !df.schema().contains(target_column) {
        return Err(ForecastError::InvalidColumn(target_column.to_string()));
    }

    match method {
        ForecastMethod::Lstm => forecast_lstm(df, target_column, periods, training, sink),
        ForecastMethod::Additive => forecast_additive(df, target_column, periods, additive, sink),
    }
}

fn forecast_lstm(
    df: &DataFrame,
    target_column: &str,
    periods: usize,
    config: &TrainingConfig,
    sink: &mut dyn ProgressSink,
) -> Result<Vec<f64>> {
    let smoothed = smooth_series(df, target_column)?;
    let target = smoothed.column(target_column)?.f64()?.clone();

    let scaler = MinMaxScaler::fit(&target)?;
    let scaled = scaler.transform(&target);

    let samples = window_series(&scaled, WINDOW_SIZE)?;
    let (train, val) = split_samples(&samples, TRAIN_SPLIT_RATIO)?;
    log::info!(
        "prepared {} train / {} validation windows for '{}'",
        train.n_samples,
        val.n_samples,
        target_column
    );

    let device = NdArrayDevice::default();
    let (model, _stats) = train_model(&train, &val, config, &device, sink)?;

    // The newest validation window seeds the rollout buffer
    let predictions = rollout(&model, val.last_window(), periods, &device);
    Ok(denormalize_predictions(&scaler, &predictions))
}

fn forecast_additive(
    df: &DataFrame,
    target_column: &str,
    periods: usize,
    config: &AdditiveConfig,
    sink: &mut dyn ProgressSink,
) -> Result<Vec<f64>> {
    // The additive method consumes the raw series; no smoothing or scaling
    let values: Vec<f64> = df
        .column(target_column)?
        .f64()?
        .into_no_null_iter()
        .collect();

    let model = AdditiveModel::fit(&values, config.season_length)?;
    log::info!(
        "additive fit for '{}': slope {:.4} per step, cycle {}",
        target_column,
        model.slope(),
        model.season_length()
    );
    sink.report(1.0);

    Ok(model.forecast(periods))
}
