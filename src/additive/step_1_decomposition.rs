// Internal imports
use crate::error::{ForecastError, Result};

/// Additive trend + seasonality model
///
/// Classical decomposition of a series into a least-squares linear trend
/// over the observation index and a zero-centered seasonal component
/// (mean residual per position in the seasonal cycle). Fit once,
/// projected forward from the end of the fitted series.
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    pub(crate) intercept: f64,
    pub(crate) slope: f64,
    pub(crate) seasonal: Vec<f64>,
    pub(crate) n_obs: usize,
}

/// Default seasonal cycle length for a sampling interval
///
/// Daily bars repeat on a weekly cycle; intraday bars on a daily one.
/// Unknown intervals fall back to the weekly cycle.
pub fn season_length_for_interval(interval: &str) -> usize {
    match interval {
        "1m" | "5m" | "15m" | "30m" | "60m" | "90m" | "1h" => 24,
        "1d" | "5d" => 7,
        "1wk" => 52,
        "1mo" | "3mo" => 12,
        _ => 7,
    }
}

impl AdditiveModel {
    /// Fits the trend and seasonal components
    ///
    /// Requires at least two observations, a positive cycle length, and
    /// at least one observation per cycle position (`n >= season_length`).
    pub fn fit(values: &[f64], season_length: usize) -> Result<Self> {
        if season_length == 0 {
            return Err(ForecastError::DataInsufficient(
                "seasonal cycle length must be positive".to_string(),
            ));
        }
        let n = values.len();
        if n < 2 || n < season_length {
            return Err(ForecastError::DataInsufficient(format!(
                "{} observations cannot fit a trend and a {}-step seasonal cycle",
                n, season_length
            )));
        }

        // Least-squares line over the observation index
        let n_f = n as f64;
        let mean_x = (n_f - 1.0) / 2.0;
        let mean_y = values.iter().sum::<f64>() / n_f;

        let mut cov = 0.0;
        let mut var = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let dx = i as f64 - mean_x;
            cov += dx * (y - mean_y);
            var += dx * dx;
        }
        let slope = if var.abs() < f64::EPSILON { 0.0 } else { cov / var };
        let intercept = mean_y - slope * mean_x;

        // Mean residual per cycle position, centered to zero
        let mut sums = vec![0.0; season_length];
        let mut counts = vec![0usize; season_length];
        for (i, &y) in values.iter().enumerate() {
            let residual = y - (intercept + slope * i as f64);
            sums[i % season_length] += residual;
            counts[i % season_length] += 1;
        }
        let mut seasonal: Vec<f64> = sums
            .iter()
            .zip(counts.iter())
            .map(|(&s, &c)| s / c as f64)
            .collect();
        let seasonal_mean = seasonal.iter().sum::<f64>() / season_length as f64;
        for s in seasonal.iter_mut() {
            *s -= seasonal_mean;
        }

        Ok(Self {
            intercept,
            slope,
            seasonal,
            n_obs: n,
        })
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn season_length(&self) -> usize {
        self.seasonal.len()
    }

    /// Model value at observation index `t`
    pub fn predict_at(&self, t: usize) -> f64 {
        self.intercept + self.slope * t as f64 + self.seasonal[t % self.seasonal.len()]
    }
}
