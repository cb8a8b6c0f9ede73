// External crates
use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor};
use polars::prelude::*;
use rayon::prelude::*;

// Internal modules
use crate::constants::SMOOTHING_WINDOW;
use crate::error::{ForecastError, Result};

/// Name of the moving-average column appended by [`smooth_series`]
pub const SMOOTHED_COLUMN: &str = "ma_20";

/// Appends a trailing simple moving average of `column` and drops the
/// head rows that lack a full smoothing window
///
/// The average is computed over the last [`SMOOTHING_WINDOW`] raw
/// observations, so the first `SMOOTHING_WINDOW - 1` rows of the input
/// have no value and are removed. The raw `column` values over the
/// truncated range are what later stages scale and window; the average
/// itself only gates which rows carry enough history.
///
/// # Arguments
///
/// * `df` - Input series table
/// * `column` - Column to smooth
///
/// # Returns
///
/// Returns the truncated DataFrame with the extra `ma_20` column.
pub fn smooth_series(df: &DataFrame, column: &str) -> Result<DataFrame> {
    if !df.schema().contains(column) {
        return Err(ForecastError::InvalidColumn(column.to_string()));
    }

    let series = df.column(column)?.f64()?.clone().into_series();
    if series.len() < SMOOTHING_WINDOW {
        return Err(ForecastError::DataInsufficient(format!(
            "{} rows is fewer than the smoothing window ({})",
            series.len(),
            SMOOTHING_WINDOW
        )));
    }

    let smoothed = series.rolling_mean(RollingOptionsFixedWindow {
        window_size: SMOOTHING_WINDOW,
        min_periods: SMOOTHING_WINDOW,
        center: false,
        weights: None,
        fn_params: None,
    })?;

    let mut out = df.clone();
    out.with_column(smoothed.with_name(PlSmallStr::from(SMOOTHED_COLUMN)).into_column())?;
    let out = out.drop_nulls::<String>(None)?;

    log::debug!(
        "smoothing kept {} of {} rows for '{}'",
        out.height(),
        df.height(),
        column
    );
    Ok(out)
}

/// Min-max scaler with retained bounds
///
/// The observed minimum and maximum are fixed at fit time; the same pair
/// must invert every value the model later produces. Values outside the
/// fitted range map outside [0, 1], which is a valid extrapolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// Captures the observed min/max of a series
    pub fn fit(values: &Float64Chunked) -> Result<Self> {
        match (values.min(), values.max()) {
            (Some(min), Some(max)) => Ok(Self { min, max }),
            _ => Err(ForecastError::DataInsufficient(
                "cannot fit scaler on an empty series".to_string(),
            )),
        }
    }

    /// Fitted range, with a unit fallback for constant series
    fn range(&self) -> f64 {
        if (self.max - self.min).abs() < f64::EPSILON {
            1.0
        } else {
            self.max - self.min
        }
    }

    /// Maps raw values into the fitted [0, 1] range
    pub fn transform(&self, values: &Float64Chunked) -> Vec<f32> {
        let (min, range) = (self.min, self.range());
        values
            .into_no_null_iter()
            .map(|v| ((v - min) / range) as f32)
            .collect()
    }

    /// Maps normalized values back to the original units
    pub fn inverse_transform(&self, values: &[f32]) -> Vec<f64> {
        let (min, range) = (self.min, self.range());
        values.iter().map(|&v| v as f64 * range + min).collect()
    }
}

/// Fixed-length window samples over a normalized series
///
/// Sample `i` covers positions `[i, i + window_size)` of the source
/// series, with its label at position `i + window_size`. Features are
/// stored flat, one `window_size` chunk per sample, in chronological
/// order.
#[derive(Debug, Clone)]
pub struct WindowSamples {
    pub features: Vec<f32>,
    pub labels: Vec<f32>,
    pub window_size: usize,
    pub n_samples: usize,
}

impl WindowSamples {
    /// Feature slice of the newest sample
    pub fn last_window(&self) -> &[f32] {
        let start = (self.n_samples - 1) * self.window_size;
        &self.features[start..start + self.window_size]
    }

    /// Converts the samples to Burn tensors shaped
    /// `[n_samples, window_size, 1]` and `[n_samples, 1]`
    pub fn to_tensors<B: Backend>(&self, device: &B::Device) -> (Tensor<B, 3>, Tensor<B, 2>) {
        let features_shape = Shape::new([self.n_samples, self.window_size, 1]);
        let labels_shape = Shape::new([self.n_samples, 1]);

        let features: Tensor<B, 3> =
            Tensor::<B, 1>::from_floats(self.features.as_slice(), device).reshape(features_shape);
        let labels: Tensor<B, 2> =
            Tensor::<B, 1>::from_floats(self.labels.as_slice(), device).reshape(labels_shape);

        (features, labels)
    }
}

/// Slices a normalized series into overlapping window samples
///
/// A series of length `L` yields exactly `L - window_size` samples.
/// Fails when that count would be zero or negative.
pub fn window_series(values: &[f32], window_size: usize) -> Result<WindowSamples> {
    if values.len() <= window_size {
        return Err(ForecastError::DataInsufficient(format!(
            "{} normalized points cannot fill a single {}-step window with label",
            values.len(),
            window_size
        )));
    }

    let n_samples = values.len() - window_size;
    let mut features = vec![0f32; n_samples * window_size];
    let mut labels = vec![0f32; n_samples];

    // Each chunk is one window sample
    features
        .par_chunks_mut(window_size)
        .enumerate()
        .for_each(|(i, chunk)| {
            chunk.copy_from_slice(&values[i..i + window_size]);
        });

    labels
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, label)| {
            *label = values[i + window_size];
        });

    Ok(WindowSamples {
        features,
        labels,
        window_size,
        n_samples,
    })
}

/// Splits window samples chronologically into training and validation
///
/// The split index is `floor(ratio * n_samples)`; no shuffling, so every
/// validation label is strictly later in time than every training label.
/// Fails if either partition would be empty.
pub fn split_samples(
    samples: &WindowSamples,
    ratio: f64,
) -> Result<(WindowSamples, WindowSamples)> {
    let split = (samples.n_samples as f64 * ratio).floor() as usize;
    if split == 0 || split == samples.n_samples {
        return Err(ForecastError::DataInsufficient(format!(
            "{} window samples split {}/{} leaves an empty partition",
            samples.n_samples,
            split,
            samples.n_samples - split
        )));
    }

    let w = samples.window_size;
    let train = WindowSamples {
        features: samples.features[..split * w].to_vec(),
        labels: samples.labels[..split].to_vec(),
        window_size: w,
        n_samples: split,
    };
    let val = WindowSamples {
        features: samples.features[split * w..].to_vec(),
        labels: samples.labels[split..].to_vec(),
        window_size: w,
        n_samples: samples.n_samples - split,
    };

    Ok((train, val))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{TRAIN_SPLIT_RATIO, WINDOW_SIZE};

    fn ramp(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32).collect()
    }

    #[test]
    fn smoothing_drops_warmup_rows() {
        let close: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let df = df!("close" => &close).unwrap();

        let smoothed = smooth_series(&df, "close").unwrap();
        assert_eq!(smoothed.height(), 50 - (SMOOTHING_WINDOW - 1));

        // First surviving average covers the first 20 raw observations
        let first = smoothed
            .column(SMOOTHED_COLUMN)
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        let expected: f64 = close[..SMOOTHING_WINDOW].iter().sum::<f64>() / 20.0;
        assert!((first - expected).abs() < 1e-9);
    }

    #[test]
    fn smoothing_rejects_missing_column() {
        let df = df!("close" => &[1.0f64, 2.0, 3.0]).unwrap();
        let err = smooth_series(&df, "adjusted_close").unwrap_err();
        assert!(matches!(err, ForecastError::InvalidColumn(_)));
    }

    #[test]
    fn scaler_round_trips_in_range_values() {
        let raw: Vec<f64> = (0..100).map(|i| 50.0 + 1.5 * i as f64).collect();
        let series = Float64Chunked::from_vec("close".into(), raw.clone());

        let scaler = MinMaxScaler::fit(&series).unwrap();
        let scaled = scaler.transform(&series);
        let restored = scaler.inverse_transform(&scaled);

        for (orig, back) in raw.iter().zip(restored.iter()) {
            assert!((orig - back).abs() < 1e-3, "{} != {}", orig, back);
        }
    }

    #[test]
    fn scaler_handles_constant_series() {
        let series = Float64Chunked::from_vec("close".into(), vec![42.0; 10]);
        let scaler = MinMaxScaler::fit(&series).unwrap();

        let scaled = scaler.transform(&series);
        assert!(scaled.iter().all(|&v| v == 0.0));
        let restored = scaler.inverse_transform(&scaled);
        assert!(restored.iter().all(|&v| (v - 42.0).abs() < 1e-9));
    }

    #[test]
    fn windowing_yields_len_minus_window_samples() {
        let samples = window_series(&ramp(50), WINDOW_SIZE).unwrap();
        assert_eq!(samples.n_samples, 20);
        assert_eq!(samples.features.len(), 20 * WINDOW_SIZE);

        // Sample i covers [i, i+30) with label at i+30
        assert_eq!(samples.features[0], 0.0);
        assert_eq!(samples.labels[0], 30.0);
        assert_eq!(samples.labels[19], 49.0);
        assert_eq!(samples.last_window()[0], 19.0);
    }

    #[test]
    fn windowing_rejects_short_series() {
        assert!(matches!(
            window_series(&ramp(WINDOW_SIZE), WINDOW_SIZE),
            Err(ForecastError::DataInsufficient(_))
        ));
        assert!(matches!(
            window_series(&ramp(5), WINDOW_SIZE),
            Err(ForecastError::DataInsufficient(_))
        ));
    }

    #[test]
    fn split_preserves_label_order() {
        let samples = window_series(&ramp(130), WINDOW_SIZE).unwrap();
        let (train, val) = split_samples(&samples, TRAIN_SPLIT_RATIO).unwrap();

        assert_eq!(train.n_samples, 80);
        assert_eq!(val.n_samples, 20);

        let max_train = train.labels.iter().cloned().fold(f32::MIN, f32::max);
        let min_val = val.labels.iter().cloned().fold(f32::MAX, f32::min);
        assert!(
            max_train < min_val,
            "validation labels must be strictly later than training labels"
        );
    }

    #[test]
    fn split_rejects_empty_partitions() {
        // A single window sample floors to a 0/1 split
        let samples = window_series(&ramp(31), WINDOW_SIZE).unwrap();
        assert_eq!(samples.n_samples, 1);
        assert!(matches!(
            split_samples(&samples, TRAIN_SPLIT_RATIO),
            Err(ForecastError::DataInsufficient(_))
        ));
    }
}
