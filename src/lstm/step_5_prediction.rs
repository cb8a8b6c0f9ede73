// External imports
use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor};

// Internal imports
use super::step_1_data_preparation::MinMaxScaler;
use super::step_3_lstm_model_arch::PriceLstm;

/// Predicts the next normalized value from one window
pub fn predict_next<B: Backend>(
    model: &PriceLstm<B>,
    window: &[f32],
    device: &B::Device,
) -> f32 {
    let shape = Shape::new([1, window.len(), 1]);
    let features: Tensor<B, 3> =
        Tensor::<B, 1>::from_floats(window, device).reshape(shape);

    let pred = model.forward(features);
    let data = pred.to_data().convert::<f32>();
    data.as_slice::<f32>().unwrap()[0]
}

/// Rolls the model forward `periods` steps from a seed window
///
/// The buffer starts as the newest validation window. Each step predicts
/// from the current buffer, records the prediction, shifts the buffer
/// left by one slot and writes the prediction into the freed last slot.
/// Later steps therefore consume earlier predictions; compounding error
/// is the expected behavior of multi-step-ahead forecasting from a
/// single-step model. The loop is inherently sequential.
pub fn rollout<B: Backend>(
    model: &PriceLstm<B>,
    seed_window: &[f32],
    periods: usize,
    device: &B::Device,
) -> Vec<f32> {
    let mut buffer = seed_window.to_vec();
    let mut predictions = Vec::with_capacity(periods);

    for _ in 0..periods {
        let next = predict_next(model, &buffer, device);
        predictions.push(next);

        buffer.rotate_left(1);
        *buffer.last_mut().expect("rollout buffer is never empty") = next;
    }

    predictions
}

/// Maps normalized rollout output back to price units
pub fn denormalize_predictions(scaler: &MinMaxScaler, predictions: &[f32]) -> Vec<f64> {
    scaler.inverse_transform(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::{NdArray, NdArrayDevice};
    use polars::prelude::*;

    fn test_model(device: &NdArrayDevice) -> PriceLstm<NdArray<f32>> {
        PriceLstm::new(1, 8, 2, 0.2, device)
    }

    #[test]
    fn rollout_returns_exactly_periods_values() {
        let device = NdArrayDevice::default();
        let model = test_model(&device);
        let seed = vec![0.5f32; 30];

        for periods in [1, 5, 12] {
            let preds = rollout(&model, &seed, periods, &device);
            assert_eq!(preds.len(), periods);
            assert!(preds.iter().all(|p| p.is_finite()));
        }
    }

    #[test]
    fn rollout_is_deterministic_for_fixed_model_and_seed() {
        let device = NdArrayDevice::default();
        let model = test_model(&device);
        let seed: Vec<f32> = (0..30).map(|i| i as f32 / 30.0).collect();

        let first = rollout(&model, &seed, 8, &device);
        let second = rollout(&model, &seed, 8, &device);
        assert_eq!(first, second);
    }

    #[test]
    fn rollout_feeds_predictions_back_in() {
        let device = NdArrayDevice::default();
        let model = test_model(&device);
        let seed = vec![0.25f32; 30];

        // After one step the buffer the second step sees differs from the
        // seed, so a constant-input model still shifts state forward.
        let one = rollout(&model, &seed, 1, &device);
        let mut shifted = seed.clone();
        shifted.rotate_left(1);
        shifted[29] = one[0];
        let direct = predict_next(&model, &shifted, &device);

        let two = rollout(&model, &seed, 2, &device);
        assert_eq!(two[0], one[0]);
        assert_eq!(two[1], direct);
    }

    #[test]
    fn denormalization_round_trips_through_fitted_scaler() {
        let series = Float64Chunked::from_vec("close".into(), vec![100.0, 150.0, 200.0]);
        let scaler = crate::lstm::step_1_data_preparation::MinMaxScaler::fit(&series).unwrap();

        let denorm = denormalize_predictions(&scaler, &[0.0, 0.5, 1.0]);
        assert_eq!(denorm.len(), 3);
        assert!((denorm[0] - 100.0).abs() < 1e-6);
        assert!((denorm[1] - 150.0).abs() < 1e-6);
        assert!((denorm[2] - 200.0).abs() < 1e-6);
    }
}
