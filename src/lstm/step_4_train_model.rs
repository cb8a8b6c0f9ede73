// External imports
use burn::module::AutodiffModule;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use burn_autodiff::Autodiff;
use burn_ndarray::{NdArray, NdArrayDevice};
use serde::Serialize;

// Internal imports
use super::step_1_data_preparation::WindowSamples;
use super::step_3_lstm_model_arch::PriceLstm;
use crate::constants;
use crate::error::{ForecastError, Result};
use crate::progress::ProgressSink;

/// Backend used for fitting
pub type TrainBackend = Autodiff<NdArray<f32>>;
/// Backend used for rollout once fitting is done
pub type InferBackend = NdArray<f32>;

/// Configuration for training the model
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub batch_size: usize,
    pub epochs: usize,
    pub hidden_size: usize,
    pub num_layers: usize,
    pub dropout: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: constants::LEARNING_RATE,
            batch_size: constants::BATCH_SIZE,
            epochs: constants::EPOCHS,
            hidden_size: constants::HIDDEN_SIZE,
            num_layers: constants::NUM_LAYERS,
            dropout: constants::DROPOUT_PROB,
        }
    }
}

/// Losses observed during one training pass
#[derive(Debug, Clone, Serialize)]
pub struct EpochStats {
    pub epoch: usize,
    pub train_loss: f64,
    pub val_loss: f64,
}

// Helper for batching along the sample dimension
fn get_batches<B: Backend, const D: usize>(
    data: &Tensor<B, D>,
    batch_size: usize,
) -> Vec<Tensor<B, D>> {
    let num_samples = data.dims()[0];
    let mut batches = Vec::new();
    let mut start = 0;
    while start < num_samples {
        let end = usize::min(start + batch_size, num_samples);
        batches.push(data.clone().narrow(0, start, end - start));
        start = end;
    }
    batches
}

/// Train the stacked LSTM on chronological window samples
///
/// Runs a fixed number of passes over the training partition in
/// chronological mini-batches, minimizing mean squared error with Adam.
/// The validation partition is evaluated once per pass for monitoring
/// only; there is no early stopping. The sink receives one update per
/// completed pass. A non-finite running loss aborts with
/// [`ForecastError::TrainingFailed`].
pub fn train_model(
    train: &WindowSamples,
    val: &WindowSamples,
    config: &TrainingConfig,
    device: &NdArrayDevice,
    sink: &mut dyn ProgressSink,
) -> Result<(PriceLstm<InferBackend>, Vec<EpochStats>)> {
    let (train_features, train_targets) = train.to_tensors::<TrainBackend>(device);
    let (val_features, val_targets) = val.to_tensors::<TrainBackend>(device);

    log::info!(
        "training on {} samples, validating on {} ({} passes, batch {})",
        train.n_samples,
        val.n_samples,
        config.epochs,
        config.batch_size
    );

    let mut model = PriceLstm::<TrainBackend>::new(
        1,
        config.hidden_size,
        config.num_layers,
        config.dropout,
        device,
    );

    let mut optimizer = AdamConfig::new().init();
    let mut stats = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let feature_batches = get_batches(&train_features, config.batch_size);
        let target_batches = get_batches(&train_targets, config.batch_size);

        let mut epoch_loss = 0.0;
        for (batch_features, batch_targets) in feature_batches.iter().zip(target_batches.iter()) {
            let predictions = model.forward(batch_features.clone());
            let loss_tensor = model.mse_loss(predictions, batch_targets.clone());
            let loss = loss_tensor.clone().into_scalar() as f64;
            epoch_loss += loss;

            let grads = loss_tensor.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optimizer.step(config.learning_rate, model, grads);
        }
        let avg_loss = epoch_loss / feature_batches.len() as f64;

        if !avg_loss.is_finite() {
            return Err(ForecastError::TrainingFailed { last_loss: avg_loss });
        }

        // Validation pass for monitoring
        let val_preds = model.forward(val_features.clone());
        let val_loss = model
            .mse_loss(val_preds, val_targets.clone())
            .into_scalar() as f64;

        log::info!(
            "pass {}/{}: train mse {:.6}, val mse {:.6}",
            epoch,
            config.epochs,
            avg_loss,
            val_loss
        );
        stats.push(EpochStats {
            epoch,
            train_loss: avg_loss,
            val_loss,
        });

        sink.report(epoch as f64 / config.epochs as f64);
    }

    Ok((model.valid(), stats))
}
