// External imports
use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig};
use burn::prelude::Backend;
use burn::tensor::Tensor;

// Internal imports
use super::step_2_lstm_cell::LstmLayer;

/// Stacked recurrent regression model for next-value prediction
///
/// Three LSTM layers of 120 units by default, dropout after every layer,
/// and a single linear output unit. The output is intentionally
/// unclamped: a trained model extrapolating past the fitted min/max must
/// be able to leave the [0, 1] range.
#[derive(Module, Debug)]
pub struct PriceLstm<B: Backend> {
    input_size: usize,
    hidden_size: usize,
    layers: Vec<LstmLayer<B>>,
    dropouts: Vec<Dropout>,
    output: Linear<B>,
}

impl<B: Backend> PriceLstm<B> {
    /// Create a new model
    ///
    /// The first layer consumes `input_size` features per time step;
    /// every subsequent layer consumes the previous layer's hidden
    /// sequence.
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        num_layers: usize,
        dropout_prob: f64,
        device: &B::Device,
    ) -> Self {
        let mut layers = Vec::with_capacity(num_layers);
        let mut dropouts = Vec::with_capacity(num_layers);

        for layer_idx in 0..num_layers {
            let in_size = if layer_idx == 0 { input_size } else { hidden_size };
            layers.push(LstmLayer::new(in_size, hidden_size, device));
            dropouts.push(DropoutConfig::new(dropout_prob).init());
        }

        let output = LinearConfig::new(hidden_size, 1).init(device);

        Self {
            input_size,
            hidden_size,
            layers,
            dropouts,
            output,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Forward pass: `[batch, seq_len, input_size]` -> `[batch, 1]`
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        let mut seq = x;
        for (layer, dropout) in self.layers.iter().zip(self.dropouts.iter()) {
            seq = dropout.forward(layer.forward(seq));
        }

        // Pool the last time step of the final hidden sequence
        let batch_size = seq.dims()[0];
        let last_step_idx = seq.dims()[1] - 1;
        let pooled = seq
            .narrow(1, last_step_idx, 1)
            .reshape([batch_size, self.hidden_size]);

        self.output.forward(pooled)
    }

    /// Mean squared error between predictions and targets
    pub fn mse_loss(&self, pred: Tensor<B, 2>, target: Tensor<B, 2>) -> Tensor<B, 1> {
        let diff = pred - target;
        (diff.clone() * diff).mean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::{NdArray, NdArrayDevice};

    #[test]
    fn forward_produces_one_value_per_sample() {
        let device = NdArrayDevice::default();
        let model = PriceLstm::<NdArray<f32>>::new(1, 16, 2, 0.2, &device);

        let x = Tensor::<NdArray<f32>, 3>::zeros([7, 30, 1], &device);
        let out = model.forward(x);
        assert_eq!(out.dims(), [7, 1]);
    }

    #[test]
    fn mse_loss_is_zero_for_identical_tensors() {
        let device = NdArrayDevice::default();
        let model = PriceLstm::<NdArray<f32>>::new(1, 8, 1, 0.0, &device);

        let a = Tensor::<NdArray<f32>, 2>::ones([4, 1], &device);
        let loss = model.mse_loss(a.clone(), a);

        let data = loss.to_data().convert::<f32>();
        let value = data.as_slice::<f32>().unwrap()[0];
        assert!(value.abs() < 1e-7);
    }
}
