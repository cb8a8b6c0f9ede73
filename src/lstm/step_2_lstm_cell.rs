// External imports
use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::{activation, backend::Backend, Tensor};

/// Single-direction LSTM layer
///
/// All four gates share one pair of linear projections: the input
/// projection maps `input_size -> 4 * hidden_size` and the recurrent
/// projection maps `hidden_size -> 4 * hidden_size`. The forward pass
/// walks the sequence one step at a time and emits the full hidden
/// sequence so layers can be stacked.
#[derive(Module, Debug)]
pub struct LstmLayer<B: Backend> {
    input_size: usize,
    hidden_size: usize,
    input_weights: Linear<B>,
    hidden_weights: Linear<B>,
}

impl<B: Backend> LstmLayer<B> {
    /// Create a new LSTM layer
    pub fn new(input_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        // input, forget, cell, output gates combined
        let gate_size = 4 * hidden_size;

        let input_weights = LinearConfig::new(input_size, gate_size).init(device);
        let hidden_weights = LinearConfig::new(hidden_size, gate_size).init(device);

        Self {
            input_size,
            hidden_size,
            input_weights,
            hidden_weights,
        }
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Forward pass over a `[batch, seq_len, input_size]` sequence,
    /// returning the hidden states `[batch, seq_len, hidden_size]`
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let device = x.device();
        let batch_size = x.dims()[0];
        let seq_len = x.dims()[1];

        // Initial hidden and cell states (zeros)
        let mut h = Tensor::zeros([batch_size, self.hidden_size], &device);
        let mut c = Tensor::zeros([batch_size, self.hidden_size], &device);

        let mut output_sequence =
            Tensor::zeros([batch_size, seq_len, self.hidden_size], &device);

        for t in 0..seq_len {
            let x_t = x
                .clone()
                .narrow(1, t, 1)
                .reshape([batch_size, self.input_size]);

            let input_projection = self.input_weights.forward(x_t);
            let hidden_projection = self.hidden_weights.forward(h);
            let gates = input_projection + hidden_projection;

            // Split into individual gates, each [batch_size, hidden_size]
            let gates = gates.reshape([batch_size, 4, self.hidden_size]);
            let i_gate = gates
                .clone()
                .narrow(1, 0, 1)
                .reshape([batch_size, self.hidden_size]);
            let f_gate = gates
                .clone()
                .narrow(1, 1, 1)
                .reshape([batch_size, self.hidden_size]);
            let g_gate = gates
                .clone()
                .narrow(1, 2, 1)
                .reshape([batch_size, self.hidden_size]);
            let o_gate = gates
                .narrow(1, 3, 1)
                .reshape([batch_size, self.hidden_size]);

            let i = activation::sigmoid(i_gate);
            let f = activation::sigmoid(f_gate);
            let g = activation::tanh(g_gate);
            let o = activation::sigmoid(o_gate);

            c = f * c + i * g;
            h = o * activation::tanh(c.clone());

            output_sequence = output_sequence.slice_assign(
                [0..batch_size, t..t + 1, 0..self.hidden_size],
                h.clone()
                    .unsqueeze::<3>()
                    .reshape([batch_size, 1, self.hidden_size]),
            );
        }

        output_sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::{NdArray, NdArrayDevice};

    #[test]
    fn forward_preserves_batch_and_sequence_dims() {
        let device = NdArrayDevice::default();
        let layer = LstmLayer::<NdArray<f32>>::new(1, 8, &device);

        let x = Tensor::<NdArray<f32>, 3>::zeros([4, 10, 1], &device);
        let out = layer.forward(x);
        assert_eq!(out.dims(), [4, 10, 8]);
    }

    #[test]
    fn zero_input_keeps_states_bounded() {
        let device = NdArrayDevice::default();
        let layer = LstmLayer::<NdArray<f32>>::new(1, 4, &device);

        let x = Tensor::<NdArray<f32>, 3>::zeros([1, 5, 1], &device);
        let out = layer.forward(x);

        let data = out.to_data().convert::<f32>();
        let values = data.as_slice::<f32>().unwrap();
        assert!(values.iter().all(|v| v.abs() <= 1.0));
    }
}
