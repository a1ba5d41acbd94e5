use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::initialization::WeightInit;
use crate::activations::Activation;

/// A fully connected (dense) layer in a neural network
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DenseLayer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
    #[serde(skip)]
    pre_activation_output: Option<Array2<f32>>,
    #[serde(skip)]
    inputs: Option<Array2<f32>>,
}

impl DenseLayer {
    /// Create a new dense layer whose weights are drawn with `init` from `rng`.
    pub fn new_with_init<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        init: WeightInit,
        rng: &mut R,
    ) -> Self {
        DenseLayer {
            weights: init.initialize_weights((input_size, output_size), rng),
            biases: init.initialize_biases(output_size),
            activation,
            pre_activation_output: None,
            inputs: None,
        }
    }

    /// Forward pass without keeping anything for backpropagation.
    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        let mut outputs = inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0));
        self.activation.apply_batch(&mut outputs);
        outputs
    }

    /// Forward pass that stores inputs and pre-activations for [`Self::backward_batch`].
    pub fn forward_train(&mut self, inputs: ArrayView2<f32>) -> Array2<f32> {
        self.inputs = Some(inputs.to_owned());
        let mut outputs = inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0));
        self.pre_activation_output = Some(outputs.clone());
        self.activation.apply_batch(&mut outputs);
        outputs
    }

    /// Returns `(adjusted_error, weight_gradients, bias_gradients)`.
    ///
    /// Panics if [`Self::forward_train`] has not been called first.
    pub fn backward_batch(&self, output_errors: ArrayView2<f32>) -> (Array2<f32>, Array2<f32>, Array1<f32>) {
        let pre_activation_output = self.pre_activation_output.as_ref()
            .expect("No pre-activation output stored. forward_train() must be called before backward_batch()");
        let inputs = self.inputs.as_ref()
            .expect("No inputs stored. forward_train() must be called before backward_batch()");

        let activation_deriv = self.activation.derivative_batch(pre_activation_output.view());
        let adjusted_error = output_errors.to_owned() * &activation_deriv;
        let weight_gradients = inputs.t().dot(&adjusted_error);
        let bias_gradients = adjusted_error.sum_axis(Axis(0));

        (adjusted_error, weight_gradients, bias_gradients)
    }

    pub fn input_size(&self) -> usize {
        self.weights.shape()[0]
    }

    pub fn output_size(&self) -> usize {
        self.weights.shape()[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_layer() -> DenseLayer {
        let mut layer = DenseLayer::new_with_init(2, 2, Activation::Relu, WeightInit::Zeros, &mut StdRng::seed_from_u64(0));
        layer.weights = array![[1.0, -1.0], [2.0, 0.5]];
        layer.biases = array![0.5, 0.0];
        layer
    }

    #[test]
    fn test_forward_matches_manual() {
        let layer = fixed_layer();
        let out = layer.forward_batch(array![[1.0, 1.0]].view());
        // pre = [3.5, -0.5] -> relu
        assert_eq!(out, array![[3.5, 0.0]]);
    }

    #[test]
    fn test_backward_masks_inactive_units() {
        let mut layer = fixed_layer();
        layer.forward_train(array![[1.0, 1.0]].view());
        let (adjusted, w_grad, b_grad) = layer.backward_batch(array![[1.0, 1.0]].view());
        assert_eq!(adjusted, array![[1.0, 0.0]]);
        assert_eq!(w_grad, array![[1.0, 0.0], [1.0, 0.0]]);
        assert_eq!(b_grad, array![1.0, 0.0]);
    }
}
