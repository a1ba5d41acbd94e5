use std::fs;
use std::path::Path;

use bincode::{deserialize, serialize};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::agent::traits::QNetwork;
use crate::error::{DeepQError, Result};
use crate::layers::{DenseLayer, WeightInit};
use crate::loss::{Loss, Mse};
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// Point-in-time copy of every layer's `(weights, biases)`.
pub type Weights = Vec<(Array2<f32>, Array1<f32>)>;

/// A feed-forward network of dense layers trained with mean squared error.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NeuralNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
    pub learning_rate: f32,
}

impl NeuralNetwork {
    /// Create a network with the given layer sizes and one activation per layer.
    ///
    /// Weights are drawn from `rng` using the initialization recommended for
    /// each layer's activation; biases start at zero.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        optimizer: OptimizerWrapper,
        learning_rate: f32,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(DeepQError::invalid_parameter(
                "layer_sizes",
                "Must have at least input and output sizes",
            ));
        }
        if layer_sizes.len() - 1 != activations.len() {
            return Err(DeepQError::dimension_mismatch(
                format!("{} activations", layer_sizes.len() - 1),
                format!("{} activations", activations.len()),
            ));
        }
        if layer_sizes.iter().any(|&size| size == 0) {
            return Err(DeepQError::invalid_parameter("layer_sizes", "Layer sizes must be positive"));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| {
                DenseLayer::new_with_init(window[0], window[1], activation, WeightInit::for_activation(activation), rng)
            })
            .collect();

        Ok(NeuralNetwork { layers, optimizer, learning_rate })
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(|l| l.input_size()).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(|l| l.output_size()).unwrap_or(0)
    }

    fn check_inputs(&self, inputs: ArrayView2<f32>) -> Result<()> {
        if inputs.ncols() != self.input_size() {
            return Err(DeepQError::dimension_mismatch(
                format!("{} input features", self.input_size()),
                format!("{} input features", inputs.ncols()),
            ));
        }
        Ok(())
    }

    /// Forward pass for a batch of inputs, one row per sample.
    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_inputs(inputs)?;
        let mut current_output = inputs.to_owned();
        for layer in &self.layers {
            current_output = layer.forward_batch(current_output.view());
        }
        Ok(current_output)
    }

    fn backward_batch(&self, output_errors: ArrayView2<f32>) -> Vec<(Array2<f32>, Array1<f32>)> {
        let mut gradients = Vec::with_capacity(self.layers.len());
        let mut current_error = output_errors.to_owned();

        for (i, layer) in self.layers.iter().enumerate().rev() {
            let (adjusted_error, weight_gradients, bias_gradients) = layer.backward_batch(current_error.view());
            gradients.push((weight_gradients, bias_gradients));
            if i != 0 {
                current_error = adjusted_error.dot(&layer.weights.t());
            }
        }

        gradients.reverse();
        gradients
    }

    /// One gradient step on a minibatch. Returns the loss before the update.
    pub fn train_minibatch(&mut self, inputs: ArrayView2<f32>, targets: ArrayView2<f32>) -> Result<f32> {
        self.check_inputs(inputs)?;
        if targets.dim() != (inputs.nrows(), self.output_size()) {
            return Err(DeepQError::dimension_mismatch(
                format!("{:?}", (inputs.nrows(), self.output_size())),
                format!("{:?}", targets.dim()),
            ));
        }

        let mut outputs = inputs.to_owned();
        for layer in &mut self.layers {
            outputs = layer.forward_train(outputs.view());
        }

        let loss = Mse.compute_batch(outputs.view(), targets);
        if !loss.is_finite() {
            return Err(DeepQError::Numerical(format!("non-finite training loss {}", loss)));
        }

        let output_errors = Mse.gradient_batch(outputs.view(), targets);
        let gradients = self.backward_batch(output_errors.view());

        let learning_rate = self.learning_rate;
        for (i, (layer, (weight_gradients, bias_gradients))) in self.layers.iter_mut().zip(gradients).enumerate() {
            self.optimizer.update_weights(i, &mut layer.weights, &weight_gradients, learning_rate);
            self.optimizer.update_biases(i, &mut layer.biases, &bias_gradients, learning_rate);
        }
        self.optimizer.finish_step();

        Ok(loss)
    }
}

impl QNetwork for NeuralNetwork {
    type Weights = Weights;

    fn action_n(&self) -> usize {
        self.output_size()
    }

    fn predict(&self, observations: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.forward_batch(observations)
    }

    /// Walks the inputs in consecutive chunks of `batch_size`, one optimizer
    /// step per chunk, and returns the mean loss over the chunks.
    fn fit(&mut self, inputs: ArrayView2<f32>, targets: ArrayView2<f32>, batch_size: usize) -> Result<f32> {
        if batch_size == 0 {
            return Err(DeepQError::invalid_parameter("batch_size", "Must be greater than 0"));
        }
        if inputs.nrows() != targets.nrows() {
            return Err(DeepQError::dimension_mismatch(
                format!("{} target rows", inputs.nrows()),
                format!("{} target rows", targets.nrows()),
            ));
        }

        let mut total = 0.0;
        let mut chunks = 0;
        for (x, y) in inputs
            .axis_chunks_iter(Axis(0), batch_size)
            .zip(targets.axis_chunks_iter(Axis(0), batch_size))
        {
            total += self.train_minibatch(x, y)?;
            chunks += 1;
        }

        Ok(if chunks == 0 { 0.0 } else { total / chunks as f32 })
    }

    fn weights(&self) -> Weights {
        self.layers
            .iter()
            .map(|layer| (layer.weights.clone(), layer.biases.clone()))
            .collect()
    }

    fn set_weights(&mut self, weights: &Weights) -> Result<()> {
        if weights.len() != self.layers.len() {
            return Err(DeepQError::dimension_mismatch(
                format!("{} layers", self.layers.len()),
                format!("{} layers", weights.len()),
            ));
        }
        for (layer, (w, b)) in self.layers.iter().zip(weights) {
            if layer.weights.dim() != w.dim() || layer.biases.dim() != b.dim() {
                return Err(DeepQError::dimension_mismatch(
                    format!("{:?}", layer.weights.dim()),
                    format!("{:?}", w.dim()),
                ));
            }
        }
        for (layer, (w, b)) in self.layers.iter_mut().zip(weights) {
            layer.weights.assign(w);
            layer.biases.assign(b);
        }
        Ok(())
    }

    /// Serializes the network, optimizer state included, with bincode.
    fn save(&self, path: &Path) -> Result<()> {
        let serialized = serialize(self)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let buffer = fs::read(path)?;
        let network: Self = deserialize(&buffer)?;
        Ok(network)
    }
}
