use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::error::{DeepQError, Result};
use crate::network::NeuralNetwork;
use crate::optimizer::{Adam, OptimizerWrapper, SGD};

/// Optimizer attached to every network a builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OptimizerKind {
    Sgd,
    Adam { beta1: f32, beta2: f32, epsilon: f32 },
}

/// Builds fresh Q-networks for a fixed observation size.
///
/// Defaults: hidden layers `[256, 128, 64, 32]` with ReLU, a linear output
/// layer with one unit per action, Adam with learning rate `1e-4`.
/// Every call to [`build`](Self::build) draws new weights, so the policy and
/// target networks of an agent start out different. With a seed the whole
/// sequence of built networks is reproducible.
pub struct DenseNetworkBuilder {
    observation_dim: usize,
    hidden: Vec<usize>,
    activation: Activation,
    learning_rate: f32,
    optimizer: OptimizerKind,
    rng: StdRng,
}

impl DenseNetworkBuilder {
    pub fn new(observation_dim: usize) -> Self {
        DenseNetworkBuilder {
            observation_dim,
            hidden: vec![256, 128, 64, 32],
            activation: Activation::Relu,
            learning_rate: 1e-4,
            optimizer: OptimizerKind::Adam { beta1: 0.9, beta2: 0.999, epsilon: 1e-7 },
            rng: StdRng::from_entropy(),
        }
    }

    /// Sizes of the hidden layers, input to output.
    pub fn hidden(mut self, sizes: &[usize]) -> Self {
        self.hidden = sizes.to_vec();
        self
    }

    /// Activation of the hidden layers.
    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_sgd(mut self) -> Self {
        self.optimizer = OptimizerKind::Sgd;
        self
    }

    pub fn with_adam(mut self, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        self.optimizer = OptimizerKind::Adam { beta1, beta2, epsilon };
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// A new, independently initialized network with `action_n` outputs.
    pub fn build(&mut self, action_n: usize) -> Result<NeuralNetwork> {
        if self.observation_dim == 0 {
            return Err(DeepQError::invalid_parameter("observation_dim", "must be greater than 0"));
        }
        if action_n == 0 {
            return Err(DeepQError::invalid_parameter("action_n", "must be greater than 0"));
        }
        if !(self.learning_rate > 0.0) {
            return Err(DeepQError::invalid_parameter("learning_rate", "must be positive"));
        }

        let mut layer_sizes = Vec::with_capacity(self.hidden.len() + 2);
        layer_sizes.push(self.observation_dim);
        layer_sizes.extend_from_slice(&self.hidden);
        layer_sizes.push(action_n);

        let mut activations = vec![self.activation; self.hidden.len()];
        activations.push(Activation::Linear);

        let mut network = NeuralNetwork::new(
            &layer_sizes,
            &activations,
            OptimizerWrapper::SGD(SGD::new()),
            self.learning_rate,
            &mut self.rng,
        )?;

        if let OptimizerKind::Adam { beta1, beta2, epsilon } = self.optimizer {
            network.optimizer = OptimizerWrapper::Adam(Adam::new(&network.layers, beta1, beta2, epsilon));
        }

        Ok(network)
    }
}
