use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activations::Activation;

/// Weight initialization strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeightInit {
    /// Xavier/Glorot uniform initialization
    XavierUniform,

    /// He/Kaiming uniform initialization (for ReLU)
    HeUniform,

    /// Uniform distribution with custom range
    Uniform { min: f32, max: f32 },

    /// All zeros
    Zeros,
}

impl WeightInit {
    /// Initialize a `[fan_in, fan_out]` weight matrix from the given generator.
    pub fn initialize_weights<R: Rng + ?Sized>(&self, shape: (usize, usize), rng: &mut R) -> Array2<f32> {
        let (fan_in, fan_out) = shape;

        match self {
            WeightInit::XavierUniform => {
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                Array2::random_using(shape, Uniform::new(-limit, limit), rng)
            }
            WeightInit::HeUniform => {
                let limit = (6.0 / fan_in as f32).sqrt();
                Array2::random_using(shape, Uniform::new(-limit, limit), rng)
            }
            WeightInit::Uniform { min, max } => {
                Array2::random_using(shape, Uniform::new(*min, *max), rng)
            }
            WeightInit::Zeros => Array2::zeros(shape),
        }
    }

    /// Biases always start at zero.
    pub fn initialize_biases(&self, size: usize) -> Array1<f32> {
        Array1::zeros(size)
    }

    /// Get the recommended initialization for an activation function
    pub fn for_activation(activation: Activation) -> Self {
        match activation {
            Activation::Relu => WeightInit::HeUniform,
            Activation::Linear | Activation::Tanh => WeightInit::XavierUniform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_he_uniform_within_limit() {
        let mut rng = StdRng::seed_from_u64(7);
        let w = WeightInit::HeUniform.initialize_weights((6, 3), &mut rng);
        let limit = 1.0_f32;
        assert_eq!(w.dim(), (6, 3));
        assert!(w.iter().all(|v| v.abs() <= limit));
    }

    #[test]
    fn test_same_seed_same_weights() {
        let a = WeightInit::XavierUniform.initialize_weights((4, 4), &mut StdRng::seed_from_u64(1));
        let b = WeightInit::XavierUniform.initialize_weights((4, 4), &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }
}
