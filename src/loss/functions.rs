use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Trait defining the interface for batched loss functions
pub trait Loss {
    /// Compute the loss for a batch of predictions and targets
    fn compute_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32;

    /// Gradient of the loss with respect to the predictions
    fn gradient_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32>;
}

/// Mean squared error over every element of the output matrix.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Mse;

impl Loss for Mse {
    fn compute_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32 {
        let diff = &predictions - &targets;
        (&diff * &diff).mean().unwrap_or(0.0)
    }

    fn gradient_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32> {
        let n = predictions.len().max(1) as f32;
        (&predictions - &targets) * (2.0 / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mse_zero_when_equal() {
        let p = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(Mse.compute_batch(p.view(), p.view()), 0.0);
        assert!(Mse.gradient_batch(p.view(), p.view()).iter().all(|g| *g == 0.0));
    }

    #[test]
    fn test_mse_averages_all_elements() {
        let p = array![[1.0, 0.0], [0.0, 0.0]];
        let t = array![[0.0, 0.0], [0.0, 0.0]];
        assert_eq!(Mse.compute_batch(p.view(), t.view()), 0.25);
        assert_eq!(Mse.gradient_batch(p.view(), t.view())[[0, 0]], 0.5);
    }
}
