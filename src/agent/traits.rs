use std::path::Path;

use ndarray::{Array2, ArrayView2};

use crate::error::Result;

/// The function approximator behind a DQN agent.
///
/// Maps a batch of observations (one per row) to a batch of Q-value vectors
/// with one column per action. The agent owns two independently weighted
/// instances of the same architecture: the policy network and the target
/// network.
pub trait QNetwork: Sized {
    /// Owned snapshot of the parameters; never shares storage with the network.
    type Weights: Clone;

    /// Number of Q-values produced per observation.
    fn action_n(&self) -> usize;

    /// Q-values for every row of `observations`, shape `[rows, action_n]`.
    fn predict(&self, observations: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Moves the predictions for `inputs` toward `targets` under MSE loss.
    /// Returns the mean training loss.
    fn fit(&mut self, inputs: ArrayView2<f32>, targets: ArrayView2<f32>, batch_size: usize) -> Result<f32>;

    fn weights(&self) -> Self::Weights;

    fn set_weights(&mut self, weights: &Self::Weights) -> Result<()>;

    fn save(&self, path: &Path) -> Result<()>;

    fn load(path: &Path) -> Result<Self>;

    /// Full copy of `source`'s weights into `self`.
    fn sync_from(&mut self, source: &Self) -> Result<()> {
        self.set_weights(&source.weights())
    }
}
