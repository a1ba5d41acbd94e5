//! # Environment Interface
//!
//! The agent drives any episodic environment with a discrete action space
//! through the [`Environment`] trait. Observations are fixed-length `f32`
//! feature vectors.

use std::collections::HashMap;

use ndarray::Array1;
use rand::{Rng, RngCore};

use crate::error::Result;

/// Outcome of a single environment step.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub observation: Array1<f32>,
    pub reward: f32,
    /// True iff `observation` is terminal.
    pub done: bool,
    /// Free-form diagnostics reported by the environment.
    pub info: HashMap<String, f32>,
}

impl Step {
    pub fn new(observation: Array1<f32>, reward: f32, done: bool) -> Self {
        Step {
            observation,
            reward,
            done,
            info: HashMap::new(),
        }
    }
}

/// An episodic environment with `action_n` discrete actions.
pub trait Environment {
    /// Size of the discrete action space.
    fn action_n(&self) -> usize;

    /// Starts a new episode and returns its first observation.
    fn reset(&mut self) -> Result<Array1<f32>>;

    /// Applies `action`, which must lie in `[0, action_n)`.
    fn step(&mut self, action: usize) -> Result<Step>;

    /// Releases resources held for the current episode.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        Ok(())
    }

    /// Uniformly random valid action.
    fn sample_action(&mut self, rng: &mut dyn RngCore) -> usize {
        rng.gen_range(0..self.action_n())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Coin;

    impl Environment for Coin {
        fn action_n(&self) -> usize {
            3
        }

        fn reset(&mut self) -> Result<Array1<f32>> {
            Ok(array![0.0])
        }

        fn step(&mut self, _action: usize) -> Result<Step> {
            Ok(Step::new(array![0.0], 0.0, true))
        }
    }

    #[test]
    fn test_sample_action_in_range() {
        let mut env = Coin;
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let action = env.sample_action(&mut rng);
            assert!(action < 3);
            seen[action] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
