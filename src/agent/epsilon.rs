use serde::{Deserialize, Serialize};

use crate::error::{DeepQError, Result};

/// Share of the step budget after which epsilon reaches its floor value.
pub const DEFAULT_DECAY_TARGET_FRACTION: f64 = 0.85;

/// Geometric decay of the exploration rate.
///
/// Starting from `initial_epsilon`, every [`step`](Self::step) multiplies
/// epsilon by `exp(ln(min_epsilon) / (total_timesteps * decay_target_fraction))`
/// so that `min_epsilon` is reached after `total_timesteps *
/// decay_target_fraction` steps. No floor is applied: stepping past that
/// point keeps shrinking epsilon below `min_epsilon`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    epsilon: f64,
    min_epsilon: f64,
    decay_factor: f64,
}

impl EpsilonSchedule {
    pub fn new(
        initial_epsilon: f64,
        min_epsilon: f64,
        total_timesteps: usize,
        decay_target_fraction: f64,
    ) -> Result<Self> {
        if !(min_epsilon > 0.0 && min_epsilon <= 1.0) {
            return Err(DeepQError::invalid_parameter(
                "min_epsilon".to_string(),
                format!("must be in (0, 1], got {}", min_epsilon),
            ));
        }
        if !(initial_epsilon > 0.0 && initial_epsilon <= 1.0) {
            return Err(DeepQError::invalid_parameter(
                "initial_epsilon".to_string(),
                format!("must be in (0, 1], got {}", initial_epsilon),
            ));
        }
        if !(decay_target_fraction > 0.0 && decay_target_fraction <= 1.0) {
            return Err(DeepQError::invalid_parameter(
                "decay_target_fraction".to_string(),
                format!("must be in (0, 1], got {}", decay_target_fraction),
            ));
        }
        if total_timesteps == 0 {
            return Err(DeepQError::invalid_parameter("total_timesteps", "must be greater than 0"));
        }

        let decay_steps = total_timesteps as f64 * decay_target_fraction;
        let decay_factor = (min_epsilon.ln() / decay_steps).exp();

        Ok(EpsilonSchedule {
            epsilon: initial_epsilon,
            min_epsilon,
            decay_factor,
        })
    }

    /// Schedule starting from full exploration with the default target fraction.
    pub fn with_defaults(min_epsilon: f64, total_timesteps: usize) -> Result<Self> {
        Self::new(1.0, min_epsilon, total_timesteps, DEFAULT_DECAY_TARGET_FRACTION)
    }

    /// Decays epsilon once and returns the new value.
    pub fn step(&mut self) -> f64 {
        self.epsilon *= self.decay_factor;
        self.epsilon
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn min_epsilon(&self) -> f64 {
        self.min_epsilon
    }

    pub fn decay_factor(&self) -> f64 {
        self.decay_factor
    }
}
