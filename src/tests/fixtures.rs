use std::fs;
use std::path::Path;

use ndarray::{array, Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::agent::{Dqn, QNetwork};
use crate::config::DqnConfig;
use crate::environment::{Environment, Step};
use crate::error::{DeepQError, Result};

/// Q-network with hand-set values: `q[a] = slopes[a] * obs[0] + biases[a]`.
/// Records every `fit` call instead of learning.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScriptedNetwork {
    pub slopes: Vec<f32>,
    pub biases: Vec<f32>,
    #[serde(skip)]
    pub fits: Vec<(Array2<f32>, Array2<f32>)>,
}

impl ScriptedNetwork {
    pub fn new(slopes: Vec<f32>, biases: Vec<f32>) -> Self {
        assert_eq!(slopes.len(), biases.len());
        ScriptedNetwork { slopes, biases, fits: Vec::new() }
    }
}

impl QNetwork for ScriptedNetwork {
    type Weights = (Vec<f32>, Vec<f32>);

    fn action_n(&self) -> usize {
        self.slopes.len()
    }

    fn predict(&self, observations: ArrayView2<f32>) -> Result<Array2<f32>> {
        Ok(Array2::from_shape_fn((observations.nrows(), self.slopes.len()), |(i, a)| {
            self.slopes[a] * observations[[i, 0]] + self.biases[a]
        }))
    }

    fn fit(&mut self, inputs: ArrayView2<f32>, targets: ArrayView2<f32>, _batch_size: usize) -> Result<f32> {
        self.fits.push((inputs.to_owned(), targets.to_owned()));
        Ok(0.0)
    }

    fn weights(&self) -> Self::Weights {
        (self.slopes.clone(), self.biases.clone())
    }

    fn set_weights(&mut self, weights: &Self::Weights) -> Result<()> {
        self.slopes = weights.0.clone();
        self.biases = weights.1.clone();
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, bincode::serialize(self)?)?;
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        Ok(bincode::deserialize(&fs::read(path)?)?)
    }
}

/// Agent whose policy and target networks are exactly `policy` and `target`.
pub fn scripted_agent(policy: ScriptedNetwork, target: ScriptedNetwork, seed: u64) -> Dqn<ScriptedNetwork> {
    let action_n = policy.action_n();
    let mut networks = vec![policy, target].into_iter();
    Dqn::with_config(action_n, &DqnConfig::default().seed(seed), move |_| {
        networks
            .next()
            .ok_or_else(|| DeepQError::invalid_parameter("networks", "only two networks are scripted"))
    })
    .unwrap()
}

/// One-dimensional walk: action 0 moves right for +1 and ends the episode
/// on reaching 5, action 1 moves left for -1 and never ends it.
#[derive(Debug, Default)]
pub struct LineWalk {
    pub position: f32,
    pub closes: usize,
    pub renders: usize,
}

impl Environment for LineWalk {
    fn action_n(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<Array1<f32>> {
        self.position = 0.0;
        Ok(array![self.position])
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        match action {
            0 => {
                self.position += 1.0;
                Ok(Step::new(array![self.position], 1.0, self.position >= 5.0))
            }
            1 => {
                self.position -= 1.0;
                Ok(Step::new(array![self.position], -1.0, false))
            }
            _ => Err(DeepQError::InvalidAction { action, action_n: 2 }),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.closes += 1;
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        self.renders += 1;
        Ok(())
    }
}

/// Every episode lasts exactly `length` steps with reward 1 per step.
/// The observation is the step index within the episode.
#[derive(Debug, Default)]
pub struct FixedLengthEnv {
    pub length: usize,
    pub t: usize,
    pub resets: usize,
    pub closes: usize,
}

impl FixedLengthEnv {
    pub fn new(length: usize) -> Self {
        FixedLengthEnv { length, ..Default::default() }
    }
}

impl Environment for FixedLengthEnv {
    fn action_n(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<Array1<f32>> {
        self.t = 0;
        self.resets += 1;
        Ok(array![0.0])
    }

    fn step(&mut self, _action: usize) -> Result<Step> {
        self.t += 1;
        Ok(Step::new(array![self.t as f32], 1.0, self.t >= self.length))
    }

    fn close(&mut self) -> Result<()> {
        self.closes += 1;
        Ok(())
    }
}
