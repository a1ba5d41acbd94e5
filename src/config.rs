//! Configuration of the agent and of its training loop.
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::agent::epsilon::DEFAULT_DECAY_TARGET_FRACTION;
use crate::error::{DeepQError, Result};
use crate::replay_buffer::DEFAULT_MAX_REPLAY_SIZE;

/// Parameters of [`Dqn::learn`](crate::agent::Dqn::learn).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct LearnConfig {
    /// Environment step budget. Checked at episode boundaries only.
    pub timesteps: usize,

    /// Interval of training updates in environment steps.
    pub train_every: usize,

    /// Interval of target network syncs in environment steps.
    pub update_target_every: usize,

    /// Interval of status lines in episodes.
    pub show_every_episode: usize,

    /// Number of transitions sampled per training update.
    pub batch_size: usize,

    /// Discount applied to the bootstrapped future value.
    pub discount: f32,

    /// Exploration rate reached after `decay_target_fraction` of the budget.
    pub min_epsilon: f64,

    /// Share of `timesteps` over which epsilon decays to `min_epsilon`.
    pub decay_target_fraction: f64,

    /// Episode reward above which a reported episode triggers a checkpoint.
    pub min_reward: f32,

    /// Maximum length of a single episode.
    pub max_episode_timesteps: usize,

    /// Directory that receives checkpoints and the reward history.
    pub model_dir: PathBuf,

    /// Render the reward curve and export the history at the end.
    pub plot: bool,
}

impl Default for LearnConfig {
    fn default() -> Self {
        Self {
            timesteps: 0,
            train_every: 5,
            update_target_every: 50,
            show_every_episode: 4,
            batch_size: 64,
            discount: 0.8,
            min_epsilon: 0.05,
            decay_target_fraction: DEFAULT_DECAY_TARGET_FRACTION,
            min_reward: 150.0,
            max_episode_timesteps: 1000,
            model_dir: PathBuf::from("."),
            plot: true,
        }
    }
}

impl LearnConfig {
    /// Sets the environment step budget.
    pub fn timesteps(mut self, v: usize) -> Self {
        self.timesteps = v;
        self
    }

    /// Sets the interval of training updates in environment steps.
    pub fn train_every(mut self, v: usize) -> Self {
        self.train_every = v;
        self
    }

    /// Sets the interval of target network syncs in environment steps.
    pub fn update_target_every(mut self, v: usize) -> Self {
        self.update_target_every = v;
        self
    }

    /// Sets the interval of status lines in episodes.
    pub fn show_every_episode(mut self, v: usize) -> Self {
        self.show_every_episode = v;
        self
    }

    /// Sets the minibatch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount(mut self, v: f32) -> Self {
        self.discount = v;
        self
    }

    /// Sets the exploration floor.
    pub fn min_epsilon(mut self, v: f64) -> Self {
        self.min_epsilon = v;
        self
    }

    pub fn decay_target_fraction(mut self, v: f64) -> Self {
        self.decay_target_fraction = v;
        self
    }

    /// Sets the reward threshold for checkpoints.
    pub fn min_reward(mut self, v: f32) -> Self {
        self.min_reward = v;
        self
    }

    pub fn max_episode_timesteps(mut self, v: usize) -> Self {
        self.max_episode_timesteps = v;
        self
    }

    /// Sets the checkpoint directory.
    pub fn model_dir(mut self, v: impl Into<PathBuf>) -> Self {
        self.model_dir = v.into();
        self
    }

    pub fn plot(mut self, v: bool) -> Self {
        self.plot = v;
        self
    }

    /// Rejects values the training loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("timesteps", self.timesteps),
            ("train_every", self.train_every),
            ("update_target_every", self.update_target_every),
            ("show_every_episode", self.show_every_episode),
            ("batch_size", self.batch_size),
            ("max_episode_timesteps", self.max_episode_timesteps),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(DeepQError::invalid_parameter(*name, "must be greater than 0"));
        }
        if !(self.min_epsilon > 0.0 && self.min_epsilon <= 1.0) {
            return Err(DeepQError::invalid_parameter("min_epsilon", "must be in (0, 1]"));
        }
        if !(self.decay_target_fraction > 0.0 && self.decay_target_fraction <= 1.0) {
            return Err(DeepQError::invalid_parameter("decay_target_fraction", "must be in (0, 1]"));
        }
        if !self.discount.is_finite() {
            return Err(DeepQError::invalid_parameter("discount", "must be finite"));
        }
        Ok(())
    }

    /// Constructs [`LearnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(config)
    }

    /// Saves [`LearnConfig`] as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Construction-time parameters of [`Dqn`](crate::agent::Dqn).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct DqnConfig {
    /// Capacity of the replay buffer.
    pub max_replay_size: usize,

    /// Seed for exploration and minibatch sampling; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for DqnConfig {
    fn default() -> Self {
        Self {
            max_replay_size: DEFAULT_MAX_REPLAY_SIZE,
            seed: None,
        }
    }
}

impl DqnConfig {
    pub fn max_replay_size(mut self, v: usize) -> Self {
        self.max_replay_size = v;
        self
    }

    pub fn seed(mut self, v: u64) -> Self {
        self.seed = Some(v);
        self
    }
}
