use std::collections::VecDeque;

use ndarray::Array1;
use rand::seq::index;
use rand::Rng;

use crate::error::{DeepQError, Result};

/// Default number of transitions kept by the agent.
pub const DEFAULT_MAX_REPLAY_SIZE: usize = 10_000;

/// One environment step as seen by the agent.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub observation: Array1<f32>,
    pub action: usize,
    pub reward: f32,
    pub next_observation: Array1<f32>,
    /// True iff `next_observation` is terminal.
    pub done: bool,
}

/// Fixed-capacity FIFO store of transitions.
///
/// Entries are never modified after they are appended; the oldest ones are
/// evicted to make room once the buffer is full.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay buffer capacity must be positive");
        ReplayBuffer {
            buffer: VecDeque::with_capacity(capacity.min(DEFAULT_MAX_REPLAY_SIZE)),
            capacity,
        }
    }

    /// Appends `transition`, first dropping the `len - capacity + 1` oldest
    /// entries when the buffer is already full.
    pub fn append(&mut self, transition: Transition) {
        if self.buffer.len() >= self.capacity {
            let excess = self.buffer.len() - self.capacity + 1;
            self.buffer.drain(..excess);
        }
        self.buffer.push_back(transition);
    }

    /// Draws `batch_size` distinct transitions uniformly at random.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Result<Vec<&Transition>> {
        if batch_size > self.buffer.len() {
            return Err(DeepQError::InsufficientData {
                requested: batch_size,
                available: self.buffer.len(),
            });
        }

        Ok(index::sample(rng, self.buffer.len(), batch_size)
            .into_iter()
            .map(|i| &self.buffer[i])
            .collect())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }
}

impl Default for ReplayBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REPLAY_SIZE)
    }
}
