//! # DQN Agent Module
//!
//! The learning core of the crate: a Deep Q-Network agent trained from an
//! experience replay buffer with a periodically synced target network.
//!
//! - [`Dqn`]: owns the policy network, the target network and the replay
//!   buffer; exposes `learn`, `play` and `load`
//! - [`Rollout`]: one epsilon-greedy episode, pulled a step at a time
//! - [`Learner`]: the outer loop that interleaves rollout steps with
//!   training updates, target syncs, logging and checkpoints
//! - [`EpsilonSchedule`]: geometric decay of the exploration rate
//! - [`QNetwork`]: the function-approximator contract the agent relies on
//!
//! ## Training update
//!
//! For a sampled minibatch the policy network predicts `curr_qs` for the
//! observations and the target network predicts `future_qs` for the next
//! observations. The entry of the taken action in each row of `curr_qs` is
//! replaced by the TD target (`reward` for terminal transitions, `reward +
//! discount * max(future_qs[row])` otherwise) and the policy network is
//! fitted toward the result under mean squared error.

pub mod epsilon;
pub mod learner;
pub mod rollout;
pub mod traits;

mod dqn;
pub use dqn::{argmax, td_targets, Dqn, PLAY_EPISODES, PLAY_MAX_EPISODE_TIMESTEPS};
pub use epsilon::EpsilonSchedule;
pub use learner::{checkpoint_name, Learner, TrainerState, TrainingReport, FINAL_CHECKPOINT};
pub use rollout::{EpisodeProgress, Rollout};
pub use traits::QNetwork;
