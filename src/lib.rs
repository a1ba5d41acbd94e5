//! # deepq - A Minimal Deep Q-Network Agent
//!
//! deepq learns a control policy for environments with a discrete action
//! space. The action-value function is approximated by a neural network
//! that is trained from an experience replay buffer, with a second target
//! network providing stable bootstrap values.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deepq::agent::Dqn;
//! use deepq::builders::DenseNetworkBuilder;
//! use deepq::config::LearnConfig;
//! # use deepq::environment::{Environment, Step};
//! # use ndarray::{array, Array1};
//! # struct CartPole;
//! # impl Environment for CartPole {
//! #     fn action_n(&self) -> usize { 2 }
//! #     fn reset(&mut self) -> deepq::error::Result<Array1<f32>> { Ok(array![0.0, 0.0, 0.0, 0.0]) }
//! #     fn step(&mut self, _a: usize) -> deepq::error::Result<Step> { Ok(Step::new(array![0.0, 0.0, 0.0, 0.0], 1.0, true)) }
//! # }
//!
//! // Policy and target networks: 4 observation features, 2 actions
//! let mut builder = DenseNetworkBuilder::new(4);
//! let mut agent = Dqn::new(2, |action_n| builder.build(action_n)).unwrap();
//!
//! let mut env = CartPole;
//! let config = LearnConfig::default().timesteps(50_000).model_dir("models");
//! agent.learn(&mut env, &config).unwrap();
//! agent.play(&mut env).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions of the dense layers
//! - [`agent`] - The DQN agent, rollouts, the training loop and the epsilon schedule
//! - [`builders`] - Builder for the default Q-network architecture
//! - [`config`] - Training and agent configuration (YAML loadable)
//! - [`environment`] - The environment interface the agent drives
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense layers and weight initialization
//! - [`loss`] - Mean squared error
//! - [`metrics`] - Per-episode training history
//! - [`network`] - The concrete feed-forward Q-network
//! - [`optimizer`] - SGD and Adam
//! - [`replay_buffer`] - Fixed-capacity FIFO experience replay
//! - [`visualization`] - ASCII reward curves

pub mod activations;
pub mod agent;
pub mod builders;
pub mod config;
pub mod environment;
pub mod error;
pub mod layers;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;
pub mod visualization;

#[cfg(test)]
mod tests;
