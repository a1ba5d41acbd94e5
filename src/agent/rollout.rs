use ndarray::Array1;

use super::dqn::Dqn;
use super::traits::QNetwork;
use crate::environment::Environment;
use crate::error::Result;
use crate::replay_buffer::Transition;

/// Progress of the running episode after a step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpisodeProgress {
    /// Steps taken in this episode so far.
    pub steps: usize,
    /// Sum of the rewards received in this episode so far.
    pub rewards: f32,
}

/// One epsilon-greedy episode, advanced a step at a time by the caller.
///
/// The rollout does not borrow the agent or the environment between steps,
/// so the caller can train the agent after every produced step before
/// pulling the next one. Each step appends its transition to the agent's
/// replay buffer. The episode ends when the environment reports `done` (the
/// environment is closed on the following pull) or after
/// `max_timesteps` steps; an ended rollout cannot be resumed.
#[derive(Debug)]
pub struct Rollout {
    observation: Array1<f32>,
    epsilon: f64,
    max_timesteps: usize,
    progress: EpisodeProgress,
    done: bool,
    finished: bool,
}

impl Rollout {
    /// Resets `env` and starts an episode that explores with `epsilon`
    /// for its whole duration.
    pub fn start<E: Environment>(env: &mut E, epsilon: f64, max_timesteps: usize) -> Result<Self> {
        let observation = env.reset()?;
        Ok(Rollout {
            observation,
            epsilon,
            max_timesteps,
            progress: EpisodeProgress::default(),
            done: false,
            finished: max_timesteps == 0,
        })
    }

    /// Takes the next environment step, or returns `None` once the episode is over.
    pub fn next_step<E, N>(&mut self, env: &mut E, agent: &mut Dqn<N>) -> Result<Option<EpisodeProgress>>
    where
        E: Environment,
        N: QNetwork,
    {
        if self.finished {
            return Ok(None);
        }
        if self.done {
            self.finished = true;
            env.close()?;
            return Ok(None);
        }
        if self.progress.steps >= self.max_timesteps {
            self.finished = true;
            return Ok(None);
        }

        let action = agent.select_action(env, self.observation.view(), self.epsilon)?;
        let step = env.step(action)?;

        agent.remember(Transition {
            observation: self.observation.clone(),
            action,
            reward: step.reward,
            next_observation: step.observation.clone(),
            done: step.done,
        });

        self.progress.rewards += step.reward;
        self.progress.steps += 1;
        self.observation = step.observation;
        self.done = step.done;

        Ok(Some(self.progress))
    }

    pub fn progress(&self) -> EpisodeProgress {
        self.progress
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
