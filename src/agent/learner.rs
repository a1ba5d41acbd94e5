use std::fs;
use std::path::PathBuf;

use log::{debug, info, warn};

use super::dqn::Dqn;
use super::epsilon::EpsilonSchedule;
use super::rollout::{EpisodeProgress, Rollout};
use super::traits::QNetwork;
use crate::config::LearnConfig;
use crate::environment::Environment;
use crate::error::Result;
use crate::metrics::{EpisodeRecord, TrainingHistory};
use crate::visualization::plot_rewards;

/// Name of the checkpoint written when training completes.
pub const FINAL_CHECKPOINT: &str = "policy-model-final";

/// File name of the exported reward history.
pub const REWARD_HISTORY_FILE: &str = "rewards.json";

/// Name of the checkpoint written for a reported episode with `reward`.
pub fn checkpoint_name(reward: f32) -> String {
    format!("policy-model-{}", reward)
}

/// Mutable state of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerState {
    pub schedule: EpsilonSchedule,
    /// Environment steps taken over the whole run.
    pub global_steps: usize,
    /// Completed episodes.
    pub episodes: usize,
    pub train_updates: usize,
    pub target_syncs: usize,
    /// Whether the target network has received the policy weights.
    pub target_initialised: bool,
}

impl TrainerState {
    pub fn new(config: &LearnConfig) -> Result<Self> {
        Ok(TrainerState {
            schedule: EpsilonSchedule::new(1.0, config.min_epsilon, config.timesteps, config.decay_target_fraction)?,
            global_steps: 0,
            episodes: 0,
            train_updates: 0,
            target_syncs: 0,
            target_initialised: false,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.schedule.epsilon()
    }
}

/// Outcome of [`Dqn::learn`].
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub state: TrainerState,
    pub history: TrainingHistory,
    /// Every checkpoint written during the run, the final one last.
    pub checkpoints: Vec<PathBuf>,
}

/// The outer training loop.
pub struct Learner<'a> {
    config: &'a LearnConfig,
}

impl<'a> Learner<'a> {
    pub fn new(config: &'a LearnConfig) -> Result<Self> {
        config.validate()?;
        Ok(Learner { config })
    }

    /// Runs episodes until the step budget is spent.
    ///
    /// The budget is only checked between episodes, so the run can
    /// overshoot `timesteps` by up to one episode.
    pub fn run<E, N>(&self, agent: &mut Dqn<N>, env: &mut E) -> Result<TrainingReport>
    where
        E: Environment,
        N: QNetwork,
    {
        let config = self.config;
        let mut state = TrainerState::new(config)?;
        let mut history = TrainingHistory::new();
        let mut checkpoints = Vec::new();

        info!(
            "Training for {} timesteps (batch size {}, train every {}, target sync every {})",
            config.timesteps, config.batch_size, config.train_every, config.update_target_every
        );

        while state.global_steps < config.timesteps {
            let last = self.run_episode(agent, env, &mut state, &mut history)?;
            state.episodes += 1;
            state.target_initialised = agent.target_initialised() || state.target_syncs > 0;

            if state.episodes % config.show_every_episode == 0 {
                info!(
                    "episode: {} | explore rate: {:.4} | episode reward: {} | episode length: {} | timesteps done: {}",
                    state.episodes,
                    state.epsilon(),
                    last.rewards,
                    last.steps,
                    state.global_steps
                );

                if last.rewards > config.min_reward {
                    let path = config.model_dir.join(checkpoint_name(last.rewards));
                    fs::create_dir_all(&config.model_dir)?;
                    agent.save_policy(&path)?;
                    info!("Saved the policy network in {:?}.", &path);
                    checkpoints.push(path);
                }
            }

            history.record_episode(EpisodeRecord {
                episode: state.episodes,
                reward: last.rewards,
                length: last.steps,
                epsilon: state.epsilon(),
                timesteps: state.global_steps,
            });
        }

        let path = config.model_dir.join(FINAL_CHECKPOINT);
        fs::create_dir_all(&config.model_dir)?;
        agent.save_policy(&path)?;
        info!("Saved the final policy network in {:?}.", &path);
        checkpoints.push(path);

        if config.plot {
            info!("\n{}", plot_rewards(&history, 60, 15));
            let history_path = config.model_dir.join(REWARD_HISTORY_FILE);
            if let Err(e) = history.export_json(&history_path) {
                warn!("Failed to export reward history to {:?}: {}", &history_path, e);
            }
        }

        Ok(TrainingReport { state, history, checkpoints })
    }

    /// Drives one rollout to its end, training and syncing between steps.
    /// Returns the progress reported by the last step.
    fn run_episode<E, N>(
        &self,
        agent: &mut Dqn<N>,
        env: &mut E,
        state: &mut TrainerState,
        history: &mut TrainingHistory,
    ) -> Result<EpisodeProgress>
    where
        E: Environment,
        N: QNetwork,
    {
        let config = self.config;
        let mut rollout = Rollout::start(env, state.epsilon(), config.max_episode_timesteps)?;
        let mut last = EpisodeProgress::default();

        while let Some(progress) = rollout.next_step(env, agent)? {
            state.schedule.step();
            state.global_steps += 1;

            let ready = agent.replay().len() > config.batch_size;

            if ready && state.global_steps % config.train_every == 0 {
                let loss = agent.train_step(config.batch_size, config.discount)?;
                state.train_updates += 1;
                history.record_loss(loss);
                debug!("step {}: training loss {}", state.global_steps, loss);
            }

            if ready && state.global_steps % config.update_target_every == 0 {
                agent.sync_target()?;
                state.target_syncs += 1;
                debug!("step {}: target network synced", state.global_steps);
            }

            last = progress;
        }

        Ok(last)
    }
}
