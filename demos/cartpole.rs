//! CartPole with the default Q-network architecture.
//!
//! Run with `cargo run --release --example cartpole [learn.yaml]`. Without
//! a config file the agent trains for 20000 timesteps and writes its
//! checkpoints to `models/cartpole`. Set `RUST_LOG=info` to see progress.

use std::env;
use std::f32::consts::PI;

use deepq::agent::Dqn;
use deepq::builders::DenseNetworkBuilder;
use deepq::config::LearnConfig;
use deepq::environment::{Environment, Step};
use deepq::error::{DeepQError, Result};
use log::info;
use ndarray::{array, Array1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Pole balanced on a cart pushed left (action 0) or right (action 1).
struct CartPole {
    x: f32,
    x_dot: f32,
    theta: f32,
    theta_dot: f32,
    gravity: f32,
    mass_cart: f32,
    mass_pole: f32,
    length: f32,
    force_mag: f32,
    dt: f32,
    rng: StdRng,
}

impl CartPole {
    fn new(seed: u64) -> Self {
        CartPole {
            x: 0.0,
            x_dot: 0.0,
            theta: 0.0,
            theta_dot: 0.0,
            gravity: 9.8,
            mass_cart: 1.0,
            mass_pole: 0.1,
            length: 0.5,
            force_mag: 10.0,
            dt: 0.02,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn state(&self) -> Array1<f32> {
        array![self.x, self.x_dot, self.theta, self.theta_dot]
    }
}

impl Environment for CartPole {
    fn action_n(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<Array1<f32>> {
        self.x = self.rng.gen_range(-0.05..0.05);
        self.x_dot = self.rng.gen_range(-0.05..0.05);
        self.theta = self.rng.gen_range(-0.05..0.05);
        self.theta_dot = self.rng.gen_range(-0.05..0.05);
        Ok(self.state())
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        let force = match action {
            0 => -self.force_mag,
            1 => self.force_mag,
            _ => return Err(DeepQError::InvalidAction { action, action_n: 2 }),
        };

        let cos_theta = self.theta.cos();
        let sin_theta = self.theta.sin();
        let total_mass = self.mass_cart + self.mass_pole;
        let pole_mass_length = self.mass_pole * self.length;

        let temp = (force + pole_mass_length * self.theta_dot * self.theta_dot * sin_theta) / total_mass;
        let theta_acc = (self.gravity * sin_theta - cos_theta * temp)
            / (self.length * (4.0 / 3.0 - self.mass_pole * cos_theta * cos_theta / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos_theta / total_mass;

        self.x += self.dt * self.x_dot;
        self.x_dot += self.dt * x_acc;
        self.theta += self.dt * self.theta_dot;
        self.theta_dot += self.dt * theta_acc;

        let done = self.x.abs() > 2.4 || self.theta.abs() > PI / 15.0;
        let mut step = Step::new(self.state(), if done { 0.0 } else { 1.0 }, done);
        step.info.insert("theta".to_string(), self.theta);
        Ok(step)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => LearnConfig::load(path)?,
        None => LearnConfig::default()
            .timesteps(20_000)
            .max_episode_timesteps(500)
            .model_dir("models/cartpole"),
    };

    let mut env = CartPole::new(42);
    let mut builder = DenseNetworkBuilder::new(4).seed(42);
    let mut agent = Dqn::new(env.action_n(), |action_n| builder.build(action_n))?;

    let report = agent.learn(&mut env, &config)?;
    info!(
        "Trained for {} timesteps over {} episodes",
        report.state.global_steps, report.state.episodes
    );

    let rewards = agent.play(&mut env)?;
    info!("Greedy episode rewards: {:?}", rewards);
    Ok(())
}
