use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DeepQError, Result};

/// Summary of one finished episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub reward: f32,
    pub length: usize,
    pub epsilon: f64,
    /// Environment steps taken so far, this episode included.
    pub timesteps: usize,
}

/// Stores training metrics over time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub episodes: Vec<EpisodeRecord>,
    /// Loss of every training update, in order.
    pub losses: Vec<f32>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_episode(&mut self, record: EpisodeRecord) {
        self.episodes.push(record);
    }

    pub fn record_loss(&mut self, loss: f32) {
        self.losses.push(loss);
    }

    pub fn rewards(&self) -> Vec<f32> {
        self.episodes.iter().map(|e| e.reward).collect()
    }

    /// Mean reward of the last `n` episodes.
    pub fn recent_mean_reward(&self, n: usize) -> Option<f32> {
        let start = self.episodes.len().saturating_sub(n);
        let recent = &self.episodes[start..];
        if recent.is_empty() {
            return None;
        }
        Some(recent.iter().map(|e| e.reward).sum::<f32>() / recent.len() as f32)
    }

    /// Writes the history as pretty-printed JSON.
    pub fn export_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| DeepQError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(episode: usize, reward: f32) -> EpisodeRecord {
        EpisodeRecord { episode, reward, length: 3, epsilon: 0.5, timesteps: episode * 3 }
    }

    #[test]
    fn test_recent_mean_reward() {
        let mut history = TrainingHistory::new();
        assert_eq!(history.recent_mean_reward(5), None);
        history.record_episode(record(1, 1.0));
        history.record_episode(record(2, 3.0));
        history.record_episode(record(3, 5.0));
        assert_eq!(history.recent_mean_reward(2), Some(4.0));
        assert_eq!(history.recent_mean_reward(10), Some(3.0));
    }

    #[test]
    fn test_export_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rewards.json");
        let mut history = TrainingHistory::new();
        history.record_episode(record(1, 2.5));
        history.record_loss(0.1);
        history.export_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: TrainingHistory = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, history);
    }
}
