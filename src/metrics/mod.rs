//! Per-episode training history.
pub mod tracker;

pub use tracker::{EpisodeRecord, TrainingHistory};
