pub mod network;

pub use network::{DenseNetworkBuilder, OptimizerKind};
