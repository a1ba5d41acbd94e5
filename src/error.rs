use thiserror::Error;

/// Result type for deepq operations
pub type Result<T> = std::result::Result<T, DeepQError>;

/// Main error type for the deepq crate
#[derive(Debug, Error)]
pub enum DeepQError {
    /// A batch larger than the replay buffer was requested
    #[error("Insufficient data: requested {requested} transitions, buffer holds {available}")]
    InsufficientData { requested: usize, available: usize },

    /// Invalid dimensions for operations
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Action index outside the environment's action space
    #[error("Invalid action {action}: must be less than {action_n}")]
    InvalidAction { action: usize, action_n: usize },

    /// Failure reported by an environment implementation
    #[error("Environment error: {0}")]
    Environment(String),

    /// IO errors (checkpoint files, config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Checkpoint serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Config file errors
    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Numerical computation errors
    #[error("Numerical error: {0}")]
    Numerical(String),
}

impl DeepQError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        DeepQError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        DeepQError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
