//! Error types for the achievements crate.

/// Error types for engine setup.
///
/// Evaluation itself is total; these only arise while building an engine.
#[derive(Debug, thiserror::Error)]
pub enum AchievementError {
    /// Configuration parsed but is not usable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, AchievementError>;
