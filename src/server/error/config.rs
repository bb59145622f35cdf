use thiserror::Error;

/// Malformed environment configuration; every variable has a default, so only bad values fail.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: String, reason: String },
}
