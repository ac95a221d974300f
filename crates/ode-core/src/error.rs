use std::io;
use thiserror::Error;

/// Custom result type for ODE operations
pub type OdeResult<T> = Result<T, OdeError>;

/// Custom error type for ODE operations
#[derive(Debug, Error)]
pub enum OdeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("N3_KEY and N3_SECRET environment variables are required.")]
    MissingCredentials,

    #[error("Network error: {0}")]
    Network(String),

    #[error("{message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Environment not found: {0}")]
    EnvironmentNotFound(String),

    #[error("Environment still '{last_status}' after {attempts} poll attempts")]
    PollTimeout { attempts: u32, last_status: String },

    #[error("IO error: {0}")]
    Io(String),
}

impl OdeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        OdeError::Config(msg.into())
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        OdeError::Network(msg.into())
    }

    /// Create a new API error from a response status and message
    pub fn api<S: Into<String>>(status: u16, msg: S) -> Self {
        OdeError::Api {
            status,
            message: msg.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        OdeError::Serialization(msg.into())
    }

    /// Whether the error came from talking to the cloud API
    pub fn is_api_failure(&self) -> bool {
        matches!(
            self,
            OdeError::Network(_)
                | OdeError::Api { .. }
                | OdeError::Serialization(_)
                | OdeError::EnvironmentNotFound(_)
                | OdeError::PollTimeout { .. }
        )
    }
}

impl From<serde_json::Error> for OdeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for OdeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<io::Error> for OdeError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
