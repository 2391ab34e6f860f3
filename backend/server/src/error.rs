//! Startup failures. Anything here aborts the process before the
//! server binds.

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Error while connecting/binding to the socket: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse the configuration: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Error while starting the server: {0}")]
    ServerError(String),
}
