use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize the bot. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the bot. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid configuration. {0}")]
    ConfigurationError(String),
    #[error("Could not understand the command. {0}")]
    InvalidCommand(String),
}
