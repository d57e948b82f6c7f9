use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request failed: {status}")]
    RequestFailed { status: String },

    #[error("Exchange returned code {code}: {msg}")]
    Application { code: i64, msg: String },

    #[error("Failed to parse response: {0}")]
    ParseFailure(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ParseFailure(err.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Server(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
