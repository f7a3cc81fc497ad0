use thiserror::Error;

/// Failure of a single fetch attempt. `Display` is the message shown to the user.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("{message}")]
    Transport { message: String },

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("{message}")]
    Parse { message: String },

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("{0}")]
    Rejected(String),
}

impl FetchError {
    pub const PARSE_FAILURE: &'static str = "Failed to parse response body";

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }

    pub fn parse() -> Self {
        Self::Parse {
            message: Self::PARSE_FAILURE.to_string(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NormalizationError {
    #[error("Property record is not a JSON object")]
    NotAnObject,

    #[error("Property record has none of name, address or price")]
    MissingCoreFields,

    #[error("Malformed property record: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
