use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Network,
    Response,
    OptionsLoad,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Response => "response",
            Self::OptionsLoad => "options_load",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ResponseError {
    #[error("unexpected status {status}")]
    Status { status: u16 },
    #[error("malformed payload: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DirectoryError {
    #[error("request could not complete: {0}")]
    Network(String),
    #[error("bad response: {0}")]
    Response(#[from] ResponseError),
    #[error("party options unavailable: {0}")]
    OptionsLoad(String),
}

impl DirectoryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network(_) => ErrorCode::Network,
            Self::Response(_) => ErrorCode::Response,
            Self::OptionsLoad(_) => ErrorCode::OptionsLoad,
        }
    }

    pub fn status(status: u16) -> Self {
        Self::Response(ResponseError::Status { status })
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Response(ResponseError::Malformed(message.into()))
    }

    /// Re-labels a failed party list request.
    pub fn into_options_load(self) -> Self {
        match self {
            Self::OptionsLoad(_) => self,
            other => Self::OptionsLoad(other.to_string()),
        }
    }
}
