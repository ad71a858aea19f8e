use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by the transport, the channel aggregator and the credential store
#[derive(Debug, Error)]
pub enum Error {
    #[error("request to {operation} failed: {source}")]
    Http {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} returned status {status}")]
    Status {
        operation: String,
        status: StatusCode,
    },

    #[error("failed to decode {operation} response: {source}")]
    Decode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation} rejected by Slack: {code}")]
    Api { operation: String, code: String },

    #[error("invalid token")]
    EmptyToken,

    #[error("fetching the member directory failed: {0}")]
    Directory(#[source] Box<Error>),

    #[error("invalid channel name or id: {0}")]
    ChannelNotFound(String),

    #[error("workspace {0} is not registered")]
    UnknownWorkspace(String),

    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("failed to read {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read credential store {path:?}: {source}")]
    StoreRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse credential store {path:?}: {source}")]
    StoreParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize credential store: {0}")]
    StoreSerialize(#[from] toml::ser::Error),

    #[error("failed to write credential store {path:?}: {source}")]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Platform error code when Slack answered with `ok: false`
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Error::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
