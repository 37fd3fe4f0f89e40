//! Error types shared by every step of the sync workflow.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A required setting is missing or malformed
    #[error("Configuration error: {0}")]
    ConfigValidation(String),

    /// The target could not be split into subdomain / domain / suffix
    #[error("Couldn't extract a domain from '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// Every public IP endpoint failed
    #[error("Couldn't get my public IP. Tried {tried:?}")]
    Resolution { tried: Vec<String> },

    /// The remote API answered with something other than 200 OK
    #[error("{method} to {url} returned {status}")]
    RemoteApi {
        method: String,
        url: String,
        status: String,
    },

    /// The remote API answered 200 but the payload is unusable
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// The provider has no A record for the target
    #[error("Couldn't get info on the domain {0}. Do we own that domain?")]
    NotFound(String),

    /// JSON body could not be decoded
    #[error("Failed to decode the response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Attempted write without a resolved IP
    #[error("Given public IP is absent")]
    NilInput,

    /// Network-level failure (DNS, refused connection, timeout, body read)
    #[error("Failed to execute request {url}: {message}")]
    Transport { url: String, message: String },
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigValidation(msg.into())
    }

    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn transport(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Process exit code for this failure.
    ///
    /// 1 for anything the user can fix in their configuration, 2 for
    /// failures that happened while talking to the network.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::ConfigValidation(_) | Error::Parse { .. } => 1,
            _ => 2,
        }
    }
}
