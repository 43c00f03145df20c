use thiserror::Error;

/// Opaque failure cause of a remote call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("Malformed response: {message}")]
    Decode { message: String },
}

impl RemoteError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self::Status { status }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}
