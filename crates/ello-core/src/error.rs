//! Error taxonomy for a single RPC call.
//!
//! Every failure is scoped to the call that produced it.  [`EchoError`]
//! converts into a [`tonic::Status`] so handlers can use `?` directly.

use thiserror::Error;
use tonic::{Code, Status};

/// All errors the core can produce while serving one call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EchoError {
    /// The request carries no `"user"` message with non-empty content.
    #[error("No user message found")]
    NoUserMessage,

    /// The receiving side went away before chunk `index` could be delivered.
    #[error("stream receiver disconnected before chunk {index}")]
    Disconnected { index: i32 },
}

impl EchoError {
    /// gRPC status code this error maps to.
    pub fn code(&self) -> Code {
        match self {
            EchoError::NoUserMessage => Code::InvalidArgument,
            EchoError::Disconnected { .. } => Code::Cancelled,
        }
    }
}

impl From<EchoError> for Status {
    fn from(e: EchoError) -> Self {
        Status::new(e.code(), e.to_string())
    }
}
