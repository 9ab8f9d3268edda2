//! Response construction for both RPC shapes.
//!
//! [`StreamingResponder`] drives the server-streaming call chunk by chunk;
//! [`CompletionResponder`] builds the single unary response.  Both take an
//! already-validated echo string (see [`crate::validator`]).

mod complete;
mod stream;

use async_trait::async_trait;
use ello_proto::ChatResponse;
use thiserror::Error;
use tokio::sync::mpsc;
use tonic::Status;

pub use complete::{CompletionResponder, Usage, COMPLETION_OVERHEAD_TOKENS};
pub use stream::{stream_tokens, StreamingResponder, STREAM_TOKEN_COUNT};

/// `finish_reason` carried by the terminal chunk and the unary choice.
pub const FINISH_REASON_STOP: &str = "stop";

/// Returned by a [`ChunkSink`] whose receiving side is gone.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("chunk sink closed")]
pub struct SinkClosed;

/// Destination for the chunks of one streaming call.
///
/// The dispatcher hands the responder a bounded channel; tests use in-memory
/// sinks that can simulate a disconnect at any point.
#[async_trait]
pub trait ChunkSink: Send + Sync {
    /// Deliver one chunk, waiting for capacity if the sink is full.
    async fn send(&self, chunk: ChatResponse) -> Result<(), SinkClosed>;

    /// Resolves once the receiving side has gone away.
    async fn closed(&self);
}

#[async_trait]
impl ChunkSink for mpsc::Sender<Result<ChatResponse, Status>> {
    async fn send(&self, chunk: ChatResponse) -> Result<(), SinkClosed> {
        mpsc::Sender::send(self, Ok(chunk))
            .await
            .map_err(|_| SinkClosed)
    }

    async fn closed(&self) {
        mpsc::Sender::closed(self).await
    }
}
