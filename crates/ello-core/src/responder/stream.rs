use std::sync::Arc;
use std::time::Duration;

use ello_proto::{ChatResponse, Choice, Message};
use tracing::debug;

use super::{ChunkSink, FINISH_REASON_STOP};
use crate::clock::Clock;
use crate::error::EchoError;

/// Number of non-terminal chunks a streaming call emits.
pub const STREAM_TOKEN_COUNT: usize = 6;

/// Split an echo into the fixed streaming template.
///
/// The echoed content is always a single token, whatever it contains.
pub fn stream_tokens(echo: &str) -> [&str; STREAM_TOKEN_COUNT] {
    ["Echo:", echo, "(streaming", "response", "from", "server)"]
}

/// Emits the chunk sequence of one server-streaming call.
///
/// Chunks `0..STREAM_TOKEN_COUNT` each carry one template token followed by a
/// space, with `done = false` and an empty `finish_reason`.  A terminal chunk
/// at index `STREAM_TOKEN_COUNT` follows with empty content, `"stop"` and
/// `done = true`.  The responder waits `chunk_delay` after every token chunk.
#[derive(Clone)]
pub struct StreamingResponder {
    clock: Arc<dyn Clock>,
    chunk_delay: Duration,
}

impl std::fmt::Debug for StreamingResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResponder")
            .field("chunk_delay", &self.chunk_delay)
            .finish_non_exhaustive()
    }
}

impl StreamingResponder {
    pub fn new(clock: Arc<dyn Clock>, chunk_delay: Duration) -> Self {
        Self { clock, chunk_delay }
    }

    /// Stream `echo` into `sink`, returning the number of chunks delivered.
    ///
    /// Stops at the first failed send, or as soon as the sink reports it has
    /// closed during a delay.  Nothing is sent after that point, including
    /// the terminal chunk.
    pub async fn run<S>(&self, model: &str, echo: &str, sink: &S) -> Result<usize, EchoError>
    where
        S: ChunkSink + ?Sized,
    {
        let mut index: i32 = 0;
        for token in stream_tokens(echo) {
            let chunk = self.token_chunk(model, index, token);
            sink.send(chunk)
                .await
                .map_err(|_| EchoError::Disconnected { index })?;
            debug!(model, index, "sent stream chunk");

            index += 1;
            self.pause(sink, index).await?;
        }

        sink.send(self.terminal_chunk(model, index))
            .await
            .map_err(|_| EchoError::Disconnected { index })?;
        debug!(model, index, "sent terminal chunk");

        Ok(STREAM_TOKEN_COUNT + 1)
    }

    /// Simulated processing time, cut short if the receiver goes away.
    async fn pause<S>(&self, sink: &S, next_index: i32) -> Result<(), EchoError>
    where
        S: ChunkSink + ?Sized,
    {
        if self.chunk_delay.is_zero() {
            return Ok(());
        }
        tokio::select! {
            biased;
            _ = sink.closed() => Err(EchoError::Disconnected { index: next_index }),
            _ = self.clock.sleep(self.chunk_delay) => Ok(()),
        }
    }

    fn token_chunk(&self, model: &str, index: i32, token: &str) -> ChatResponse {
        ChatResponse {
            id: format!("msg_{index}"),
            model: model.to_owned(),
            choice: Some(Choice {
                message: Some(Message::assistant(format!("{token} "))),
                finish_reason: String::new(),
                index,
            }),
            created: self.clock.now_unix(),
            done: false,
        }
    }

    fn terminal_chunk(&self, model: &str, index: i32) -> ChatResponse {
        ChatResponse {
            id: "msg_final".to_owned(),
            model: model.to_owned(),
            choice: Some(Choice {
                message: Some(Message::assistant(String::new())),
                finish_reason: FINISH_REASON_STOP.to_owned(),
                index,
            }),
            created: self.clock.now_unix(),
            done: true,
        }
    }
}
