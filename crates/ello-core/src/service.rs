//! tonic-facing implementation of `llm.LLMService`.
//!
//! Each streaming call gets its own tokio task writing into a bounded channel;
//! the receiving half is returned to tonic as the response stream.  When the
//! client goes away tonic drops that receiver, which is what the responder
//! observes as a disconnect.

use std::sync::Arc;
use std::time::Duration;

use ello_proto::{ChatCompletionResponse, ChatRequest, ChatResponse, LlmService, LlmServiceServer};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};
use tracing::{debug, info, warn, Instrument};

use crate::clock::{Clock, SystemClock};
use crate::responder::{CompletionResponder, StreamingResponder};
use crate::validator;

/// Default simulated processing time between streamed chunks.
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(200);

/// Default capacity of the per-call chunk channel.
pub const DEFAULT_STREAM_BUFFER: usize = 4;

/// Tunables for [`EchoService`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Delay after each streamed token chunk.  Zero disables pacing.
    pub chunk_delay: Duration,
    /// Capacity of the channel between a streaming task and tonic.
    pub stream_buffer: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            chunk_delay: DEFAULT_CHUNK_DELAY,
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }
}

/// The echo chat-completion service.
#[derive(Debug, Clone)]
pub struct EchoService {
    streaming: StreamingResponder,
    completion: CompletionResponder,
    stream_buffer: usize,
}

impl Default for EchoService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

impl EchoService {
    /// Build a service backed by the system clock.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build a service with an explicit time source.
    pub fn with_clock(config: ServiceConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            streaming: StreamingResponder::new(Arc::clone(&clock), config.chunk_delay),
            completion: CompletionResponder::new(clock),
            // A zero-capacity channel would panic in tokio.
            stream_buffer: config.stream_buffer.max(1),
        }
    }

    /// Wrap the service in the generated tonic server.
    pub fn into_server(self) -> LlmServiceServer<Self> {
        LlmServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl LlmService for EchoService {
    type ChatCompletionStreamStream = ReceiverStream<Result<ChatResponse, Status>>;

    async fn chat_completion_stream(
        &self,
        request: Request<ChatRequest>,
    ) -> Result<Response<Self::ChatCompletionStreamStream>, Status> {
        let req = request.into_inner();
        info!(model = %req.model, "Received streaming request");

        let echo = validator::last_user_message(&req)
            .inspect_err(|e| debug!(model = %req.model, error = %e, "rejected streaming request"))?
            .to_owned();

        let (tx, rx) = mpsc::channel(self.stream_buffer);
        let responder = self.streaming.clone();
        let model = req.model;

        tokio::spawn(
            async move {
                match responder.run(&model, &echo, &tx).await {
                    Ok(sent) => debug!(model = %model, chunks = sent, "streaming call finished"),
                    Err(e) => warn!(model = %model, error = %e, "streaming call aborted"),
                }
            }
            .in_current_span(),
        );

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn chat_completion(
        &self,
        request: Request<ChatRequest>,
    ) -> Result<Response<ChatCompletionResponse>, Status> {
        let req = request.into_inner();
        info!(model = %req.model, "Received non-streaming request");

        let echo = validator::last_user_message(&req)
            .inspect_err(|e| debug!(model = %req.model, error = %e, "rejected completion request"))?;

        let resp = self.completion.respond(&req.model, echo);
        debug!(
            model = %req.model,
            total_tokens = resp.usage_total_tokens,
            "completion built"
        );
        Ok(Response::new(resp))
    }
}
