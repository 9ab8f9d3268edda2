//! Generated gRPC types for the `llm.LLMService` chat-completion fixture.
//!
//! The protobuf definitions live in `proto/llm.proto` and are compiled by
//! `build.rs`.  Downstream crates should depend on this crate rather than
//! running `tonic-prost-build` themselves.

pub mod llm {
    tonic::include_proto!("llm");
}

pub use llm::llm_service_client::LlmServiceClient;
pub use llm::llm_service_server::{LlmService, LlmServiceServer};
pub use llm::{ChatCompletionResponse, ChatRequest, ChatResponse, Choice, Message};

/// Role string carried by every message the service emits.
pub const ROLE_ASSISTANT: &str = "assistant";

/// Role string that marks a caller-authored message.
pub const ROLE_USER: &str = "user";

impl Message {
    /// Convenience constructor used by the server and the client harness.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// A `"user"` message with the given content.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ROLE_USER, content)
    }

    /// An `"assistant"` message with the given content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ROLE_ASSISTANT, content)
    }
}
