//! Request validation and response sequencing for the `llm.LLMService`
//! chat-completion fixture.
//!
//! The crate is split the same way a call flows through it:
//!
//! - [`validator`] picks the message to echo out of a [`ChatRequest`].
//! - [`responder::StreamingResponder`] emits one chunk per template token and a
//!   terminal chunk, pacing itself with an injectable [`Clock`].
//! - [`responder::CompletionResponder`] assembles the unary response with its
//!   fixture usage counters.
//! - [`service::EchoService`] implements the generated tonic trait and routes
//!   each RPC to the right responder.
//!
//! [`ChatRequest`]: ello_proto::ChatRequest

pub mod clock;
pub mod error;
pub mod responder;
pub mod service;
pub mod validator;

pub use clock::{Clock, SystemClock};
pub use error::EchoError;
pub use responder::{ChunkSink, CompletionResponder, StreamingResponder};
pub use service::{EchoService, ServiceConfig};
