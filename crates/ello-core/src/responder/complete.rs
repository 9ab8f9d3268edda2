use std::sync::Arc;

use ello_proto::{ChatCompletionResponse, Choice, Message};

use super::FINISH_REASON_STOP;
use crate::clock::Clock;

/// Fixed amount added to the echo length for the completion counter.
pub const COMPLETION_OVERHEAD_TOKENS: u64 = 30;

/// Fixture usage counters, derived from the echo's byte length.
///
/// These are not token counts; they give client usage parsers a stable,
/// predictable value to check against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl Usage {
    pub fn for_echo(echo: &str) -> Self {
        let len = echo.len() as u64;
        Self {
            prompt_tokens: len,
            completion_tokens: len + COMPLETION_OVERHEAD_TOKENS,
            total_tokens: len * 2 + COMPLETION_OVERHEAD_TOKENS,
        }
    }
}

/// Builds the single response of a unary call.
#[derive(Clone)]
pub struct CompletionResponder {
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CompletionResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionResponder").finish_non_exhaustive()
    }
}

impl CompletionResponder {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn respond(&self, model: &str, echo: &str) -> ChatCompletionResponse {
        let usage = Usage::for_echo(echo);
        ChatCompletionResponse {
            id: "msg_complete".to_owned(),
            model: model.to_owned(),
            choices: vec![Choice {
                message: Some(Message::assistant(format!(
                    "Echo: {echo} (complete response from server)"
                ))),
                finish_reason: FINISH_REASON_STOP.to_owned(),
                index: 0,
            }],
            created: self.clock.now_unix(),
            usage_prompt_tokens: usage.prompt_tokens,
            usage_completion_tokens: usage.completion_tokens,
            usage_total_tokens: usage.total_tokens,
        }
    }
}
