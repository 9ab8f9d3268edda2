//! Selects the message a call will echo.

use ello_proto::{ChatRequest, ROLE_USER};

use crate::error::EchoError;

/// Return the content of the last `"user"` message with non-empty content.
///
/// Later user messages shadow earlier ones.  Empty user messages are skipped,
/// so a trailing empty turn does not hide an earlier real one.
pub fn last_user_message(req: &ChatRequest) -> Result<&str, EchoError> {
    req.messages
        .iter()
        .rev()
        .find(|m| m.role == ROLE_USER && !m.content.is_empty())
        .map(|m| m.content.as_str())
        .ok_or(EchoError::NoUserMessage)
}
