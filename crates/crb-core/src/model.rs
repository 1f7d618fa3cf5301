//! Port for the remote conversational model.

use async_trait::async_trait;

use crate::conversation::Turn;

/// Reply used when the remote call fails (transport error, non-2xx, bad body).
pub const ERROR_REPLY: &str = "Sorry, I encountered an error while processing your request.";

/// Reply used when the remote answered but without a `model_output`.
pub const EMPTY_OUTPUT_REPLY: &str = "Sorry, I couldn't process your request.";

/// Normalized request for a single reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatRequest {
    pub prompt: String,
    pub bot_name: String,
    pub user_name: String,
    /// Full history, oldest first. Sent as-is; no windowing.
    pub chat_history: Vec<Turn>,
}

/// Model client interface used by the router.
///
/// Implementations never fail: remote faults are logged and mapped to
/// [`ERROR_REPLY`], so the router always has something to record and send.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn get_reply(&self, req: &ChatRequest) -> String;
}

/// Cut a model output at the first mention of `user_name`.
///
/// The remote model sometimes keeps going and writes the user's next line
/// ("... User: what now"). This is a plain substring match, so a reply that
/// legitimately contains the user label is truncated too. When nothing is cut
/// the output is returned untouched.
pub fn strip_echoed_user_turn(output: &str, user_name: &str) -> String {
    if user_name.is_empty() {
        return output.to_string();
    }
    match output.find(user_name) {
        Some(idx) => output[..idx].trim().to_string(),
        None => output.to_string(),
    }
}
