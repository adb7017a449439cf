// Domain service interface for forwarding conversations to a language model

use async_trait::async_trait;

use super::models::Conversation;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("invalid conversation: {0}")]
    InvalidConversation(String),

    #[error("language model request failed: {0}")]
    Provider(String),
}

pub type Result<T> = std::result::Result<T, ChatError>;

/// A language-model backend that answers a conversation with one reply
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Returns the assistant reply, trimmed of surrounding whitespace
    async fn complete(&self, conversation: &Conversation) -> Result<String>;

    /// Get the name of this provider
    fn name(&self) -> &str;
}
