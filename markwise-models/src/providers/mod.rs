//! Model provider trait and implementations.
//!
//! The [`ModelProvider`] trait is the single seam between markwise and a
//! language model. Graders depend on `Arc<dyn ModelProvider>` so tests can
//! swap in a [`ScriptedProvider`].
//!
//! # Example
//!
//! ```ignore
//! use markwise_models::providers::{ChatRequest, Message, ModelProvider};
//!
//! async fn ask(provider: &dyn ModelProvider) -> markwise_models::Result<String> {
//!     let request = ChatRequest::new("gpt-4o-mini", vec![Message::user("Hello!")]);
//!     Ok(provider.chat(request).await?.content)
//! }
//! ```

mod openai;
mod scripted;
mod types;

use async_trait::async_trait;

pub use openai::{OpenAiCompatProvider, OpenAiConfig};
pub use scripted::ScriptedProvider;
pub use types::*;

use crate::Result;

/// Trait for chat-completion providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Returns the provider name (e.g., "openai", "openrouter").
    fn name(&self) -> &str;

    /// Perform a chat completion request.
    ///
    /// Implementations do not retry; callers decide how to degrade.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct EchoProvider;

    #[async_trait]
    impl ModelProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
            let last = request.last_user_message().unwrap_or_default();
            Ok(ChatResponse::text(format!("Echo: {last}")))
        }
    }

    #[tokio::test]
    async fn provider_is_usable_as_trait_object() {
        let provider: Arc<dyn ModelProvider> = Arc::new(EchoProvider);
        let request = ChatRequest::new("test-model", vec![Message::user("Hello")]);
        let response = provider.chat(request).await.unwrap();

        assert_eq!(provider.name(), "echo");
        assert_eq!(response.content, "Echo: Hello");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
    }
}
