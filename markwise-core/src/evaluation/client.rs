//! Thin wrapper binding a provider to a model id.

use std::sync::Arc;

use markwise_models::providers::{ChatRequest, Message, ModelProvider, ResponseFormat};
use markwise_models::{Result, Validate, parse_structured};
use serde::de::DeserializeOwned;
use tracing::debug;

/// A provider plus the model id every request should target.
#[derive(Clone)]
pub struct ModelClient {
    provider: Arc<dyn ModelProvider>,
    model: String,
}

impl ModelClient {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Free-text completion.
    pub async fn complete_text(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let request = ChatRequest::new(
            &self.model,
            vec![Message::system(system), Message::user(user)],
        )
        .temperature(temperature)
        .max_tokens(max_tokens);

        let response = self.provider.chat(request).await?;
        debug!(
            provider = self.provider.name(),
            output_tokens = response.usage.output_tokens,
            "Text completion received"
        );
        Ok(response.content)
    }

    /// Completion parsed and validated as `T`.
    pub async fn complete_structured<T>(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        format: ResponseFormat,
    ) -> Result<T>
    where
        T: DeserializeOwned + Validate,
    {
        let request = ChatRequest::new(
            &self.model,
            vec![Message::system(system), Message::user(user)],
        )
        .temperature(temperature)
        .response_format(format);

        let response = self.provider.chat(request).await?;
        parse_structured(&response.content)
    }
}

impl std::fmt::Debug for ModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClient")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .finish()
    }
}
