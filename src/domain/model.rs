use crate::error::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    /// Raw text as the model produced it. Empty when the model returned nothing.
    pub text: String,
    pub model: Option<String>,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str, grounding: bool) -> Result<ModelResponse>;
}
