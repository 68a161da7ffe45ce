pub mod fallback;
pub mod gemini;
pub mod json;
pub mod prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    GoogleAi,
}

/// A generative text endpoint: one prompt in, one free-form reply out.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    fn provider(&self) -> Provider;

    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
