mod google;

pub use google::GeminiProvider;

use async_trait::async_trait;

use crate::error::HealthError;
use crate::upload::ImagePayload;

/// One piece of a generation request
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    Image(ImagePayload),
}

impl From<&str> for ContentPart {
    fn from(text: &str) -> Self {
        ContentPart::Text(text.to_string())
    }
}

impl From<String> for ContentPart {
    fn from(text: String) -> Self {
        ContentPart::Text(text)
    }
}

impl From<ImagePayload> for ContentPart {
    fn from(image: ImagePayload) -> Self {
        ContentPart::Image(image)
    }
}

/// A hosted model that turns content parts into a text completion
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;

    /// Model identifier requests are sent to
    fn model(&self) -> &str;

    /// Send one request and return the completion text
    async fn generate(&self, parts: &[ContentPart]) -> Result<String, HealthError>;
}
