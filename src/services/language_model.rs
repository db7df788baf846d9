use async_trait::async_trait;

use crate::error::AppResult;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Model identifier, used to key cached completions.
    fn model(&self) -> &str;

    async fn complete(&self, prompt: &str) -> AppResult<String>;
}
