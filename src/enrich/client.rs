//! Text generation client trait
//!
//! A unified seam over text generation backends so enrichment works the same
//! against a live Ollama server and against scripted output in tests.

use async_trait::async_trait;

use super::error::EnrichResult;

/// Trait for text generation backends
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the given prompt
    async fn complete(&self, prompt: &str) -> EnrichResult<String>;

    /// Get the model name being used
    fn model_name(&self) -> &str;

    /// Get the maximum context size in tokens
    fn max_tokens(&self) -> usize;

    /// Check if the backend is ready and connected
    async fn is_ready(&self) -> bool;
}

/// A scripted generator for tests: answers are popped in order, and every
/// received prompt is recorded for assertions.
#[cfg(test)]
pub struct MockTextGenerator {
    script: std::sync::Mutex<std::collections::VecDeque<ScriptedAnswer>>,
    prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
pub enum ScriptedAnswer {
    Text(String),
    Fail,
}

#[cfg(test)]
impl MockTextGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self::scripted(vec![ScriptedAnswer::Text(response.into())])
    }

    pub fn scripted(answers: Vec<ScriptedAnswer>) -> Self {
        Self {
            script: std::sync::Mutex::new(answers.into()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self::scripted(Vec::new())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn complete(&self, prompt: &str) -> EnrichResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.script.lock().unwrap().pop_front() {
            Some(ScriptedAnswer::Text(text)) => Ok(text),
            Some(ScriptedAnswer::Fail) | None => Err(
                super::error::EnrichError::ConnectionError("scripted failure".to_string()),
            ),
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }

    fn max_tokens(&self) -> usize {
        4096
    }

    async fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_answers_pop_in_order() {
        let client = MockTextGenerator::scripted(vec![
            ScriptedAnswer::Fail,
            ScriptedAnswer::Text("second".to_string()),
        ]);

        assert!(client.complete("one").await.is_err());
        assert_eq!(client.complete("two").await.unwrap(), "second");
        assert!(client.complete("three").await.is_err());
        assert_eq!(client.prompts(), vec!["one", "two", "three"]);
    }
}
