//! Study assistant: free-form questions answered by a language model.

use crate::backend::{LlmBackend, LlmRequest};
use crate::error::LlmError;
use std::sync::Arc;

/// System prompt used unless configured otherwise.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "Ты помощник для студентов. Отвечай кратко и по делу.";

/// Answers student questions through an [`LlmBackend`].
#[derive(Clone)]
pub struct StudyAssistant {
    backend: Arc<dyn LlmBackend>,
    system_prompt: String,
}

impl StudyAssistant {
    /// Creates an assistant with the default system prompt.
    #[must_use]
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            backend,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Overrides the system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Asks one question and returns the answer text.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::EmptyPrompt`] for a blank question, otherwise
    /// whatever the backend reports.
    #[tracing::instrument(skip_all, fields(model = %self.backend.model()))]
    pub async fn ask(&self, question: &str) -> Result<String, LlmError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(LlmError::EmptyPrompt);
        }

        let request = LlmRequest::new(question).with_system(&self.system_prompt);
        let response = self.backend.generate(&request).await?;
        tracing::debug!(tokens = response.usage.total(), "Question answered");
        Ok(response.content)
    }
}
