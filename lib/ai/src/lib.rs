//! Language-model access for classmate.
//!
//! - **Backend**: provider-neutral request/response types and the
//!   [`LlmBackend`] trait
//! - **OpenAI**: a backend for any OpenAI-compatible chat completions API
//! - **Assistant**: the study helper behind the `/ask` command

pub mod assistant;
pub mod backend;
pub mod error;
pub mod openai;

pub use assistant::{DEFAULT_SYSTEM_PROMPT, StudyAssistant};
pub use backend::{LlmBackend, LlmBackendConfig, LlmMessage, LlmRequest, LlmResponse, MessageRole, TokenUsage};
pub use error::LlmError;
pub use openai::OpenAiBackend;
