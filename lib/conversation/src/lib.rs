//! Schedule-entry conversations for classmate.
//!
//! This crate provides:
//!
//! - **Session**: per-user draft of a week being entered, and the step it is on
//! - **Prompts**: what to show the user after each step
//! - **Schedule Entry**: the keyed session table that advances sessions one
//!   message at a time and commits finished drafts to a schedule store

pub mod entry;
pub mod error;
pub mod prompt;
pub mod session;

pub use entry::ScheduleEntry;
pub use error::ConversationError;
pub use prompt::{OutboundPrompt, PromptKind};
pub use session::{ConversationSession, EntryStep, Transition};
