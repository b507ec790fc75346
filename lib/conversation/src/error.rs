//! Error types for the conversation crate.

use classmate_core::UserIdentity;
use std::fmt;

/// Errors from advancing a schedule-entry conversation.
///
/// Malformed input is not an error here: it produces a re-prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    /// The user has no open schedule-entry session.
    NoSession { user: UserIdentity },
    /// The finished draft could not be written to the schedule store.
    /// The session is kept so the user can answer again or cancel.
    CommitFailed { user: UserIdentity, reason: String },
}

impl fmt::Display for ConversationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSession { user } => write!(f, "no schedule entry in progress for {user}"),
            Self::CommitFailed { user, reason } => {
                write!(f, "failed to save schedule for {user}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConversationError {}
