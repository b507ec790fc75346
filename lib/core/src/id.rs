//! Identifier types.
//!
//! Chat participants are keyed by the integer identity the chat platform
//! assigns them. Conversation sessions get a ULID so log lines from one
//! schedule-entry conversation can be correlated.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Identity of a chat participant.
///
/// Opaque to the core: it is only ever compared, hashed and logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentity(i64);

impl UserIdentity {
    /// Wraps a raw platform user id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// Unique identifier for a schedule-entry conversation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationSessionId(Ulid);

impl ConversationSessionId {
    const PREFIX: &'static str = "sess";

    /// Creates a new ID with a randomly generated ULID.
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ConversationSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConversationSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", Self::PREFIX, self.0)
    }
}
