//! Error types for the bot binary.
//!
//! Library errors are mapped into [`BotError`] at the service boundary and
//! carried as `rootcause` reports from there on.

use std::fmt;

/// Errors surfaced by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotError {
    /// Configuration could not be loaded.
    Config { details: String },
    /// Reading or writing the schedule store failed.
    Store { details: String },
    /// The user registry failed.
    Users { details: String },
    /// The language model could not answer.
    Assistant { details: String },
    /// The auth redirect listener could not run.
    Redirect { addr: String, details: String },
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "configuration error: {details}"),
            Self::Store { details } => write!(f, "schedule store error: {details}"),
            Self::Users { details } => write!(f, "user registry error: {details}"),
            Self::Assistant { details } => write!(f, "assistant error: {details}"),
            Self::Redirect { addr, details } => {
                write!(f, "redirect listener on {addr} failed: {details}")
            }
        }
    }
}

impl std::error::Error for BotError {}
