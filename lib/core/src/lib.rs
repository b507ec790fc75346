//! Core types shared by every classmate crate.
//!
//! This crate provides the identifiers used to key per-user state and the
//! `Result` alias the binary layer uses to carry rootcause reports.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ConversationSessionId, UserIdentity};
