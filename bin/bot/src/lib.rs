//! Classmate bot: weekly class schedules over Telegram.
//!
//! - **Service**: command dispatching and schedule views, transport-agnostic
//! - **Telegram**: teloxide handlers rendering service replies
//! - **Redirect**: the auth redirect HTTP listener
//! - **Config**: file and environment configuration

pub mod commands;
pub mod config;
pub mod error;
pub mod redirect;
pub mod service;
pub mod telegram;
pub mod texts;
pub mod user;
