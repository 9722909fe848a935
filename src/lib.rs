//! Telegram Menu Navigation Library
//!
//! Building blocks for Telegram bots that drive inline keyboard menus
//! without server-side session state.
//!
//! This crate provides the core functionality for:
//! - Encoding a user's menu position and data into callback payloads
//! - Deriving back rows and pagination controls from a decoded position
//! - Calling the Bot API methods a menu bot needs, rate limited
//! - Moderating group chats the bot administers

pub mod api;
pub mod config;
pub mod format;
pub mod nav;
