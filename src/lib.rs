#![deny(missing_docs)]
//! Telegram to ImgBB relay bot
//!
//! Receives photo messages over long polling, mirrors the image bytes to
//! the ImgBB upload API and replies with the direct link. A `/start`
//! command greets a chat once per process run; every other message is
//! deleted best-effort.

/// Telegram bot: routing, session state and handlers
pub mod bot;
/// Configuration management
pub mod config;
/// ImgBB upload client
pub mod imgbb;
