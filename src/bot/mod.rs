/// Greeting, upload and moderation handlers
pub mod handlers;
/// Inbound message classification
pub mod router;
/// Per-chat ephemeral session state
pub mod session;
