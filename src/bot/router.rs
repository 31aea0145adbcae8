//! Inbound message classification
//!
//! Every message takes exactly one of three terminal routes. The order
//! of the checks is the priority order; the moderation catch-all only
//! fires when neither specific route matched.

use teloxide::types::Message;

/// Token that selects the greeting route.
pub const START_COMMAND: &str = "/start";

/// Terminal route for one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/start` command: greet once, then delete the command message.
    Greeting,
    /// Photo attachment: upload to ImgBB and reply with the link.
    Upload,
    /// Everything else: best-effort delete.
    Moderation,
}

/// Classifies by text and photo presence, in priority order: start
/// command first, then photo, then the catch-all.
#[must_use]
pub fn classify(text: Option<&str>, has_photo: bool) -> Route {
    if text.is_some_and(|t| t.starts_with(START_COMMAND)) {
        Route::Greeting
    } else if has_photo {
        Route::Upload
    } else {
        Route::Moderation
    }
}

/// Routes a Telegram message. Photo captions arrive in `caption`, not
/// `text`, so a photo captioned `/start` still takes the upload route.
#[must_use]
pub fn route_of(msg: &Message) -> Route {
    classify(msg.text(), msg.photo().is_some())
}
