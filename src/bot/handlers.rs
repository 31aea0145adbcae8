//! Greeting, upload and moderation handlers
//!
//! Each handler performs exactly one terminal action per message:
//! either a reply or a delete attempt. Errors bubble up as `anyhow`
//! and are logged by the endpoint wrappers in `main.rs`; nothing here
//! may crash the dispatch loop.

use crate::bot::session::SessionStore;
use crate::imgbb::{ImgbbClient, UploadError};
use anyhow::Result;
use std::sync::Arc;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{LinkPreviewOptions, MessageId, ParseMode, ReplyParameters};
use tracing::{info, warn};

/// Fixed greeting, sent at most once per chat per process lifetime.
const GREETING_TEXT: &str = "This bot was made by\nt.me/ixeuc";
/// Shown when the image host is unreachable. Transport detail stays in
/// the logs.
const CONNECT_ERROR_TEXT: &str = "An error occurred while connecting to the image host.";
/// Shown for failures that are neither transport nor an explicit API
/// rejection.
const PROCESSING_ERROR_TEXT: &str = "An unexpected error occurred during processing.";

/// Greeting route: send the attribution text once per chat, then delete
/// the triggering command message.
///
/// # Errors
///
/// Fails only when the greeting send itself fails; deletion failures
/// are swallowed with a warning.
pub async fn greet(bot: Bot, msg: Message, sessions: Arc<SessionStore>) -> Result<()> {
    let chat_id = msg.chat.id;

    // Check, send, mark - in that order. Two near-simultaneous /start
    // from the same chat can race into one duplicate greeting; accepted,
    // the flag itself never reverts.
    if !sessions.is_greeted(chat_id).await {
        bot.send_message(chat_id, GREETING_TEXT)
            .link_preview_options(disabled_link_preview())
            .await?;
        sessions.mark_greeted(chat_id).await;
        info!(chat_id = chat_id.0, "greeted chat");
    }

    delete_best_effort(&bot, chat_id, msg.id, "start command").await;
    Ok(())
}

/// Upload route: download the best photo variant, push it to ImgBB and
/// reply with the outcome. The photo message is never deleted.
///
/// # Errors
///
/// Fails when the Telegram download or the reply send fails. Upload
/// failures do not error out; they become user-facing reply text.
pub async fn handle_photo(bot: Bot, msg: Message, uploader: Arc<ImgbbClient>) -> Result<()> {
    let Some(sizes) = msg.photo() else {
        // The router only sends photo messages here.
        return Ok(());
    };
    // Telegram usually orders variants ascending, but select by actual
    // resolution rather than trusting list position.
    let Some(best) = sizes
        .iter()
        .max_by_key(|p| u64::from(p.width) * u64::from(p.height))
    else {
        return Ok(());
    };

    let file = bot.get_file(best.file.id.clone()).await?;
    let mut image = Vec::new();
    bot.download_file(&file.path, &mut image).await?;
    info!(
        chat_id = msg.chat.id.0,
        bytes = image.len(),
        width = best.width,
        height = best.height,
        "downloaded photo from Telegram"
    );

    let reply = match uploader.upload(image).await {
        // Bold success line, then the URL in a <pre> block so clients
        // show it verbatim without auto-linking or reflow.
        Ok(uploaded) => format!(
            "<b>Uploaded Successfully!</b>\n<pre>{}</pre>",
            html_escape::encode_text(&uploaded.url)
        ),
        Err(UploadError::Api(reason)) => {
            format!("Upload failed: {}", html_escape::encode_text(&reason))
        }
        Err(UploadError::Network(_)) => CONNECT_ERROR_TEXT.to_string(),
        Err(UploadError::Unexpected(_)) => PROCESSING_ERROR_TEXT.to_string(),
    };

    bot.send_message(msg.chat.id, reply)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

/// Moderation route: delete anything that is neither a photo nor the
/// start command. Best effort only.
///
/// # Errors
///
/// Never fails; deletion errors are logged and ignored.
pub async fn moderate(bot: Bot, msg: Message) -> Result<()> {
    delete_best_effort(&bot, msg.chat.id, msg.id, "unwanted").await;
    Ok(())
}

/// Deletion may legitimately fail, e.g. when the bot lacks admin rights
/// in a group. That is a log line, never a user-visible error.
async fn delete_best_effort(bot: &Bot, chat: ChatId, message: MessageId, what: &str) {
    if let Err(e) = bot.delete_message(chat, message).await {
        warn!(
            chat_id = chat.0,
            message_id = message.0,
            error = %e,
            "could not delete {what} message"
        );
    }
}

fn disabled_link_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}
