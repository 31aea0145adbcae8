//! End-to-end handler scenarios against a mock Telegram API.
//!
//! The mock server plays the Bot API (method paths are matched
//! case-insensitively, as Telegram itself treats them); inbound
//! messages are built from Bot API wire JSON.

use std::sync::Arc;

use imgbb_relay::bot::handlers;
use imgbb_relay::bot::session::SessionStore;
use imgbb_relay::imgbb::ImgbbClient;
use serde_json::json;
use teloxide::types::Message;
use teloxide::Bot;
use wiremock::matchers::{body_string_contains, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_ID: i64 = 123_456;

fn bot_for(server: &MockServer) -> Bot {
    Bot::new("123456:TESTTOKEN").set_api_url(server.uri().parse().expect("mock server uri"))
}

fn inbound_text_message(message_id: i32, text: &str) -> Message {
    serde_json::from_value(json!({
        "message_id": message_id,
        "date": 1_700_000_000,
        "chat": { "id": CHAT_ID, "type": "private", "first_name": "Tester" },
        "from": { "id": 111, "is_bot": false, "first_name": "Tester" },
        "text": text,
        "entities": []
    }))
    .expect("valid inbound text message")
}

fn inbound_photo_message(message_id: i32) -> Message {
    // Variants deliberately out of ascending order: selection must go by
    // resolution, not by list position.
    serde_json::from_value(json!({
        "message_id": message_id,
        "date": 1_700_000_000,
        "chat": { "id": CHAT_ID, "type": "private", "first_name": "Tester" },
        "from": { "id": 111, "is_bot": false, "first_name": "Tester" },
        "photo": [
            {
                "file_id": "file_big",
                "file_unique_id": "u_big",
                "width": 800,
                "height": 800,
                "file_size": 4096
            },
            {
                "file_id": "file_small",
                "file_unique_id": "u_small",
                "width": 90,
                "height": 90,
                "file_size": 64
            }
        ]
    }))
    .expect("valid inbound photo message")
}

fn sent_message_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "ok": true,
        "result": {
            "message_id": 999,
            "date": 1_700_000_001,
            "chat": { "id": CHAT_ID, "type": "private", "first_name": "Tester" },
            "text": "ok",
            "entities": []
        }
    }))
}

fn deleted_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true }))
}

#[tokio::test]
async fn start_command_greets_once_then_only_deletes() {
    let telegram = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"(?i)/bot[^/]+/sendmessage$"))
        .and(body_string_contains("This bot was made by"))
        .respond_with(sent_message_response())
        .expect(1)
        .mount(&telegram)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"(?i)/bot[^/]+/deletemessage$"))
        .respond_with(deleted_response())
        .expect(2)
        .mount(&telegram)
        .await;

    let bot = bot_for(&telegram);
    let sessions = Arc::new(SessionStore::new());

    handlers::greet(bot.clone(), inbound_text_message(1, "/start"), sessions.clone())
        .await
        .expect("first /start");
    handlers::greet(bot, inbound_text_message(2, "/start"), sessions.clone())
        .await
        .expect("second /start");

    assert!(sessions.is_greeted(teloxide::types::ChatId(CHAT_ID)).await);
}

#[tokio::test]
async fn photo_upload_replies_with_link_and_never_deletes() {
    let telegram = MockServer::start().await;
    let imgbb = MockServer::start().await;

    // getFile must be asked for the highest-resolution variant.
    Mock::given(method("POST"))
        .and(path_regex(r"(?i)/bot[^/]+/getfile$"))
        .and(body_string_contains("file_big"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {
                "file_id": "file_big",
                "file_unique_id": "u_big",
                "file_size": 4096,
                "file_path": "photos/file_big.jpg"
            }
        })))
        .expect(1)
        .mount(&telegram)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"(?i)/file/bot[^/]+/photos/file_big\.jpg$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"raw jpeg bytes".to_vec()))
        .expect(1)
        .mount(&telegram)
        .await;

    Mock::given(method("POST"))
        .and(path("/1/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "url": "https://i.ibb.co/abc/image.jpg" }
        })))
        .expect(1)
        .mount(&imgbb)
        .await;

    // Reply must quote the photo message and carry the bold line plus
    // the verbatim <pre> link block.
    Mock::given(method("POST"))
        .and(path_regex(r"(?i)/bot[^/]+/sendmessage$"))
        .and(body_string_contains("Uploaded Successfully!"))
        .and(body_string_contains("<pre>https://i.ibb.co/abc/image.jpg</pre>"))
        .respond_with(sent_message_response())
        .expect(1)
        .mount(&telegram)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"(?i)/bot[^/]+/deletemessage$"))
        .respond_with(deleted_response())
        .expect(0)
        .mount(&telegram)
        .await;

    let bot = bot_for(&telegram);
    let uploader = Arc::new(ImgbbClient::new(
        "test-key".to_string(),
        format!("{}/1/upload", imgbb.uri()),
    ));

    handlers::handle_photo(bot, inbound_photo_message(7), uploader)
        .await
        .expect("photo handled");
}

#[tokio::test]
async fn moderation_deletes_exactly_once() {
    let telegram = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"(?i)/bot[^/]+/deletemessage$"))
        .respond_with(deleted_response())
        .expect(1)
        .mount(&telegram)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"(?i)/bot[^/]+/sendmessage$"))
        .respond_with(sent_message_response())
        .expect(0)
        .mount(&telegram)
        .await;

    handlers::moderate(bot_for(&telegram), inbound_text_message(3, "spam text"))
        .await
        .expect("moderation never fails");
}

#[tokio::test]
async fn moderation_survives_denied_deletion() {
    let telegram = MockServer::start().await;

    // Bot lacks delete rights: Telegram answers 400. The handler logs
    // and carries on.
    Mock::given(method("POST"))
        .and(path_regex(r"(?i)/bot[^/]+/deletemessage$"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: message can't be deleted"
        })))
        .expect(1)
        .mount(&telegram)
        .await;

    handlers::moderate(bot_for(&telegram), inbound_text_message(4, "spam"))
        .await
        .expect("deletion failure is swallowed");
}
