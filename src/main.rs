use std::process::exit;
use std::sync::Arc;

use dotenvy::dotenv;
use imgbb_relay::bot::handlers;
use imgbb_relay::bot::router::{self, Route};
use imgbb_relay::bot::session::SessionStore;
use imgbb_relay::config::{Settings, IMGBB_UPLOAD_URL};
use imgbb_relay::imgbb::ImgbbClient;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Load .env file
    dotenv().ok();
    init_logging();

    info!("Starting ImgBB relay bot...");

    let settings = init_settings();

    let uploader = Arc::new(ImgbbClient::new(
        settings.imgbb_api_key.clone(),
        IMGBB_UPLOAD_URL.to_string(),
    ));
    let sessions = Arc::new(SessionStore::new());
    let bot = Bot::new(settings.bot_token.clone());

    info!("Bot is running...");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![uploader, sessions])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped.");
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Loads settings or aborts: missing credentials are a hard stop before
/// the event loop ever starts.
fn init_settings() -> Settings {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            exit(1);
        }
    }
}

/// The routing tree. Branch order is the priority order: the moderation
/// catch-all sits last, so a recognized message can never also be
/// deleted by it.
fn schema() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::filter(|msg: Message| router::route_of(&msg) == Route::Greeting)
                .endpoint(greeting_endpoint),
        )
        .branch(
            dptree::filter(|msg: Message| router::route_of(&msg) == Route::Upload)
                .endpoint(upload_endpoint),
        )
        .branch(dptree::endpoint(moderation_endpoint))
}

async fn greeting_endpoint(
    bot: Bot,
    msg: Message,
    sessions: Arc<SessionStore>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::greet(bot, msg, sessions).await {
        error!("Greeting handler error: {}", e);
    }
    respond(())
}

async fn upload_endpoint(
    bot: Bot,
    msg: Message,
    uploader: Arc<ImgbbClient>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::handle_photo(bot, msg, uploader).await {
        error!("Photo handler error: {}", e);
    }
    respond(())
}

async fn moderation_endpoint(bot: Bot, msg: Message) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::moderate(bot, msg).await {
        error!("Moderation handler error: {}", e);
    }
    respond(())
}
