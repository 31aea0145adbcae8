//! Configuration and settings management
//!
//! Loads credentials from environment variables and defines the upload
//! endpoint constants.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// ImgBB upload endpoint. Stable, so not configurable.
pub const IMGBB_UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";

/// Client-side timeout covering connect plus response for one upload
/// attempt.
pub const UPLOAD_TIMEOUT_SECS: u64 = 30;

/// Application settings loaded from environment variables.
///
/// Both credentials are required; a missing one fails `Settings::new`
/// and the process must not start the event loop.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token (`BOT_TOKEN`)
    pub bot_token: String,
    /// ImgBB API key (`IMGBB_API_KEY`)
    pub imgbb_api_key: String,
}

impl Settings {
    /// Create new settings by loading from the environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `BOT_TOKEN` or `IMGBB_API_KEY` is
    /// absent or empty.
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Environment::default() auto-converts UPPER_SNAKE_CASE to
            // snake_case; ignore_empty treats empty env vars as unset.
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    // Single test fn: env mutation races between parallel tests otherwise.
    #[test]
    fn test_settings_env_loading() {
        env::set_var("BOT_TOKEN", "123456:dummy");
        env::set_var("IMGBB_API_KEY", "dummy-key");

        let settings = Settings::new().expect("both credentials set");
        assert_eq!(settings.bot_token, "123456:dummy");
        assert_eq!(settings.imgbb_api_key, "dummy-key");

        // A missing credential must fail loading outright.
        env::remove_var("IMGBB_API_KEY");
        assert!(Settings::new().is_err());

        // Empty counts as unset.
        env::set_var("IMGBB_API_KEY", "");
        assert!(Settings::new().is_err());

        env::remove_var("BOT_TOKEN");
        env::remove_var("IMGBB_API_KEY");
    }
}
