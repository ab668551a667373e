//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;
use uuid::Uuid;

use super::types::Res;

/// Default traQ API base URL.
fn default_api_base_url() -> String {
    "https://q.trap.jp/api/v3".to_string()
}

/// Default webhook listen port.
fn default_port() -> u16 {
    80
}

/// Posted messages expand embeds by default.
fn default_embed() -> bool {
    true
}

/// Default number of recently seen message ids kept for deduplication.
fn default_dedupe_capacity() -> usize {
    1024
}

/// Configuration for the bot client.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Bot id (`BOT_ID`).
    pub bot_id: Uuid,
    /// User id of the bot account, used to detect mentions (`BOT_USER_ID`).
    pub bot_user_id: Uuid,
    /// Bot access token for the REST API (`ACCESS_TOKEN`).
    pub access_token: String,
    /// Token traQ sends in `X-TRAQ-BOT-TOKEN` with every webhook (`VERIFICATION_TOKEN`).
    pub verification_token: String,
    /// REST API base URL (`API_BASE_URL`).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Webhook listen port (`PORT`).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whether posted messages request embed expansion (`EMBED`).
    #[serde(default = "default_embed")]
    pub embed: bool,
    /// How many recent message ids to remember for dropping redelivered webhooks (`DEDUPE_CAPACITY`).
    /// Zero disables deduplication.
    #[serde(default = "default_dedupe_capacity")]
    pub dedupe_capacity: usize,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            bot_id: Uuid::nil(),
            bot_user_id: Uuid::nil(),
            access_token: String::new(),
            verification_token: String::new(),
            api_base_url: default_api_base_url(),
            port: default_port(),
            embed: default_embed(),
            dedupe_capacity: default_dedupe_capacity(),
        }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("TRAQ_CHAT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        Self::from_builder(cfg)
    }

    /// Build and validate from an already populated builder.
    pub fn from_builder(cfg: config::ConfigBuilder<config::builder::DefaultState>) -> Res<Self> {
        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    pub fn validate(&self) -> Res<()> {
        if self.access_token.is_empty() {
            return Err(anyhow::anyhow!("Access token must not be empty."));
        }

        if self.verification_token.is_empty() {
            return Err(anyhow::anyhow!("Verification token must not be empty."));
        }

        if self.bot_user_id.is_nil() {
            return Err(anyhow::anyhow!("Bot user id must be set, or mentions can never match."));
        }

        if self.api_base_url.is_empty() {
            return Err(anyhow::anyhow!("API base URL must not be empty."));
        }

        Ok(())
    }
}
