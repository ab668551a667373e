pub mod traq;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Types.

/// Failure of a single REST call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// A message as returned by `POST /channels/{channelId}/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub channel_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub stamps: Vec<MessageStamp>,
    #[serde(default)]
    pub thread_id: Option<String>,
}

/// A stamp attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStamp {
    pub user_id: String,
    pub stamp_id: String,
    pub count: u32,
}

/// The fields of `GET /stamps` entries the bot needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub id: String,
    pub name: String,
}

// Traits.

/// Generic REST client trait that platform clients must implement.
///
/// The dispatch core only ever talks to the platform through this trait,
/// which keeps it testable without a network.
#[async_trait]
pub trait GenericApiClient: Send + Sync + 'static {
    /// Post `content` to a channel.
    ///
    /// `embed` asks the platform to expand mentions and links in the content.
    async fn post_message(&self, channel_id: &str, content: &str, embed: bool) -> ApiResult<Message>;

    /// Attach a stamp to a message.
    async fn add_message_stamp(&self, message_id: &str, stamp_id: &str) -> ApiResult<()>;

    /// List every stamp visible to the bot.
    async fn get_stamps(&self) -> ApiResult<Vec<Stamp>>;
}

// Structs.

/// REST client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<dyn GenericApiClient>,
}

impl Deref for ApiClient {
    type Target = dyn GenericApiClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ApiClient {
    pub fn new(inner: Arc<dyn GenericApiClient>) -> Self {
        Self { inner }
    }
}
