//! traQ REST API v3 integration.
//!
//! Covers the three calls the bot makes: posting messages, adding stamps,
//! and listing stamps for the startup name lookup table.

use std::{ops::Deref, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::base::{config::Config, types::Res};

use super::{ApiClient, ApiError, ApiResult, GenericApiClient, Message, Stamp};

// Extra methods on `ApiClient` applied by the traQ implementation.

impl ApiClient {
    /// Creates a new traQ REST client.
    pub fn traq(config: &Config) -> Res<Self> {
        let client = TraqApiClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

#[derive(Serialize)]
struct PostMessageRequest<'a> {
    content: &'a str,
    embed: bool,
}

/// traQ client implementation.
#[derive(Clone)]
struct TraqApiClient {
    base_url: String,
    access_token: String,
    client: Client,
}

impl Deref for TraqApiClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl TraqApiClient {
    #[instrument(name = "TraqApiClient::new", skip_all)]
    fn new(config: &Config) -> Res<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn non-2xx responses into `ApiError::Status`, keeping the body for diagnostics.
async fn check(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status { status: status.as_u16(), body })
}

#[async_trait]
impl GenericApiClient for TraqApiClient {
    #[instrument(skip(self, content))]
    async fn post_message(&self, channel_id: &str, content: &str, embed: bool) -> ApiResult<Message> {
        let response = self
            .post(self.url(&format!("/channels/{channel_id}/messages")))
            .bearer_auth(&self.access_token)
            .json(&PostMessageRequest { content, embed })
            .send()
            .await?;

        let message = check(response).await?.json::<Message>().await?;
        debug!(message_id = %message.id, "Posted message");

        Ok(message)
    }

    #[instrument(skip(self))]
    async fn add_message_stamp(&self, message_id: &str, stamp_id: &str) -> ApiResult<()> {
        let response = self
            .post(self.url(&format!("/messages/{message_id}/stamps/{stamp_id}")))
            .bearer_auth(&self.access_token)
            .json(&json!({ "count": 1 }))
            .send()
            .await?;

        check(response).await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_stamps(&self) -> ApiResult<Vec<Stamp>> {
        let response = self.get(self.url("/stamps")).bearer_auth(&self.access_token).send().await?;

        let stamps = check(response).await?.json::<Vec<Stamp>>().await?;
        debug!(count = stamps.len(), "Fetched stamps");

        Ok(stamps)
    }
}

#[cfg(test)]
mod tests {
    use crate::base::config::ConfigInner;

    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let config = Config::from(ConfigInner {
            api_base_url: "https://example.test/api/v3/".to_string(),
            ..Default::default()
        });

        let client = TraqApiClient::new(&config).unwrap();

        assert_eq!(client.url("/stamps"), "https://example.test/api/v3/stamps");
    }

    #[test]
    fn post_message_body_shape() {
        let body = serde_json::to_value(PostMessageRequest { content: "hi", embed: true }).unwrap();

        assert_eq!(body, json!({ "content": "hi", "embed": true }));
    }

    #[test]
    fn message_decodes_from_api_shape() {
        let raw = json!({
            "id": "m1",
            "userId": "u1",
            "channelId": "c1",
            "content": "pong!",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
            "pinned": false,
            "stamps": [{ "userId": "u2", "stampId": "s1", "count": 2, "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z" }],
            "threadId": null
        });

        let message: Message = serde_json::from_value(raw).unwrap();

        assert_eq!(message.channel_id, "c1");
        assert_eq!(message.stamps[0].count, 2);
        assert!(message.thread_id.is_none());
    }
}
