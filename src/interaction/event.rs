//! Webhook payloads read by the dispatch core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of a `MESSAGE_CREATED` webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCreatedPayload {
    pub event_time: DateTime<Utc>,
    pub message: MessagePayload,
}

/// The message carried by a webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub id: String,
    pub user: UserPayload,
    pub channel_id: String,
    /// Raw text, with mentions in their embedded `!{...}` form.
    pub text: String,
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub embedded: Vec<EmbeddedInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub icon_id: String,
    #[serde(default)]
    pub bot: bool,
}

/// An entity embedded in message text (user mention, channel link, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedInfo {
    #[serde(default)]
    pub raw: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl EmbeddedInfo {
    /// Whether this entry is a mention of the given user.
    pub fn mentions_user(&self, user_id: Uuid) -> bool {
        self.kind == "user" && Uuid::parse_str(&self.id).is_ok_and(|id| id == user_id)
    }
}

impl MessagePayload {
    /// Whether any embedded entry mentions the given user.
    pub fn mentions_user(&self, user_id: Uuid) -> bool {
        self.embedded.iter().any(|e| e.mentions_user(user_id))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const BOT: &str = "dfdff0c9-5de0-46ee-9721-2525e8bb3d45";

    fn sample() -> serde_json::Value {
        json!({
            "eventTime": "2019-05-08T13:33:51.690308239Z",
            "message": {
                "id": "bc9106b3-f9b2-4eca-9ba1-72b39b40954e",
                "user": {
                    "id": "dfdff0c9-5de0-46ee-9721-2525e8bb3d45",
                    "name": "takashi_trap",
                    "displayName": "Takashi",
                    "iconId": "2bc06cda-bdb9-4a68-8000-62f907f36a92",
                    "bot": false
                },
                "channelId": "9aba50da-f605-4cd0-a428-5e4558cb911e",
                "text": "!{\"type\": \"user\", \"raw\": \"@bot\", \"id\": \"dfdff0c9-5de0-46ee-9721-2525e8bb3d45\"} hello",
                "plainText": "@bot hello",
                "embedded": [
                    { "raw": "@bot", "type": "user", "id": "DFDFF0C9-5DE0-46EE-9721-2525E8BB3D45" }
                ],
                "createdAt": "2019-05-08T13:33:51.632149265Z",
                "updatedAt": "2019-05-08T13:33:51.632149265Z"
            }
        })
    }

    #[test]
    fn decodes_platform_payload() {
        let payload: MessageCreatedPayload = serde_json::from_value(sample()).unwrap();

        assert_eq!(payload.message.user.name, "takashi_trap");
        assert_eq!(payload.message.user.display_name, "Takashi");
        assert_eq!(payload.message.plain_text, "@bot hello");
        assert_eq!(payload.message.embedded[0].kind, "user");
    }

    #[test]
    fn mention_compares_ids_as_uuids() {
        let payload: MessageCreatedPayload = serde_json::from_value(sample()).unwrap();

        assert!(payload.message.mentions_user(Uuid::parse_str(BOT).unwrap()));
        assert!(!payload.message.mentions_user(Uuid::nil()));
    }

    #[test]
    fn channel_embeds_are_not_mentions() {
        let info = EmbeddedInfo {
            raw: "#general".to_string(),
            kind: "channel".to_string(),
            id: BOT.to_string(),
        };

        assert!(!info.mentions_user(Uuid::parse_str(BOT).unwrap()));
    }

    #[test]
    fn missing_optional_fields_default() {
        let mut raw = sample();
        let message = raw["message"].as_object_mut().unwrap();
        message.remove("embedded");
        message.remove("plainText");
        message["user"].as_object_mut().unwrap().remove("bot");

        let payload: MessageCreatedPayload = serde_json::from_value(raw).unwrap();

        assert!(payload.message.embedded.is_empty());
        assert!(!payload.message.user.bot);
    }
}
