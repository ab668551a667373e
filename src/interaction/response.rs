//! The value handed to every handler invocation.

use std::{ops::Deref, sync::Arc};

use tracing::{error, instrument};
use uuid::Uuid;

use crate::{
    base::{
        error::{ChatError, ChatResult},
        sink::DiagnosticSink,
    },
    service::api::{ApiClient, Message},
};

use super::{
    event::{MessageCreatedPayload, MessagePayload, UserPayload},
    stamps::StampTable,
};

/// Client state a response needs to talk back to the platform.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct BotContext {
    pub bot_user_id: Uuid,
    pub api: ApiClient,
    pub stamps: Arc<StampTable>,
    pub sink: DiagnosticSink,
    /// Embed flag sent with every posted message.
    pub embed: bool,
}

/// A triggering message plus the ways a handler can answer it.
///
/// Derefs to the webhook payload, so `res.message.user.name` reads naturally.
#[derive(Clone)]
pub struct Response {
    bot: BotContext,
    payload: Arc<MessageCreatedPayload>,
}

impl Deref for Response {
    type Target = MessageCreatedPayload;

    fn deref(&self) -> &Self::Target {
        &self.payload
    }
}

impl Response {
    pub fn new(bot: BotContext, payload: Arc<MessageCreatedPayload>) -> Self {
        Self { bot, payload }
    }

    pub fn payload(&self) -> &MessageCreatedPayload {
        &self.payload
    }

    pub fn message(&self) -> &MessagePayload {
        &self.payload.message
    }

    pub fn author(&self) -> &UserPayload {
        &self.payload.message.user
    }

    pub fn channel_id(&self) -> &str {
        &self.payload.message.channel_id
    }

    pub fn text(&self) -> &str {
        &self.payload.message.text
    }

    /// Post `content` verbatim to the channel the message came from.
    #[instrument(skip_all, fields(channel_id = %self.channel_id()))]
    pub async fn send(&self, content: &str) -> ChatResult<Message> {
        self.bot.api.post_message(self.channel_id(), content, self.bot.embed).await.map_err(|e| self.fail(ChatError::Send(e)))
    }

    /// Post `content` to the same channel, addressed to the author as `@name content`.
    #[instrument(skip_all, fields(channel_id = %self.channel_id()))]
    pub async fn reply(&self, content: &str) -> ChatResult<Message> {
        let content = reply_content(&self.author().name, content);

        self.bot.api.post_message(self.channel_id(), &content, self.bot.embed).await.map_err(|e| self.fail(ChatError::Reply(e)))
    }

    /// Put the named stamp on the triggering message.
    ///
    /// Unknown names fail with `StampNotFound` before any request is made.
    #[instrument(skip_all, fields(message_id = %self.message().id, stamp = %stamp_name))]
    pub async fn add_stamp(&self, stamp_name: &str) -> ChatResult<()> {
        let Some(stamp_id) = self.bot.stamps.id_of(stamp_name) else {
            return Err(ChatError::StampNotFound(stamp_name.to_string()));
        };

        self.bot.api.add_message_stamp(&self.message().id, stamp_id).await.map_err(|e| self.fail(ChatError::Stamp(e)))
    }

    /// Report an outbound failure, then hand it back to the caller.
    ///
    /// The dispatcher skips errors for which [`ChatError::is_reported`] holds, so
    /// a handler propagating this with `?` still yields a single sink line.
    fn fail(&self, err: ChatError) -> ChatError {
        error!(error = ?err, "{}", err);
        self.bot.sink.report_error(&err);
        err
    }
}

/// `@name content`, the form traQ renders as a mention of `name`.
pub fn reply_content(name: &str, content: &str) -> String {
    format!("@{name} {content}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_prefixes_mention() {
        assert_eq!(reply_content("alice", "pong"), "@alice pong");
    }
}
