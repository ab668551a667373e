//! Listen patterns and the registry that owns them.

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use regex::Regex;
use uuid::Uuid;

use crate::base::{
    error::{ChatError, ChatResult},
    types::Void,
};

use super::{event::MessagePayload, response::Response};

// Traits.

/// A callback run when a pattern fires.
///
/// Any `Fn(Response) -> impl Future<Output = Void>` closure is a handler, so
/// `async` closures and plain functions can be registered directly.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(&self, res: Response) -> Void;
}

#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Void> + Send + 'static,
{
    async fn handle(&self, res: Response) -> Void {
        (self)(res).await
    }
}

/// Anything that can become a matcher: pattern source strings or compiled regexes.
pub trait IntoMatcher {
    fn into_matcher(self) -> ChatResult<Regex>;
}

impl IntoMatcher for Regex {
    fn into_matcher(self) -> ChatResult<Regex> {
        Ok(self)
    }
}

impl IntoMatcher for &Regex {
    fn into_matcher(self) -> ChatResult<Regex> {
        Ok(self.clone())
    }
}

impl IntoMatcher for &str {
    fn into_matcher(self) -> ChatResult<Regex> {
        Ok(Regex::new(self)?)
    }
}

impl IntoMatcher for String {
    fn into_matcher(self) -> ChatResult<Regex> {
        self.as_str().into_matcher()
    }
}

// Structs.

/// A registered matcher and the handler it triggers.
#[derive(Clone)]
pub struct Pattern {
    matcher: Regex,
    handler: Arc<dyn Handler>,
    requires_mention: bool,
}

impl std::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pattern")
            .field("matcher", &self.matcher.as_str())
            .field("requires_mention", &self.requires_mention)
            .finish()
    }
}

impl Pattern {
    pub fn new(matcher: Regex, handler: Arc<dyn Handler>, requires_mention: bool) -> Self {
        Self {
            matcher,
            handler,
            requires_mention,
        }
    }

    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    pub fn requires_mention(&self) -> bool {
        self.requires_mention
    }

    /// Substring match against the raw message text.
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    /// Whether this pattern may run for `message`.
    ///
    /// Messages from bots never run anything. Mention-gated patterns also need
    /// a `user` embed pointing at the bot user.
    pub fn can_execute(&self, message: &MessagePayload, bot_user_id: Uuid) -> bool {
        if message.user.bot {
            return false;
        }

        if self.requires_mention {
            return message.mentions_user(bot_user_id);
        }

        true
    }
}

/// Registered patterns, kept in registration order.
///
/// Read-only once the client starts serving; see `BotClient::into_dispatcher`.
#[derive(Clone, Debug, Default)]
pub struct PatternRegistry {
    patterns: Vec<Pattern>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern, rejecting a matcher whose source text is already present.
    ///
    /// Equality is syntactic: `a+` and `aa*` are different matchers.
    pub fn register(&mut self, matcher: Regex, handler: Arc<dyn Handler>, requires_mention: bool) -> ChatResult<()> {
        if self.contains(matcher.as_str()) {
            return Err(ChatError::AlreadyRegistered(matcher.as_str().to_string()));
        }

        self.patterns.push(Pattern::new(matcher, handler, requires_mention));

        Ok(())
    }

    /// Remove the pattern with the given source text; returns whether one existed.
    pub fn unregister(&mut self, source: &str) -> bool {
        let before = self.patterns.len();
        self.patterns.retain(|p| p.matcher.as_str() != source);
        self.patterns.len() != before
    }

    pub fn contains(&self, source: &str) -> bool {
        self.patterns.iter().any(|p| p.matcher.as_str() == source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
