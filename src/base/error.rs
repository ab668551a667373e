//! Typed errors surfaced by the bot library.

use thiserror::Error;

use crate::service::api::ApiError;

/// Errors returned by registration, the response context, and the client lifecycle.
///
/// `StartupFetch` and `ListenerStart` are fatal: the bot cannot operate without
/// its stamp table or its webhook listener, so the binary exits on them.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A matcher with the same source text is already registered.
    #[error("pattern `{0}` is already registered")]
    AlreadyRegistered(String),

    /// A string matcher did not compile.
    #[error("invalid pattern")]
    InvalidPattern(#[from] regex::Error),

    #[error("failed to send a message")]
    Send(#[source] ApiError),

    #[error("failed to reply a message")]
    Reply(#[source] ApiError),

    /// The stamp name is not in the prefetched table.
    #[error("stamp \"{0}\" not found")]
    StampNotFound(String),

    #[error("failed to add a stamp")]
    Stamp(#[source] ApiError),

    #[error("failed to fetch stamps at startup")]
    StartupFetch(#[source] ApiError),

    #[error("failed to start the webhook listener")]
    ListenerStart(#[source] std::io::Error),
}

impl ChatError {
    /// Outbound failures the response context already wrote to the diagnostic sink.
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Send(_) | Self::Reply(_) | Self::Stamp(_))
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
