//! Library root for `traq-chat`.
//!
//! traq-chat is a small hubot-style framework for traQ bots:
//! - Register regular expressions with `listen` (any message) or `respond` (messages mentioning the bot)
//! - Handlers receive a `Response` that can `send`, `reply`, or `add_stamp`
//! - Handler failures are written to a pluggable diagnostic sink and never stop dispatch
//!
//! The bot receives events over traQ's HTTP webhook and talks back through the
//! REST API. The REST side sits behind a trait so it can be swapped out in tests.

pub mod base;
pub mod interaction;
pub mod prelude;
pub mod runtime;
pub mod service;

use base::types::Void;
use runtime::BotClient;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Serves the given client on its configured port until shutdown.
pub async fn start(client: BotClient) -> Void {
    info!("Starting traq-chat on port {} ...", client.config.port);

    client.start().await?;

    Ok(())
}
