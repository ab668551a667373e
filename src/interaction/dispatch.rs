//! Routes each inbound message to every pattern that should see it.

use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use tracing::{debug, error, instrument, warn, Instrument};

use crate::base::error::ChatError;

use super::{
    delivery::DeliveryLog,
    event::MessageCreatedPayload,
    pattern::{Pattern, PatternRegistry},
    response::{BotContext, Response},
};

/// Shared, read-only dispatch state; clones are cheap and safe to use from
/// concurrent request handlers.
#[derive(Clone)]
pub struct EventDispatcher {
    registry: Arc<PatternRegistry>,
    bot: BotContext,
    deliveries: Arc<DeliveryLog>,
}

impl EventDispatcher {
    pub fn new(registry: PatternRegistry, bot: BotContext, deliveries: DeliveryLog) -> Self {
        Self {
            registry: Arc::new(registry),
            bot,
            deliveries: Arc::new(deliveries),
        }
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Run every matching, eligible handler for one message, in registration order.
    ///
    /// Handler failures and panics are reported to the diagnostic sink and never
    /// stop the remaining handlers. Returns how many handlers were invoked.
    #[instrument(skip_all, fields(message_id = %payload.message.id, channel_id = %payload.message.channel_id))]
    pub async fn dispatch(&self, payload: MessageCreatedPayload) -> usize {
        if !self.deliveries.first_seen(&payload.message.id) {
            warn!("Skipping redelivered message.");
            return 0;
        }

        let payload = Arc::new(payload);
        let mut invoked = 0;

        for pattern in self.registry.iter() {
            if !pattern.matches(&payload.message.text) || !pattern.can_execute(&payload.message, self.bot.bot_user_id) {
                continue;
            }

            debug!(pattern = %pattern.matcher().as_str(), "Pattern matched");

            let response = Response::new(self.bot.clone(), payload.clone());
            self.invoke(pattern, response).in_current_span().await;
            invoked += 1;
        }

        invoked
    }

    async fn invoke(&self, pattern: &Pattern, response: Response) {
        let outcome = AssertUnwindSafe(pattern.handler().handle(response)).catch_unwind().await;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(pattern = %pattern.matcher().as_str(), "Error while handling: {:#}", err);

                if !err.downcast_ref::<ChatError>().is_some_and(ChatError::is_reported) {
                    self.bot.sink.report(format_args!("{err:#}"));
                }
            }
            Err(panic) => {
                let reason = panic_reason(panic.as_ref());
                error!(pattern = %pattern.matcher().as_str(), "Handler panicked: {}", reason);
                self.bot.sink.report(format_args!("handler for `{}` panicked: {reason}", pattern.matcher().as_str()));
            }
        }
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
