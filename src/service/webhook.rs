//! Inbound webhook listener.
//!
//! traQ delivers every bot event as a `POST` carrying two headers:
//! `X-TRAQ-BOT-TOKEN` (the verification token) and `X-TRAQ-BOT-EVENT`
//! (the event type). Only `MESSAGE_CREATED` reaches the dispatcher.

use std::{future::Future, io, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use tokio::net::TcpListener;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    base::error::{ChatError, ChatResult},
    interaction::{dispatch::EventDispatcher, event::MessageCreatedPayload},
};

pub const TOKEN_HEADER: &str = "X-TRAQ-BOT-TOKEN";
pub const EVENT_HEADER: &str = "X-TRAQ-BOT-EVENT";

pub const PING: &str = "PING";
pub const MESSAGE_CREATED: &str = "MESSAGE_CREATED";

/// Shared state for the webhook route.
struct WebhookState {
    verification_token: String,
    dispatcher: EventDispatcher,
}

/// Build the webhook router.
pub fn router(verification_token: impl Into<String>, dispatcher: EventDispatcher) -> Router {
    let state = Arc::new(WebhookState {
        verification_token: verification_token.into(),
        dispatcher,
    });

    Router::new().route("/", post(handle_webhook)).with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, router: Router) -> ChatResult<()> {
    let listener = TcpListener::bind(addr).await.map_err(ChatError::ListenerStart)?;

    info!(addr = %addr, "Webhook server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await
        .map_err(ChatError::ListenerStart)
}

/// Resolve once `signal` fires.
///
/// If the signal handler cannot be installed, never resolve: the server keeps
/// running until the process is killed instead of exiting cleanly at once.
async fn shutdown_on(signal: impl Future<Output = io::Result<()>>) {
    match signal.await {
        Ok(()) => info!("Shutting down webhook server ..."),
        Err(err) => {
            error!("Failed to listen for Ctrl-C, serving until killed: {}", err);
            std::future::pending::<()>().await
        }
    }
}

#[instrument(skip_all)]
async fn handle_webhook(State(state): State<Arc<WebhookState>>, headers: HeaderMap, body: Bytes) -> StatusCode {
    let token = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok());
    if token != Some(state.verification_token.as_str()) {
        warn!("Rejecting webhook with a bad verification token.");
        return StatusCode::UNAUTHORIZED;
    }

    let Some(event) = headers.get(EVENT_HEADER).and_then(|v| v.to_str().ok()) else {
        warn!("Rejecting webhook without an event header.");
        return StatusCode::BAD_REQUEST;
    };

    match event {
        PING => {
            info!("Received ping event ...");
        }
        MESSAGE_CREATED => {
            let payload = match serde_json::from_slice::<MessageCreatedPayload>(&body) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Malformed message payload: {}", e);
                    return StatusCode::BAD_REQUEST;
                }
            };

            let invoked = state.dispatcher.dispatch(payload).await;
            debug!(invoked, "Dispatched message event");
        }
        other => {
            debug!(event = %other, "Ignoring unhandled event.");
        }
    }

    StatusCode::NO_CONTENT
}
