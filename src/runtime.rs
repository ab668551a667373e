//! The bot client facade and its lifecycle.

use std::{future::Future, io::Write, net::SocketAddr, sync::Arc};

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        error::{ChatError, ChatResult},
        sink::DiagnosticSink,
        types::Res,
    },
    interaction::{
        delivery::DeliveryLog,
        dispatch::EventDispatcher,
        pattern::{Handler, IntoMatcher, PatternRegistry},
        response::{BotContext, Response},
        stamps::StampTable,
    },
    service::{api::ApiClient, webhook},
};

/// A traQ bot: configuration, REST client, stamp table, and registered patterns.
///
/// Patterns are registered through `&mut self` during setup. Serving consumes
/// the client, after which the registry is frozen and shared read-only.
pub struct BotClient {
    /// The configuration for the bot.
    pub config: Config,
    /// The REST client instance.
    pub api: ApiClient,
    stamps: Arc<StampTable>,
    sink: DiagnosticSink,
    registry: PatternRegistry,
}

impl BotClient {
    /// Create a client talking to the traQ REST API named in `config`.
    ///
    /// Fetches the stamp table before returning; failure is fatal to the bot.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Fine if the embedding application already installed one.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let api = ApiClient::traq(&config)?;

        Ok(Self::with_api(config, api).await?)
    }

    /// Create a client over an arbitrary REST implementation.
    #[instrument(skip_all)]
    pub async fn with_api(config: Config, api: ApiClient) -> ChatResult<Self> {
        let stamps = api.get_stamps().await.map_err(ChatError::StartupFetch)?.into_iter().collect::<StampTable>();

        info!(stamps = stamps.len(), bot_user_id = %config.bot_user_id, "Bot client initialized");

        Ok(Self {
            config,
            api,
            stamps: Arc::new(stamps),
            sink: DiagnosticSink::stdout(),
            registry: PatternRegistry::new(),
        })
    }

    pub fn stamps(&self) -> &StampTable {
        &self.stamps
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Where handler and send failures are written. Defaults to stdout.
    pub fn sink(&self) -> &DiagnosticSink {
        &self.sink
    }

    pub fn set_writer<W>(&self, writer: W)
    where
        W: Write + Send + 'static,
    {
        self.sink.set_writer(writer);
    }

    /// Run `handler` for every non-bot message whose text contains a match of `matcher`.
    pub fn listen<M, H>(&mut self, matcher: M, handler: H) -> ChatResult<()>
    where
        M: IntoMatcher,
        H: Handler,
    {
        self.registry.register(matcher.into_matcher()?, Arc::new(handler), false)
    }

    /// Like [`BotClient::listen`], but only when the message mentions the bot.
    pub fn respond<M, H>(&mut self, matcher: M, handler: H) -> ChatResult<()>
    where
        M: IntoMatcher,
        H: Handler,
    {
        self.registry.register(matcher.into_matcher()?, Arc::new(handler), true)
    }

    /// [`BotClient::listen`] for handlers that cannot fail.
    pub fn listen_infallible<M, F, Fut>(&mut self, matcher: M, handler: F) -> ChatResult<()>
    where
        M: IntoMatcher,
        F: Fn(Response) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.listen(matcher, infallible(handler))
    }

    /// [`BotClient::respond`] for handlers that cannot fail.
    pub fn respond_infallible<M, F, Fut>(&mut self, matcher: M, handler: F) -> ChatResult<()>
    where
        M: IntoMatcher,
        F: Fn(Response) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.respond(matcher, infallible(handler))
    }

    /// Freeze the registrations into a dispatcher.
    pub fn into_dispatcher(self) -> EventDispatcher {
        let bot = BotContext {
            bot_user_id: self.config.bot_user_id,
            api: self.api,
            stamps: self.stamps,
            sink: self.sink,
            embed: self.config.embed,
        };

        EventDispatcher::new(self.registry, bot, DeliveryLog::new(self.config.dedupe_capacity))
    }

    /// Listen for webhooks on `port` and block until shutdown.
    #[instrument(skip(self))]
    pub async fn serve(self, port: u16) -> ChatResult<()> {
        let token = self.config.verification_token.clone();
        let dispatcher = self.into_dispatcher();

        info!(patterns = dispatcher.registry().len(), "Starting webhook listener ...");

        let router = webhook::router(token, dispatcher);
        webhook::serve(SocketAddr::from(([0, 0, 0, 0], port)), router).await
    }

    /// [`BotClient::serve`] on the configured port.
    pub async fn start(self) -> ChatResult<()> {
        let port = self.config.port;
        self.serve(port).await
    }
}

/// Adapt a handler with no failure path into a [`Handler`].
fn infallible<F, Fut>(handler: F) -> impl Handler
where
    F: Fn(Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    move |res: Response| {
        let fut = handler(res);
        async move {
            fut.await;
            Ok::<(), anyhow::Error>(())
        }
    }
}
