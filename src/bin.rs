//! Binary entry point for `traq-chat`.
//!
//! Runs a small demonstration bot: it answers `ping` anywhere with `pong!`
//! and greets whoever mentions it with `Hello`. Configuration and logging are
//! set up the same way any bot built on the library would do it.

use clap::Parser;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};
use traq_chat::{
    base::config::{Config, ConfigInner},
    prelude::{BotClient, Response, Void},
};

/// traq-chat – a hubot-style traQ bot.
///
/// Configuration can come from `config.toml` or `TRAQ_CHAT_*` environment variables.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the bot will look for a config file at `.hidden/config.toml`
    /// in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Override the webhook listen port from the configuration.
    #[arg(short, long)]
    port: Option<u16>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Main entry point for the traq-chat binary.
///
/// Sets up logging based on verbosity, loads configuration, registers the demo
/// patterns, and serves. Startup failures propagate out and end the process.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stdout = tracing_subscriber::fmt::layer()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    // Prepare the otlp layer.

    let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
    let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("traq-chat");
    let otel = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).init();

    let mut config = Config::load(args.config.as_deref())?;

    if let Some(port) = args.port {
        config = Config::from(ConfigInner { port, ..ConfigInner::clone(&config) });
    }

    // Register the demo patterns.

    let mut client = BotClient::new(config).await?;

    client.listen("ping", ping)?;
    client.respond("Hello", hello)?;

    traq_chat::start(client).await
}

async fn ping(res: Response) -> Void {
    res.send("pong!").await?;

    Ok(())
}

async fn hello(res: Response) -> Void {
    res.reply(&format!("Hello, {}\n", res.author().display_name)).await?;

    Ok(())
}
