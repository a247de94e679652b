//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{write_bars, write_bars_to_file};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::bar::Bar;
use crate::domain::error::FeedError;
use crate::domain::settings::FeedSettings;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

#[derive(Parser, Debug)]
#[command(name = "synthfeed", about = "Synthetic OHLCV market-data feed")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the feed server
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Generate bars locally and write them as CSV
    Bars(WindowArgs),
    /// Fetch bars from a running feed server and write them as CSV
    History {
        #[command(flatten)]
        window: WindowArgs,
        /// Server base URL; overrides [client] base_url
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    #[arg(long)]
    pub symbol: String,
    #[arg(short, long, default_value = "60")]
    pub resolution: String,
    /// Window start, epoch seconds
    #[arg(long, allow_negative_numbers = true)]
    pub from: i64,
    /// Window end, epoch seconds
    #[arg(long, allow_negative_numbers = true)]
    pub to: i64,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Write CSV here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Serve { config } => run_serve(config.as_deref()),
        Command::Bars(args) => run_bars(&args),
        Command::History { window, url } => run_history(&window, url.as_deref()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(&err)
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, FeedError> {
    tracing::info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| FeedError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// The file at `path`, or an empty configuration when none was given.
pub fn load_optional_config(path: Option<&Path>) -> Result<FileConfigAdapter, FeedError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn listen_addr(config: &dyn ConfigPort) -> Result<SocketAddr, FeedError> {
    let listen = config
        .get_string("web", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    listen
        .parse()
        .map_err(|_| FeedError::config_invalid("web", "listen", format!("'{listen}' is not host:port")))
}

fn write_output(output: Option<&Path>, bars: &[Bar]) -> Result<(), FeedError> {
    match output {
        Some(path) => {
            write_bars_to_file(path, bars)?;
            tracing::info!("wrote {} bars to {}", bars.len(), path.display());
            Ok(())
        }
        None => write_bars(std::io::stdout().lock(), bars),
    }
}

pub fn run_bars(args: &WindowArgs) -> Result<(), FeedError> {
    let config = load_optional_config(args.config.as_deref())?;
    let settings = FeedSettings::from_config(&config)?;

    if args.to <= args.from {
        tracing::warn!(from = args.from, to = args.to, "empty window, no data");
        return Ok(());
    }
    let bars = settings.generator.generate(
        &args.symbol,
        &args.resolution,
        args.from,
        args.to,
        &mut rand::thread_rng(),
    );
    write_output(args.output.as_deref(), &bars)
}

#[cfg(any(feature = "web", feature = "client"))]
fn runtime() -> Result<tokio::runtime::Runtime, FeedError> {
    Ok(tokio::runtime::Runtime::new()?)
}

#[cfg(feature = "web")]
fn run_serve(config_path: Option<&Path>) -> Result<(), FeedError> {
    use crate::adapters::web::{AppState, build_router};

    let config = load_optional_config(config_path)?;
    let settings = FeedSettings::from_config(&config)?;
    let addr = listen_addr(&config)?;
    let router = build_router(AppState { settings });

    runtime()?.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("synthfeed listening on http://{addr}");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok::<(), FeedError>(())
    })
}

#[cfg(not(feature = "web"))]
fn run_serve(_config_path: Option<&Path>) -> Result<(), FeedError> {
    Err(FeedError::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "web feature is required for serve",
    )))
}

#[cfg(feature = "web")]
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received, stopping"),
        Err(e) => {
            tracing::warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(feature = "client")]
fn run_history(args: &WindowArgs, url: Option<&str>) -> Result<(), FeedError> {
    use crate::adapters::feed_client::{FeedAdapter, HttpTransport, PeriodParams};
    use crate::domain::settings::ClientSettings;

    let config = load_optional_config(args.config.as_deref())?;
    let mut client = ClientSettings::from_config(&config)?;
    if let Some(url) = url {
        client.base_url = url.trim_end_matches('/').to_string();
    }
    let adapter = FeedAdapter::new(HttpTransport::new(&client)?);

    let history = runtime()?.block_on(async {
        let feed = adapter.on_ready().await?;
        tracing::info!(
            "connected to {}, resolutions {:?}",
            adapter.transport().base_url(),
            feed.supported_resolutions
        );
        let symbol = adapter.resolve_symbol(&args.symbol).await?;
        adapter
            .get_bars(
                &symbol,
                &args.resolution,
                PeriodParams {
                    from: args.from,
                    to: args.to,
                    first_data_request: true,
                },
            )
            .await
    })?;

    if history.no_data {
        tracing::warn!(symbol = %args.symbol, "server reported no data");
        return Ok(());
    }
    write_output(args.output.as_deref(), &history.bars)
}

#[cfg(not(feature = "client"))]
fn run_history(_args: &WindowArgs, _url: Option<&str>) -> Result<(), FeedError> {
    Err(FeedError::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "client feature is required for history",
    )))
}
