use clap::Parser;
use fanlog::{FileSettings, LogHandle, LogSettings, Logger, OfferSlot, RemoteOffer};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;

/// Read timeout the server leaves on a socket; the engine clears it on hand-off.
const SERVER_READ_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "fanlog", about = "Log fan-out demo daemon with live remote tail")]
struct Cli {
    /// TOML file with a `[log]` table. Re-read on every reload.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Accept remote tail viewers here. A viewer sends one line with the
    /// mode (`raw`, `json` or `colored`) and then only reads.
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Stop after this many seconds.
    #[arg(long, default_value_t = 30)]
    duration: u64,

    /// Write the engine's own diagnostics to this file instead of stderr.
    #[arg(long)]
    debug_log: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug_log.as_deref())?;

    let offers = OfferSlot::new();
    let builder = match &cli.config {
        Some(path) => {
            let settings = FileSettings::new(path);
            tracing::info!(path = %settings.path().display(), "log settings file");
            Logger::builder(settings)
        }
        None => Logger::builder(LogSettings::defaults()),
    };
    let logger = builder.offers(Arc::new(offers.clone())).spawn()?;
    let log = logger.handle("Main");

    if let Some(addr) = cli.listen {
        let server_log = log.child("Server");
        tokio::spawn(async move {
            if let Err(e) = serve_remote(addr, offers, server_log.clone()).await {
                tracing::error!(%addr, error = %e, "remote listener failed");
                server_log.error(format!("remote listener failed: {e}"));
            }
        });
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    for beat in 0..cli.duration {
        ticker.tick().await;
        log.module("Heartbeat", format!("beat {beat}"), fanlog::Level::Debug);
        if beat > 0 && beat % 10 == 0 {
            logger.reload();
        }
    }

    tokio::task::spawn_blocking(move || logger.join(fanlog::DEFAULT_JOIN_TIMEOUT)).await??;
    tracing::info!("logger joined");
    Ok(())
}

/// Stand-in for the device server: accept viewers and hand their sockets to
/// the logger.
async fn serve_remote(addr: SocketAddr, offers: OfferSlot, log: LogHandle) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log.info(format!("remote log listener on {addr}"));

    loop {
        let (mut stream, peer) = listener.accept().await?;
        let mut mode = String::new();
        let read = tokio::time::timeout(
            SERVER_READ_TIMEOUT,
            BufReader::new(&mut stream).read_line(&mut mode),
        )
        .await;
        if !matches!(read, Ok(Ok(n)) if n > 0) {
            tracing::debug!(%peer, "viewer sent no mode line");
            log.warn(format!("{peer} sent no mode line, dropping"));
            continue;
        }

        let stream = stream.into_std()?;
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(SERVER_READ_TIMEOUT))?;

        let (offer, released) = RemoteOffer::new(Box::new(stream), mode.trim());
        match offers.publish(offer) {
            Ok(()) => released.released().await,
            Err(_) => log.warn(format!("remote log disabled, closing {peer}")),
        }
    }
}

fn init_tracing(debug_log: Option<&std::path::Path>) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    match debug_log {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
        }
        None => tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init(),
    }
    Ok(())
}
