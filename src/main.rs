use anyhow::Result;
use clap::Parser;
use fluentrack::classifier::HttpClassifier;
use fluentrack::session::{LifecycleConfig, SessionLifecycle};
use fluentrack::store::{FsBlobStore, MemorySessionStore};
use fluentrack::{create_router, AppState, Config};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "fluentrack", about = "Speech fluency practice and trend service")]
struct Cli {
    /// Config file (without extension), e.g. config/fluentrack
    #[arg(long, default_value = "config/fluentrack")]
    config: String,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;
    let port = cli.port.unwrap_or(cfg.service.http.port);

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!(
        "Capture defaults: {}Hz, {} channel(s)",
        cfg.audio.sample_rate, cfg.audio.channels
    );
    info!("Recordings stored under {}", cfg.storage.recordings_path);
    info!("Classifier endpoint: {}", cfg.classifier.base_url);

    let sessions = Arc::new(MemorySessionStore::new());
    let blobs = Arc::new(FsBlobStore::new(
        &cfg.storage.recordings_path,
        cfg.service.public_url.clone(),
    )?);
    let classifier = Arc::new(HttpClassifier::new(&cfg.classifier)?);

    let lifecycle = Arc::new(SessionLifecycle::new(
        sessions,
        blobs,
        classifier,
        LifecycleConfig {
            waveform_buckets: cfg.audio.waveform_buckets,
            playback_ttl: Duration::from_secs(15 * 60),
        },
    ));

    let router = create_router(AppState::new(lifecycle), &cfg.storage.recordings_path);

    let addr = format!("{}:{}", cfg.service.http.bind, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
