use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use stream_gateway::{
    create_router, AppState, AuthClient, ChunkSegmenter, Config, Playback, PublishController,
    SessionRegistry,
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "stream-gateway", about = "Live publish to HLS playback gateway")]
struct Args {
    /// Config file path (extension optional)
    #[arg(short, long, default_value = "config/stream-gateway")]
    config: String,

    /// Override the HTTP port from the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Auth endpoint: {}", cfg.auth.url);
    info!(
        "Segments: {}s target, {} per playlist",
        cfg.segmenter.target_duration_secs, cfg.segmenter.playlist_length
    );

    let registry = Arc::new(SessionRegistry::new());
    let auth = AuthClient::new(cfg.auth.url.clone(), cfg.auth_timeout())
        .context("Failed to build auth client")?;

    let controller = Arc::new(PublishController::new(
        Arc::clone(&registry),
        Arc::new(auth),
        Arc::new(ChunkSegmenter::new()),
        cfg.publish_config(),
    ));
    let playback = Arc::new(Playback::new(Arc::clone(&registry), cfg.playback_config()));

    let app = create_router(AppState::new(controller, playback));

    let port = args.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", cfg.service.http.bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Publish with POST http://{}/stream/<stream-key>", addr);

    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
