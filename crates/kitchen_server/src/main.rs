use anyhow::Result;
use clap::Parser;
use kitchen_server::{
    AppState, ObservabilityConfig, ServerConfig, init_observability, serve, shutdown_signal,
    spawn_rate_limit_sweeper,
};
use kitchen_upstream::ReqwestTransport;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Kitchen recipe generation API server", long_about = None)]
struct Args {
    /// Configuration file (default: ./kitchen.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_observability(&ObservabilityConfig::default().with_json_logs(args.json_logs))?;

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        let server = config.server().clone().with_port(port);
        config = config.with_server(server);
    }
    info!(
        port = config.server().port(),
        text_model = %config.upstream().text_model(),
        image_models = config.upstream().image_models().len(),
        "Starting Kitchen API server"
    );

    let state = AppState::new(config, Arc::new(ReqwestTransport::new()?))?;
    let sweeper = spawn_rate_limit_sweeper(&state);

    serve(state, shutdown_signal()).await?;
    sweeper.abort();
    Ok(())
}
