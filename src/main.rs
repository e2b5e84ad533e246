use anyhow::{Context, Result};
use clap::Parser;
use cvmcp::{
    api, config,
    logging::{self, ConsoleTarget},
    resume::ResumeService,
};
use std::{net::Ipv4Addr, path::PathBuf, sync::Arc};
use tokio::net::TcpListener;

/// Serve questions about a single résumé over HTTP.
#[derive(Debug, Parser)]
#[command(name = "cvmcp", version, about)]
struct Args {
    /// Path to the résumé (.pdf, .docx, .txt, or .md); overrides RESUME_PATH.
    #[arg(long)]
    resume: Option<PathBuf>,
    /// Port to listen on; overrides SERVER_PORT and PORT.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::init_config(|config| {
        if let Some(resume) = args.resume {
            config.resume_path = resume;
        }
        if let Some(port) = args.port {
            config.server_port = port;
        }
    })
    .context("failed to load configuration")?;
    logging::init_tracing(ConsoleTarget::Stdout);

    let service = ResumeService::from_config().await.with_context(|| {
        format!("failed to load résumé from {}", config.resume_path.display())
    })?;
    let app = api::create_router(Arc::new(service), &config.web_origin);

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.server_port))
        .await
        .with_context(|| format!("failed to bind port {}", config.server_port))?;
    tracing::info!(
        port = config.server_port,
        embeddings = config.embedding_label(),
        "Listening on http://0.0.0.0:{}",
        config.server_port
    );
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;

    Ok(())
}
