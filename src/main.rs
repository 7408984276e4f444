use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use dysphoria_info::api::create_router;
use dysphoria_info::config::Config;
use dysphoria_info::fetcher::InfoFetcher;
use dysphoria_info::scrapper::Scrapper;
use dysphoria_info::search::DuckDuckGoProvider;

#[derive(Debug, Parser)]
#[command(version, about = "Serves combined health information for a search query")]
struct Args {
    /// Interface to bind, overrides HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Bridge log crate -> tracing for dependencies that still use `log`
    tracing_log::LogTracer::init()?;
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let client = config.http_client()?;
    let scrapper = Scrapper::new(client.clone(), &config.source_url, config.max_paragraphs);
    let search_provider = Arc::new(DuckDuckGoProvider::with_endpoint(
        client,
        &config.search_endpoint,
    ));
    let fetcher = Arc::new(InfoFetcher::new(scrapper, search_provider, &config));
    let app = create_router(fetcher);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
