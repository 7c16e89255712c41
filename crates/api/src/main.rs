use std::sync::Arc;

use anyhow::Context;

use partmatch_api::app::{self, services::AppServices};
use partmatch_infra::CatalogConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    partmatch_observability::init();

    let config = CatalogConfig::from_env().context("invalid catalog configuration")?;
    let services = Arc::new(AppServices::from_config(config).context("failed to build catalog client")?);
    let app = app::build_app(services);

    let addr = partmatch_api::server::bind_addr(|key| std::env::var(key).ok());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
