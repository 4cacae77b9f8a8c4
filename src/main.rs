use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use model_sidecar::{ModelSidecar, SidecarConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SidecarConfig::from_env()?;
    info!(
        "Starting model sidecar: repository={:?}, inference server={}",
        config.repository_root, config.inference_server_url
    );

    let sidecar = ModelSidecar::new(config)?;
    sidecar.serve().await?;

    Ok(())
}
