//! Model repository sidecar
//!
//! A management sidecar for a model-serving repository: it accepts
//! model artifacts over HTTP, unpacks them into a versioned directory
//! layout, edits the per-model configuration file to pin the active
//! version, and proxies load/unload/index commands to the inference
//! server's management API.

pub mod config;

pub use config::SidecarConfig;

use std::sync::Arc;
use tracing::info;

use api::AppState;
use common::{Error, Result};
use gateway::InferenceGateway;
use repository::ModelRepository;

/// The sidecar service: repository manager, inference-server gateway,
/// and the HTTP surface tying them together
pub struct ModelSidecar {
    /// Process settings
    config: SidecarConfig,

    /// Shared handler state
    state: AppState,
}

impl ModelSidecar {
    /// Creates a new sidecar from the given settings
    pub fn new(config: SidecarConfig) -> Result<Self> {
        let repository = Arc::new(ModelRepository::new(config.repository_root.clone())?);
        let gateway = Arc::new(InferenceGateway::new(config.inference_server_url.clone())?);

        Ok(Self {
            config,
            state: AppState {
                repository,
                gateway,
            },
        })
    }

    /// Binds the HTTP server and runs until the process is stopped
    pub async fn serve(self) -> Result<()> {
        let app = api::router(self.state);

        info!("Sidecar listening on {}", self.config.bind_address);

        axum::Server::bind(&self.config.bind_address)
            .serve(app.into_make_service())
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}
