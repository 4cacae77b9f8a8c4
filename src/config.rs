//! Sidecar settings
//!
//! Configuration is an explicit value built once at startup and handed
//! to the components that need it; nothing reads the environment after
//! this point.

use std::net::SocketAddr;
use std::path::PathBuf;

use common::{Error, Result};

/// Settings for the sidecar process
#[derive(Debug, Clone)]
pub struct SidecarConfig {
    /// Root directory of the model repository
    pub repository_root: PathBuf,

    /// Base URL of the inference server's management API
    pub inference_server_url: String,

    /// Address the HTTP server binds to
    pub bind_address: SocketAddr,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            repository_root: PathBuf::from("/models"),
            inference_server_url: "http://localhost:8000".to_string(),
            bind_address: ([0, 0, 0, 0], 6000).into(),
        }
    }
}

impl SidecarConfig {
    /// Builds the settings from environment variables, falling back to
    /// the defaults.
    ///
    /// Recognized variables: `MODEL_REPOSITORY`, `INFERENCE_SERVER_URL`,
    /// `SIDECAR_BIND`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(root) = std::env::var("MODEL_REPOSITORY") {
            config.repository_root = PathBuf::from(root);
        }
        if let Ok(url) = std::env::var("INFERENCE_SERVER_URL") {
            config.inference_server_url = url;
        }
        if let Ok(bind) = std::env::var("SIDECAR_BIND") {
            config.bind_address = bind
                .parse()
                .map_err(|e| Error::Config(format!("Invalid SIDECAR_BIND '{}': {}", bind, e)))?;
        }

        Ok(config)
    }
}
