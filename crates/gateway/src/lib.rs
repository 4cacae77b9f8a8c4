//! Inference server gateway
//!
//! This crate forwards model lifecycle commands (load, unload, index)
//! to the inference server's HTTP repository-management API and relays
//! the upstream response. Upstream rejections are surfaced with their
//! status code and body so callers can tell them apart from sidecar
//! failures. There is no retry and no timeout beyond the client
//! default; upstream failures propagate immediately.

use reqwest::Client;
use tracing::{debug, info};

use common::{Error, Result};

/// Gateway to the inference server's repository-management endpoints
pub struct InferenceGateway {
    /// HTTP client
    client: Client,

    /// Base URL of the inference server, without a trailing slash
    base_url: String,
}

impl InferenceGateway {
    /// Creates a new gateway for the inference server at the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("model-sidecar/0.1.0")
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        info!("Inference server gateway targeting {}", base_url);

        Ok(Self { client, base_url })
    }

    /// Returns the full URL of a management endpoint
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Asks the inference server to load a model
    pub async fn load_model(&self, model_name: &str) -> Result<String> {
        self.forward(&format!("v2/repository/models/{}/load", model_name))
            .await
    }

    /// Asks the inference server to unload a model
    pub async fn unload_model(&self, model_name: &str) -> Result<String> {
        self.forward(&format!("v2/repository/models/{}/unload", model_name))
            .await
    }

    /// Fetches the inference server's model index
    pub async fn index(&self) -> Result<String> {
        self.forward("v2/repository/index").await
    }

    /// Posts to a management endpoint and relays the response body.
    ///
    /// A non-success upstream status becomes `Error::Upstream` carrying
    /// the status code and body verbatim.
    async fn forward(&self, path: &str) -> Result<String> {
        let url = self.endpoint(path);

        debug!("Forwarding management request to {}", url);

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| Error::ExternalService(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::ExternalService(format!("Reading response from {} failed: {}", url, e)))?;

        if !status.is_success() {
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url_and_path() {
        let gateway = InferenceGateway::new("http://triton:8000/").unwrap();
        assert_eq!(
            gateway.endpoint("v2/repository/models/resnet/load"),
            "http://triton:8000/v2/repository/models/resnet/load"
        );
        assert_eq!(
            gateway.endpoint("/v2/repository/index"),
            "http://triton:8000/v2/repository/index"
        );
    }

    #[tokio::test]
    async fn forward_surfaces_upstream_rejection() {
        // Bind a listener that answers every request with a 400.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                tokio::spawn(async move {
                    use tokio::io::{AsyncReadExt, AsyncWriteExt};
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 400 Bad Request\r\ncontent-length: 17\r\n\r\nfailed to load it",
                        )
                        .await;
                });
            }
        });

        let gateway = InferenceGateway::new(format!("http://{}", addr)).unwrap();
        let err = gateway.load_model("resnet").await.unwrap_err();

        match err {
            Error::Upstream { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "failed to load it");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn forward_fails_when_upstream_is_unreachable() {
        // Reserve a port, then close it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = InferenceGateway::new(format!("http://{}", addr)).unwrap();
        let err = gateway.index().await.unwrap_err();
        assert!(matches!(err, Error::ExternalService(_)));
    }
}
