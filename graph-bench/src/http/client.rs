//! `reqwest`-based implementation of [`BackendAdapter`] for the HTTP graph service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use tracing::{debug, info};

use super::{parse_degrees, ADD_EDGE_PATH, GET_DEGREES_PATH, RECON_PATH};
use crate::errors::BackendError;
use crate::interfaces::BackendAdapter;
use crate::models::Degrees;

/// Adapter for the REST graph service.
///
/// Every edge is sent once, source to target. Whether the service also stores
/// the reverse direction is up to the service.
///
/// # Example
///
/// ```ignore
/// let backend = HttpBackend::new("http://0.0.0.0:9000", Duration::from_secs(5))?;
/// backend.reset().await?;
/// backend.add_edge("ver0", "ver1").await?;
/// assert_eq!(backend.shortest_path_length("ver0", "ver1").await?, Degrees::Path(1));
/// ```
pub struct HttpBackend {
    base_url: String,
    client: ReqwestClient,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::connection(e.to_string()))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        info!(url = %base_url, timeout_ms = timeout.as_millis() as u64, "Created HTTP graph backend");

        Ok(Self {
            base_url,
            client,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, path: &str, params: &[(&str, &str)]) -> Result<Response, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?params, "POST");
        self.client
            .post(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else if err.is_connect() || err.is_request() {
            BackendError::connection(err.to_string())
        } else {
            BackendError::backend(err.to_string())
        }
    }

    /// Turn a non-success response into an error carrying its status and body.
    async fn reject(&self, response: Response) -> BackendError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        BackendError::status(status.as_u16(), body.trim().to_string())
    }
}

#[async_trait]
impl BackendAdapter for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn reset(&self) -> Result<(), BackendError> {
        let response = self.post(RECON_PATH, &[]).await?;
        if !response.status().is_success() {
            return Err(self.reject(response).await);
        }
        Ok(())
    }

    async fn add_edge(&self, v1: &str, v2: &str) -> Result<(), BackendError> {
        let response = self.post(ADD_EDGE_PATH, &[("v1", v1), ("v2", v2)]).await?;
        if !response.status().is_success() {
            return Err(self.reject(response).await);
        }
        Ok(())
    }

    async fn shortest_path_length(&self, v1: &str, v2: &str) -> Result<Degrees, BackendError> {
        let response = self
            .post(GET_DEGREES_PATH, &[("v1", v1), ("v2", v2)])
            .await?;

        match response.status() {
            // The service answers an unknown vertex with a 404 and a message
            // ("key not found"). A bare 404 means the route itself is missing.
            StatusCode::NOT_FOUND => {
                let body = response.text().await.unwrap_or_default();
                let body = body.trim();
                if body.is_empty() {
                    return Err(BackendError::status(
                        404,
                        format!("no route at {}{}", self.base_url, GET_DEGREES_PATH),
                    ));
                }
                Err(BackendError::not_found(format!("{} or {}: {}", v1, v2, body)))
            }
            status if status.is_success() => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| self.transport_error(e))?;
                parse_degrees(&body)
            }
            _ => Err(self.reject(response).await),
        }
    }
}
