//! Remote links endpoint gateway.
//!
//! `GET` returns the JSON array of links; `POST` replaces it with the
//! request body. Any non-2xx status is an error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use super::{decode_links, encode_links, PersistenceGateway};
use crate::types::errors::GatewayError;
use crate::types::link::Link;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/api/links";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub struct RemoteGateway {
    http: reqwest::Client,
    endpoint: String,
}

impl RemoteGateway {
    pub fn new(endpoint: &str, request_timeout: Duration, connect_timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    /// Builds a gateway with the default timeouts.
    pub fn with_defaults(endpoint: &str) -> Result<Self, GatewayError> {
        Self::new(
            endpoint,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Reads the body and turns non-2xx statuses into `GatewayError::Status`.
async fn checked_body(response: reqwest::Response) -> Result<String, GatewayError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| GatewayError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

#[async_trait]
impl PersistenceGateway for RemoteGateway {
    async fn try_fetch_all(&self) -> Result<Vec<Link>, GatewayError> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let body = checked_body(response).await?;
        let links = decode_links(&body)?;
        debug!(endpoint = %self.endpoint, count = links.len(), "fetched links");
        Ok(links)
    }

    async fn replace_all(&self, links: &[Link]) -> Result<(), GatewayError> {
        let body = encode_links(links)?;
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        checked_body(response).await?;
        debug!(endpoint = %self.endpoint, count = links.len(), "saved links");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("remote {}", self.endpoint)
    }
}
