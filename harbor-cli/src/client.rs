//! HTTP client for the Harbor server API.

use std::fmt;

use harbor_core::{CreatedShip, HealthResponse, NewShip, Ship, ShipStatus};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::CliResult;

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Non-success response from the Harbor server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub status: StatusCode,
    /// Server-provided message, if any.
    pub message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "server returned {}: {message}", self.status),
            None => write!(f, "server returned {}", self.status),
        }
    }
}

impl std::error::Error for ApiError {}

/// Thin wrapper over the Harbor HTTP API.
#[derive(Debug, Clone)]
pub struct HarborClient {
    client: Client,
    base_url: String,
}

impl HarborClient {
    /// Build a client for the given server base URL.
    pub fn new(server_url: &str) -> CliResult<Self> {
        let client = Client::builder().user_agent("harbor-cli").build()?;
        Ok(Self {
            client,
            base_url: normalize_server_url(server_url)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Check server liveness.
    pub async fn health(&self) -> CliResult<HealthResponse> {
        let response = self.client.get(self.url("/health")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// List ships, optionally filtered by status.
    pub async fn list_ships(&self, status: Option<&str>) -> CliResult<Vec<Ship>> {
        let mut request = self.client.get(self.url("/api/ships"));
        if let Some(status) = status {
            request = request.query(&[("status", status)]);
        }
        let response = request.send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Create a ship docked at `port_id`.
    pub async fn create_ship(&self, name: &str, port_id: i64) -> CliResult<CreatedShip> {
        let payload = NewShip {
            name: Some(name.to_string()),
            port_id: Some(port_id),
        };
        let response = self
            .client
            .post(self.url("/api/ships"))
            .json(&payload)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Delete a ship.
    pub async fn delete_ship(&self, id: i64) -> CliResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/ships/{id}")))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Read a ship's status.
    pub async fn ship_status(&self, id: i64) -> CliResult<ShipStatus> {
        let response = self
            .client
            .get(self.url(&format!("/api/ships/{id}/status")))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Request a status transition, docking at `port_id` when moving into port.
    pub async fn update_ship_status(
        &self,
        id: i64,
        status: &str,
        port_id: Option<i64>,
    ) -> CliResult<ShipStatus> {
        let mut request = self
            .client
            .put(self.url(&format!("/api/ships/{id}/status")))
            .json(&ShipStatus {
                status: Some(status.to_string()),
            });
        if let Some(port_id) = port_id {
            request = request.query(&[("portId", port_id)]);
        }
        let response = request.send().await?;
        Ok(check(response).await?.json().await?)
    }
}

async fn check(response: Response) -> CliResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .map(|body| body.message);
    Err(Box::new(ApiError { status, message }))
}

/// Normalize the server URL by trimming whitespace and trailing slashes.
fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
