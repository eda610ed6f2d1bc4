//! Domain entities for Harbor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::HarborError;

/// Where a ship currently is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShipStatusKind {
    /// Underway, not assigned to any port.
    Sea,
    /// Docked at a port.
    Port,
}

impl ShipStatusKind {
    /// Canonical wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipStatusKind::Sea => "SEA",
            ShipStatusKind::Port => "PORT",
        }
    }
}

impl fmt::Display for ShipStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipStatusKind {
    type Err = HarborError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("sea") {
            Ok(ShipStatusKind::Sea)
        } else if trimmed.eq_ignore_ascii_case("port") {
            Ok(ShipStatusKind::Port)
        } else {
            Err(HarborError::InvalidArgument(format!(
                "unknown ship status: {value}"
            )))
        }
    }
}

/// A vessel tracked by Harbor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Store-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Current status.
    pub status: ShipStatusKind,
    /// Assigned port; present exactly when `status` is `PORT`.
    pub port_id: Option<i64>,
}

/// A docking location with a fixed number of berths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Port {
    /// Port identifier.
    pub id: i64,
    /// Maximum number of ships assigned at once.
    pub capacity: i32,
}

/// Candidate ship submitted for creation.
///
/// Fields are optional on the wire so that missing values surface as
/// `InvalidArgument` from the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewShip {
    /// Ship name.
    pub name: Option<String>,
    /// Port to dock the new ship at.
    pub port_id: Option<i64>,
}

/// Validated ship row handed to a store for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipDraft {
    /// Ship name.
    pub name: String,
    /// Initial status.
    pub status: ShipStatusKind,
    /// Initial port assignment.
    pub port_id: Option<i64>,
}

/// Identifier of a freshly created ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedShip {
    /// Store-assigned identifier.
    pub id: i64,
}

/// Ship status transfer object, used as both request and response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShipStatus {
    /// Status label (`SEA` or `PORT`).
    pub status: Option<String>,
}

impl From<ShipStatusKind> for ShipStatus {
    fn from(value: ShipStatusKind) -> Self {
        Self {
            status: Some(value.as_str().to_string()),
        }
    }
}

/// Liveness payload returned by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always true once the server accepts requests.
    pub started: bool,
}
