//! Database models for Harbor server.

use diesel::prelude::*;
use harbor_core::{HarborError, Port, Ship, ShipDraft, ShipStatusKind};

use crate::schema::{ports, ships};

#[derive(Debug, Clone, Queryable, Insertable, Identifiable, Selectable)]
#[diesel(table_name = ports)]
/// Port database record.
pub struct PortRecord {
    /// Port identifier.
    pub id: i64,
    /// Maximum number of assigned ships.
    pub capacity: i32,
}

impl From<PortRecord> for Port {
    fn from(value: PortRecord) -> Self {
        Self {
            id: value.id,
            capacity: value.capacity,
        }
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = ships)]
#[diesel(belongs_to(PortRecord, foreign_key = port_id))]
/// Ship database record.
pub struct ShipRecord {
    /// Ship identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Status label (`SEA` or `PORT`).
    pub status: String,
    /// Assigned port.
    pub port_id: Option<i64>,
}

impl TryFrom<ShipRecord> for Ship {
    type Error = HarborError;

    fn try_from(value: ShipRecord) -> Result<Self, Self::Error> {
        let status = value.status.parse::<ShipStatusKind>().map_err(|_| {
            HarborError::Internal(format!(
                "ship {} has unreadable status {:?}",
                value.id, value.status
            ))
        })?;
        Ok(Self {
            id: value.id,
            name: value.name,
            status,
            port_id: value.port_id,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ships)]
/// Insertable ship record.
pub struct NewShipRecord {
    /// Ship name.
    pub name: String,
    /// Status label.
    pub status: String,
    /// Assigned port.
    pub port_id: Option<i64>,
}

impl From<&ShipDraft> for NewShipRecord {
    fn from(value: &ShipDraft) -> Self {
        Self {
            name: value.name.clone(),
            status: value.status.as_str().to_string(),
            port_id: value.port_id,
        }
    }
}
