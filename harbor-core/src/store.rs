//! Record store abstraction for ships and ports.

use crate::domain::{Port, Ship, ShipDraft, ShipStatusKind};
use crate::error::Result;

/// Persistence operations the ship service relies on.
///
/// Implementations must serialize single-row mutations. No cross-row
/// transaction is required.
#[cfg_attr(test, mockall::automock)]
pub trait RecordStore: Send + Sync {
    /// All ships ordered by id.
    fn select_all_ships(&self) -> Result<Vec<Ship>>;
    /// Ships with the given status, ordered by id.
    fn select_ships_by_status(&self, status: ShipStatusKind) -> Result<Vec<Ship>>;
    /// Look up a ship by id.
    fn select_ship_by_id(&self, id: i64) -> Result<Option<Ship>>;
    /// Number of ships assigned to a port.
    fn count_ships_by_port_id(&self, port_id: i64) -> Result<i64>;
    /// Insert a ship and return its generated id.
    fn insert_ship(&self, ship: &ShipDraft) -> Result<i64>;
    /// Persist a status and port assignment together.
    fn update_ship_status(&self, id: i64, status: ShipStatusKind, port_id: Option<i64>)
    -> Result<()>;
    /// Remove a ship.
    fn delete_ship_by_id(&self, id: i64) -> Result<()>;
    /// Look up a port by id.
    fn select_port_by_id(&self, id: i64) -> Result<Option<Port>>;
}
