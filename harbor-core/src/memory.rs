//! In-process record store.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::domain::{Port, Ship, ShipDraft, ShipStatusKind};
use crate::error::{HarborError, Result};
use crate::store::RecordStore;

#[derive(Debug, Default)]
struct Tables {
    ships: BTreeMap<i64, Ship>,
    ports: BTreeMap<i64, Port>,
    next_ship_id: i64,
}

/// Record store backed by in-memory maps.
///
/// Ship ids start at 1 and are never reused, mirroring a database sequence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given ports.
    pub fn with_ports(ports: impl IntoIterator<Item = Port>) -> Self {
        let store = Self::new();
        for port in ports {
            store.put_port(port);
        }
        store
    }

    /// Insert or replace a port.
    pub fn put_port(&self, port: Port) {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables.ports.insert(port.id, port);
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T> {
        let tables = self
            .tables
            .read()
            .map_err(|_| HarborError::Internal("memory store lock poisoned".to_string()))?;
        Ok(f(&tables))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| HarborError::Internal("memory store lock poisoned".to_string()))?;
        f(&mut tables)
    }
}

impl RecordStore for MemoryStore {
    fn select_all_ships(&self) -> Result<Vec<Ship>> {
        self.read(|tables| tables.ships.values().cloned().collect())
    }

    fn select_ships_by_status(&self, status: ShipStatusKind) -> Result<Vec<Ship>> {
        self.read(|tables| {
            tables
                .ships
                .values()
                .filter(|ship| ship.status == status)
                .cloned()
                .collect()
        })
    }

    fn select_ship_by_id(&self, id: i64) -> Result<Option<Ship>> {
        self.read(|tables| tables.ships.get(&id).cloned())
    }

    fn count_ships_by_port_id(&self, port_id: i64) -> Result<i64> {
        self.read(|tables| {
            tables
                .ships
                .values()
                .filter(|ship| ship.port_id == Some(port_id))
                .count() as i64
        })
    }

    fn insert_ship(&self, ship: &ShipDraft) -> Result<i64> {
        self.write(|tables| {
            tables.next_ship_id += 1;
            let id = tables.next_ship_id;
            tables.ships.insert(
                id,
                Ship {
                    id,
                    name: ship.name.clone(),
                    status: ship.status,
                    port_id: ship.port_id,
                },
            );
            Ok(id)
        })
    }

    fn update_ship_status(
        &self,
        id: i64,
        status: ShipStatusKind,
        port_id: Option<i64>,
    ) -> Result<()> {
        self.write(|tables| {
            let ship = tables
                .ships
                .get_mut(&id)
                .ok_or_else(|| HarborError::ship_not_found(id))?;
            ship.status = status;
            ship.port_id = port_id;
            Ok(())
        })
    }

    fn delete_ship_by_id(&self, id: i64) -> Result<()> {
        self.write(|tables| {
            tables.ships.remove(&id);
            Ok(())
        })
    }

    fn select_port_by_id(&self, id: i64) -> Result<Option<Port>> {
        self.read(|tables| tables.ports.get(&id).copied())
    }
}
