//! Ship operations and port capacity rules.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{CreatedShip, NewShip, Port, Ship, ShipDraft, ShipStatus, ShipStatusKind};
use crate::error::{HarborError, Result};
use crate::store::RecordStore;

/// Per-port mutexes that serialize capacity checks with the write they guard.
///
/// Only covers callers sharing this registry; separate processes writing the
/// same database can still overshoot a port's capacity.
#[derive(Debug, Default)]
struct PortLocks {
    ports: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl PortLocks {
    fn lock_for(&self, port_id: i64) -> Arc<Mutex<()>> {
        let mut ports = self.ports.lock().unwrap_or_else(PoisonError::into_inner);
        ports.entry(port_id).or_default().clone()
    }
}

/// Enforces ship and port rules on top of a [`RecordStore`].
///
/// Cloning is cheap and clones share both the store and the port locks.
#[derive(Clone)]
pub struct ShipService {
    store: Arc<dyn RecordStore>,
    locks: Arc<PortLocks>,
}

impl ShipService {
    /// Build a service over the given store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            locks: Arc::new(PortLocks::default()),
        }
    }

    /// List ships, optionally filtered by a status label.
    pub fn read_all_ships(&self, status: Option<&str>) -> Result<Vec<Ship>> {
        match status {
            None => self.store.select_all_ships(),
            Some(label) => {
                let status = label.parse::<ShipStatusKind>()?;
                self.store.select_ships_by_status(status)
            }
        }
    }

    /// Create a ship docked at the requested port.
    pub fn create_ship(&self, ship: Option<NewShip>) -> Result<CreatedShip> {
        let ship = ship.ok_or_else(|| invalid("ship payload is required"))?;
        let name = ship
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| invalid("name is required"))?;
        let port_id = ship.port_id.ok_or_else(|| invalid("portId is required"))?;
        let port = self.require_port(port_id)?;

        let lock = self.locks.lock_for(port.id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.ensure_berth(&port)?;
        let id = self.store.insert_ship(&ShipDraft {
            name,
            status: ShipStatusKind::Port,
            port_id: Some(port.id),
        })?;
        log::info!("ship {id} created at port {}", port.id);
        Ok(CreatedShip { id })
    }

    /// Delete a ship.
    pub fn delete_ship(&self, id: i64) -> Result<()> {
        self.require_ship(id)?;
        self.store.delete_ship_by_id(id)?;
        log::info!("ship {id} deleted");
        Ok(())
    }

    /// Read a ship's current status.
    pub fn read_ship_status(&self, id: i64) -> Result<ShipStatus> {
        let ship = self.require_ship(id)?;
        Ok(ShipStatus::from(ship.status))
    }

    /// Move a ship to sea or into a port.
    ///
    /// Requesting the status the ship already has is a no-op; in particular a
    /// docked ship is not moved to `port_id`.
    pub fn update_ship_status(
        &self,
        id: i64,
        port_id: Option<i64>,
        desired: ShipStatus,
    ) -> Result<ShipStatus> {
        let ship = self.require_ship(id)?;
        let target = desired
            .status
            .as_deref()
            .ok_or_else(|| invalid("status is required"))?
            .parse::<ShipStatusKind>()?;

        if ship.status == target {
            return Ok(ShipStatus::from(ship.status));
        }

        match target {
            ShipStatusKind::Sea => {
                self.store.update_ship_status(id, ShipStatusKind::Sea, None)?;
                log::info!("ship {id} left port {:?}", ship.port_id);
            }
            ShipStatusKind::Port => {
                let port_id =
                    port_id.ok_or_else(|| invalid("portId is required to dock a ship"))?;
                let port = self.require_port(port_id)?;

                let lock = self.locks.lock_for(port.id);
                let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
                self.ensure_berth(&port)?;
                self.store
                    .update_ship_status(id, ShipStatusKind::Port, Some(port.id))?;
                log::info!("ship {id} docked at port {}", port.id);
            }
        }
        Ok(ShipStatus::from(target))
    }

    fn require_ship(&self, id: i64) -> Result<Ship> {
        self.store
            .select_ship_by_id(id)?
            .ok_or_else(|| HarborError::ship_not_found(id))
    }

    fn require_port(&self, id: i64) -> Result<Port> {
        self.store
            .select_port_by_id(id)?
            .ok_or_else(|| HarborError::port_not_found(id))
    }

    // Caller must hold the port's lock.
    fn ensure_berth(&self, port: &Port) -> Result<()> {
        let occupied = self.store.count_ships_by_port_id(port.id)?;
        if occupied < i64::from(port.capacity) {
            Ok(())
        } else {
            log::warn!(
                "port {} rejected ship: {occupied}/{} berths taken",
                port.id,
                port.capacity
            );
            Err(HarborError::CapacityExceeded {
                port_id: port.id,
                capacity: port.capacity,
            })
        }
    }
}

fn invalid(message: &str) -> HarborError {
    HarborError::InvalidArgument(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::store::MockRecordStore;
    use mockall::predicate::eq;
    use std::thread;

    fn service_with_ports(ports: &[(i64, i32)]) -> (ShipService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_ports(
            ports
                .iter()
                .map(|&(id, capacity)| Port { id, capacity }),
        ));
        (ShipService::new(store.clone()), store)
    }

    fn new_ship(name: &str, port_id: i64) -> Option<NewShip> {
        Some(NewShip {
            name: Some(name.to_string()),
            port_id: Some(port_id),
        })
    }

    fn status(label: &str) -> ShipStatus {
        ShipStatus {
            status: Some(label.to_string()),
        }
    }

    fn docked_ship(id: i64, port_id: i64) -> Ship {
        Ship {
            id,
            name: "Aurora".to_string(),
            status: ShipStatusKind::Port,
            port_id: Some(port_id),
        }
    }

    #[test]
    fn create_ship_docks_at_requested_port() {
        let (service, store) = service_with_ports(&[(1, 2)]);

        let created = service.create_ship(new_ship("A", 1)).expect("create");

        let ship = store
            .select_ship_by_id(created.id)
            .expect("select")
            .expect("ship exists");
        assert_eq!(ship.port_id, Some(1));
        assert_eq!(ship.status, ShipStatusKind::Port);
        assert_eq!(store.count_ships_by_port_id(1).expect("count"), 1);
    }

    #[test]
    fn create_ship_rejects_missing_fields() {
        let (service, store) = service_with_ports(&[(1, 2)]);

        for candidate in [
            None,
            Some(NewShip::default()),
            Some(NewShip {
                name: Some("A".to_string()),
                port_id: None,
            }),
            Some(NewShip {
                name: None,
                port_id: Some(1),
            }),
            Some(NewShip {
                name: Some("   ".to_string()),
                port_id: Some(1),
            }),
        ] {
            let err = service.create_ship(candidate).unwrap_err();
            assert!(matches!(err, HarborError::InvalidArgument(_)), "{err}");
        }
        assert!(store.select_all_ships().expect("select").is_empty());
    }

    #[test]
    fn create_ship_at_unknown_port_is_not_found() {
        let (service, store) = service_with_ports(&[(1, 2)]);

        let err = service.create_ship(new_ship("A", 42)).unwrap_err();

        assert_eq!(err, HarborError::port_not_found(42));
        assert!(store.select_all_ships().expect("select").is_empty());
    }

    #[test]
    fn port_accepts_exactly_its_capacity() {
        let (service, store) = service_with_ports(&[(1, 3)]);

        for name in ["A", "B", "C"] {
            service.create_ship(new_ship(name, 1)).expect("create");
        }
        let err = service.create_ship(new_ship("D", 1)).unwrap_err();

        assert_eq!(
            err,
            HarborError::CapacityExceeded {
                port_id: 1,
                capacity: 3
            }
        );
        assert_eq!(store.count_ships_by_port_id(1).expect("count"), 3);
    }

    #[test]
    fn zero_capacity_port_rejects_every_ship() {
        let (service, _store) = service_with_ports(&[(1, 0)]);

        let err = service.create_ship(new_ship("A", 1)).unwrap_err();

        assert!(matches!(err, HarborError::CapacityExceeded { .. }));
    }

    #[test]
    fn delete_frees_a_berth_and_ids_are_not_reused() {
        let (service, _store) = service_with_ports(&[(1, 1)]);

        assert_eq!(service.create_ship(new_ship("A", 1)).expect("create").id, 1);
        assert!(matches!(
            service.create_ship(new_ship("B", 1)),
            Err(HarborError::CapacityExceeded { .. })
        ));
        service.delete_ship(1).expect("delete");
        assert_eq!(service.create_ship(new_ship("B", 1)).expect("create").id, 2);
    }

    #[test]
    fn deleted_ship_disappears_from_reads() {
        let (service, _store) = service_with_ports(&[(1, 2)]);
        let id = service.create_ship(new_ship("A", 1)).expect("create").id;

        service.delete_ship(id).expect("delete");

        assert_eq!(service.delete_ship(id), Err(HarborError::ship_not_found(id)));
        assert_eq!(
            service.read_ship_status(id),
            Err(HarborError::ship_not_found(id))
        );
        assert!(service.read_all_ships(None).expect("list").is_empty());
    }

    #[test]
    fn read_all_ships_filters_by_status() {
        let (service, _store) = service_with_ports(&[(1, 5)]);
        let a = service.create_ship(new_ship("A", 1)).expect("create").id;
        service.create_ship(new_ship("B", 1)).expect("create");
        service
            .update_ship_status(a, None, status("SEA"))
            .expect("undock");

        assert_eq!(service.read_all_ships(None).expect("all").len(), 2);
        let at_sea = service.read_all_ships(Some("sea")).expect("sea");
        assert_eq!(at_sea.len(), 1);
        assert_eq!(at_sea[0].id, a);
        assert_eq!(service.read_all_ships(Some("PORT")).expect("port").len(), 1);
    }

    #[test]
    fn read_all_ships_rejects_unknown_status() {
        let (service, _store) = service_with_ports(&[]);

        let err = service.read_all_ships(Some("bogus-status")).unwrap_err();

        assert!(matches!(err, HarborError::InvalidArgument(_)));
    }

    #[test]
    fn going_to_sea_clears_port_and_frees_berth() {
        let (service, store) = service_with_ports(&[(1, 1)]);
        let id = service.create_ship(new_ship("A", 1)).expect("create").id;

        let result = service
            .update_ship_status(id, None, status("SEA"))
            .expect("undock");

        assert_eq!(result.status.as_deref(), Some("SEA"));
        let ship = store.select_ship_by_id(id).expect("select").expect("ship");
        assert_eq!(ship.port_id, None);
        assert_eq!(store.count_ships_by_port_id(1).expect("count"), 0);
    }

    #[test]
    fn docking_requires_a_known_port_with_room() {
        let (service, store) = service_with_ports(&[(1, 5), (2, 1)]);
        let a = service.create_ship(new_ship("A", 1)).expect("create").id;
        let b = service.create_ship(new_ship("B", 1)).expect("create").id;
        service.update_ship_status(a, None, status("SEA")).expect("sea");
        service.update_ship_status(b, None, status("SEA")).expect("sea");

        assert!(matches!(
            service.update_ship_status(a, None, status("PORT")),
            Err(HarborError::InvalidArgument(_))
        ));
        assert_eq!(
            service.update_ship_status(a, Some(99), status("PORT")),
            Err(HarborError::port_not_found(99))
        );

        let docked = service
            .update_ship_status(a, Some(2), status("PORT"))
            .expect("dock");
        assert_eq!(docked.status.as_deref(), Some("PORT"));
        assert_eq!(
            service.read_ship_status(a).expect("status").status.as_deref(),
            Some("PORT")
        );

        assert_eq!(
            service.update_ship_status(b, Some(2), status("PORT")),
            Err(HarborError::CapacityExceeded {
                port_id: 2,
                capacity: 1
            })
        );
        let ship = store.select_ship_by_id(b).expect("select").expect("ship");
        assert_eq!(ship.status, ShipStatusKind::Sea);
        assert_eq!(ship.port_id, None);
    }

    #[test]
    fn docked_ship_ignores_target_port_when_already_in_port() {
        let (service, store) = service_with_ports(&[(1, 5)]);
        let id = service.create_ship(new_ship("A", 1)).expect("create").id;

        let result = service
            .update_ship_status(id, Some(404), status("PORT"))
            .expect("no-op");

        assert_eq!(result.status.as_deref(), Some("PORT"));
        let ship = store.select_ship_by_id(id).expect("select").expect("ship");
        assert_eq!(ship.port_id, Some(1));
    }

    #[test]
    fn update_checks_ship_before_status() {
        let (service, _store) = service_with_ports(&[(1, 5)]);

        assert_eq!(
            service.update_ship_status(7, None, status("bogus")),
            Err(HarborError::ship_not_found(7))
        );
    }

    #[test]
    fn update_rejects_missing_or_unknown_status() {
        let (service, _store) = service_with_ports(&[(1, 5)]);
        let id = service.create_ship(new_ship("A", 1)).expect("create").id;

        assert!(matches!(
            service.update_ship_status(id, None, ShipStatus::default()),
            Err(HarborError::InvalidArgument(_))
        ));
        assert!(matches!(
            service.update_ship_status(id, None, status("ANCHORED")),
            Err(HarborError::InvalidArgument(_))
        ));
    }

    #[test]
    fn repeated_status_request_performs_no_mutation() {
        let mut store = MockRecordStore::new();
        store
            .expect_select_ship_by_id()
            .with(eq(1))
            .times(2)
            .returning(|id| Ok(Some(docked_ship(id, 3))));
        store.expect_update_ship_status().never();
        store.expect_select_port_by_id().never();
        let service = ShipService::new(Arc::new(store));

        let first = service
            .update_ship_status(1, Some(5), status("PORT"))
            .expect("first");
        let second = service
            .update_ship_status(1, Some(5), status("PORT"))
            .expect("second");

        assert_eq!(first, second);
        assert_eq!(first.status.as_deref(), Some("PORT"));
    }

    #[test]
    fn repeated_sea_request_performs_no_mutation() {
        let mut store = MockRecordStore::new();
        store
            .expect_select_ship_by_id()
            .with(eq(2))
            .times(2)
            .returning(|id| {
                Ok(Some(Ship {
                    id,
                    name: "Borealis".to_string(),
                    status: ShipStatusKind::Sea,
                    port_id: None,
                }))
            });
        store.expect_update_ship_status().never();
        store.expect_select_port_by_id().never();
        store.expect_count_ships_by_port_id().never();
        let service = ShipService::new(Arc::new(store));

        let first = service
            .update_ship_status(2, None, status("SEA"))
            .expect("first");
        let second = service
            .update_ship_status(2, Some(5), status("sea"))
            .expect("second");

        assert_eq!(first, second);
        assert_eq!(first.status.as_deref(), Some("SEA"));
    }

    #[test]
    fn undocking_persists_status_and_port_together() {
        let mut store = MockRecordStore::new();
        store
            .expect_select_ship_by_id()
            .returning(|id| Ok(Some(docked_ship(id, 3))));
        store
            .expect_update_ship_status()
            .with(eq(1), eq(ShipStatusKind::Sea), eq(None::<i64>))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let service = ShipService::new(Arc::new(store));

        let result = service
            .update_ship_status(1, None, status("SEA"))
            .expect("undock");

        assert_eq!(result.status.as_deref(), Some("SEA"));
    }

    #[test]
    fn full_port_skips_insert() {
        let mut store = MockRecordStore::new();
        store
            .expect_select_port_by_id()
            .returning(|id| Ok(Some(Port { id, capacity: 2 })));
        store.expect_count_ships_by_port_id().returning(|_| Ok(2));
        store.expect_insert_ship().never();
        let service = ShipService::new(Arc::new(store));

        let err = service.create_ship(new_ship("A", 1)).unwrap_err();

        assert!(matches!(err, HarborError::CapacityExceeded { .. }));
    }

    #[test]
    fn insert_failure_is_internal() {
        let mut store = MockRecordStore::new();
        store
            .expect_select_port_by_id()
            .returning(|id| Ok(Some(Port { id, capacity: 2 })));
        store.expect_count_ships_by_port_id().returning(|_| Ok(0));
        store
            .expect_insert_ship()
            .times(1)
            .returning(|_| Err(HarborError::Internal("no id returned".to_string())));
        let service = ShipService::new(Arc::new(store));

        let err = service.create_ship(new_ship("A", 1)).unwrap_err();

        assert_eq!(err, HarborError::Internal("no id returned".to_string()));
    }

    #[test]
    fn concurrent_creates_never_overfill_a_port() {
        let (service, store) = service_with_ports(&[(1, 4)]);

        let handles: Vec<_> = (0..16)
            .map(|index| {
                let service = service.clone();
                thread::spawn(move || service.create_ship(new_ship(&format!("S{index}"), 1)))
            })
            .collect();
        let accepted = handles
            .into_iter()
            .map(|handle| handle.join().expect("join"))
            .filter(Result::is_ok)
            .count();

        assert_eq!(accepted, 4);
        assert_eq!(store.count_ships_by_port_id(1).expect("count"), 4);
    }
}
