//! PostgreSQL-backed record store.

use std::sync::Arc;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use harbor_core::{
    HarborError, MemoryStore, Port, RecordStore, Result, Ship, ShipDraft, ShipStatusKind,
};

use crate::config::StoreMode;
use crate::db::{DbPool, init_pool};
use crate::models::{NewShipRecord, PortRecord, ShipRecord};
use crate::schema::{ports, ships};

/// Record store that reads and writes the `ships` and `ports` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    /// Wrap an existing connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>> {
        self.pool
            .get()
            .map_err(|err| HarborError::Internal(format!("db connection failed: {err}")))
    }
}

fn query_failed(action: &'static str) -> impl FnOnce(diesel::result::Error) -> HarborError {
    move |err| HarborError::Internal(format!("{action} failed: {err}"))
}

fn into_ships(records: Vec<ShipRecord>) -> Result<Vec<Ship>> {
    records.into_iter().map(Ship::try_from).collect()
}

impl RecordStore for PgStore {
    fn select_all_ships(&self) -> Result<Vec<Ship>> {
        let mut conn = self.conn()?;
        let records = ships::table
            .order(ships::id.asc())
            .select(ShipRecord::as_select())
            .load(&mut conn)
            .map_err(query_failed("select ships"))?;
        into_ships(records)
    }

    fn select_ships_by_status(&self, status: ShipStatusKind) -> Result<Vec<Ship>> {
        let mut conn = self.conn()?;
        let records = ships::table
            .filter(ships::status.eq(status.as_str()))
            .order(ships::id.asc())
            .select(ShipRecord::as_select())
            .load(&mut conn)
            .map_err(query_failed("select ships by status"))?;
        into_ships(records)
    }

    fn select_ship_by_id(&self, id: i64) -> Result<Option<Ship>> {
        let mut conn = self.conn()?;
        ships::table
            .find(id)
            .select(ShipRecord::as_select())
            .first(&mut conn)
            .optional()
            .map_err(query_failed("select ship"))?
            .map(Ship::try_from)
            .transpose()
    }

    fn count_ships_by_port_id(&self, port_id: i64) -> Result<i64> {
        let mut conn = self.conn()?;
        ships::table
            .filter(ships::port_id.eq(port_id))
            .count()
            .get_result(&mut conn)
            .map_err(query_failed("count ships"))
    }

    fn insert_ship(&self, ship: &ShipDraft) -> Result<i64> {
        let mut conn = self.conn()?;
        diesel::insert_into(ships::table)
            .values(&NewShipRecord::from(ship))
            .returning(ships::id)
            .get_result(&mut conn)
            .map_err(query_failed("insert ship"))
    }

    fn update_ship_status(
        &self,
        id: i64,
        status: ShipStatusKind,
        port_id: Option<i64>,
    ) -> Result<()> {
        let mut conn = self.conn()?;
        let updated = diesel::update(ships::table.find(id))
            .set((
                ships::status.eq(status.as_str()),
                ships::port_id.eq(port_id),
            ))
            .execute(&mut conn)
            .map_err(query_failed("update ship status"))?;
        if updated == 0 {
            return Err(HarborError::ship_not_found(id));
        }
        Ok(())
    }

    fn delete_ship_by_id(&self, id: i64) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::delete(ships::table.find(id))
            .execute(&mut conn)
            .map_err(query_failed("delete ship"))?;
        Ok(())
    }

    fn select_port_by_id(&self, id: i64) -> Result<Option<Port>> {
        let mut conn = self.conn()?;
        let record = ports::table
            .find(id)
            .select(PortRecord::as_select())
            .first(&mut conn)
            .optional()
            .map_err(query_failed("select port"))?;
        Ok(record.map(Port::from))
    }
}

/// Open the record store selected by configuration.
pub fn open_store(mode: &StoreMode) -> std::result::Result<Arc<dyn RecordStore>, String> {
    match mode {
        StoreMode::Postgres { database_url } => {
            let pool = init_pool(database_url)?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreMode::Memory { ports } => Ok(Arc::new(MemoryStore::with_ports(ports.iter().copied()))),
    }
}
