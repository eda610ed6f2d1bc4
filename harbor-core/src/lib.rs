#![deny(missing_docs)]
//! Harbor core library.
//!
//! This crate contains the ship and port domain types, the record store
//! abstraction, and the service that enforces port capacity.

pub mod domain;
pub mod error;
pub mod memory;
pub mod service;
pub mod store;

pub use domain::{
    CreatedShip, HealthResponse, NewShip, Port, Ship, ShipDraft, ShipStatus, ShipStatusKind,
};
pub use error::{HarborError, Result};
pub use memory::MemoryStore;
pub use service::ShipService;
pub use store::RecordStore;
