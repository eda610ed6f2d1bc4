#![deny(missing_docs)]
//! Harbor server executable.
//!
//! Hosts HTTP endpoints for ship status and port capacity management.

mod config;
mod db;
mod models;
mod openapi;
mod routes;
mod schema;
mod store;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;
#[cfg(not(test))]
use harbor_core::ShipService;

#[cfg(not(test))]
use crate::config::{ServerConfig, StoreMode};
#[cfg(not(test))]
use crate::routes::{AppState, configure};
#[cfg(not(test))]
use crate::store::open_store;

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
    match &config.store {
        StoreMode::Postgres { .. } => log::info!("using PostgreSQL record store"),
        StoreMode::Memory { ports } => {
            log::info!("using in-memory record store with {} ports", ports.len())
        }
    }
    let store = open_store(&config.store).map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState {
        ships: ShipService::new(store),
    });

    let ServerConfig {
        host,
        port,
        ui_origins,
        ..
    } = config;
    log::info!("listening on {host}:{port}");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &ui_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
