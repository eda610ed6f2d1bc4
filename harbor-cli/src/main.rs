#![deny(missing_docs)]
//! Harbor command-line interface.
//!
//! Drives the Harbor server API: list, create, and delete ships, and move
//! them between sea and port.

mod client;

use clap::{Parser, Subcommand, ValueEnum};
use client::HarborClient;
use harbor_core::ShipStatusKind;
use serde::Serialize;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "harbor", version, about = "Harbor CLI")]
struct Cli {
    /// Base URL of the Harbor server.
    #[arg(long, global = true, env = "HARBOR_API_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum StatusArg {
    Sea,
    Port,
}

impl From<StatusArg> for ShipStatusKind {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Sea => ShipStatusKind::Sea,
            StatusArg::Port => ShipStatusKind::Port,
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Check that the server is up.
    Health,
    /// List ships.
    List {
        /// Only show ships with this status.
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Create a ship docked at a port.
    Create {
        /// Ship name.
        #[arg(long)]
        name: String,
        /// Port to dock at.
        #[arg(long = "port")]
        port_id: i64,
    },
    /// Delete a ship.
    Delete {
        /// Ship identifier.
        id: i64,
    },
    /// Show a ship's status.
    Status {
        /// Ship identifier.
        id: i64,
    },
    /// Send a ship to sea or dock it at a port.
    SetStatus {
        /// Ship identifier.
        id: i64,
        /// Desired status.
        #[arg(value_enum)]
        status: StatusArg,
        /// Port to dock at when moving into port.
        #[arg(long = "port")]
        port_id: Option<i64>,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let client = HarborClient::new(&cli.server_url)?;
    run(&client, cli.command).await
}

#[cfg(test)]
fn main() {}

async fn run(client: &HarborClient, command: Commands) -> CliResult<()> {
    match command {
        Commands::Health => print_json(&client.health().await?),
        Commands::List { status } => {
            let status = status.map(|status| ShipStatusKind::from(status).as_str());
            print_json(&client.list_ships(status).await?)
        }
        Commands::Create { name, port_id } => {
            print_json(&client.create_ship(&name, port_id).await?)
        }
        Commands::Delete { id } => {
            client.delete_ship(id).await?;
            println!("Deleted ship {id}.");
            Ok(())
        }
        Commands::Status { id } => print_json(&client.ship_status(id).await?),
        Commands::SetStatus {
            id,
            status,
            port_id,
        } => {
            let status = ShipStatusKind::from(status);
            print_json(
                &client
                    .update_ship_status(id, status.as_str(), port_id)
                    .await?,
            )
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
