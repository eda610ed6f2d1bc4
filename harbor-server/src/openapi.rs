//! OpenAPI specification for Harbor server.

use utoipa::OpenApi;

use harbor_core::{CreatedShip, HealthResponse, NewShip, Ship, ShipStatus, ShipStatusKind};

use crate::routes::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::list_ships,
        crate::routes::create_ship,
        crate::routes::delete_ship,
        crate::routes::ship_status,
        crate::routes::update_ship_status,
        crate::routes::openapi_json
    ),
    components(
        schemas(
            Ship,
            ShipStatusKind,
            NewShip,
            CreatedShip,
            ShipStatus,
            HealthResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "ships", description = "Ship and port assignment"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the Harbor server.
pub struct ApiDoc;
