//! Diesel schema definitions for Harbor server.

diesel::table! {
    ports (id) {
        id -> Int8,
        capacity -> Int4,
    }
}

diesel::table! {
    ships (id) {
        id -> Int8,
        name -> Text,
        status -> Text,
        port_id -> Nullable<Int8>,
    }
}

diesel::joinable!(ships -> ports (port_id));

diesel::allow_tables_to_appear_in_same_query!(ports, ships);
