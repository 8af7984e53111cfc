//! Read-only reference table endpoints.

use axum::Json;

use crate::domain::reference::{
    self, NeighborhoodEntry, PropertyTypeEntry, RoomTypeEntry,
};

/// GET /reference/neighborhoods
pub async fn list_neighborhoods() -> Json<Vec<NeighborhoodEntry>> {
    Json(reference::neighborhoods())
}

/// GET /reference/room-types
pub async fn list_room_types() -> Json<Vec<RoomTypeEntry>> {
    Json(reference::room_types())
}

/// GET /reference/property-types
pub async fn list_property_types() -> Json<Vec<PropertyTypeEntry>> {
    Json(reference::property_types())
}
