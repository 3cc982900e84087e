//! Modelo de Vehicle
//!
//! Mapea exactamente a la tabla vehicles. La posición GPS actual vive
//! en el propio registro del vehículo y se actualiza con cada broadcast
//! del conductor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Inactive,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "active",
            VehicleStatus::Inactive => "inactive",
        }
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate_number: String,
    pub capacity: i32,
    pub vehicle_status: String,
    pub assigned_driver_id: Option<Uuid>,
    pub assigned_route_id: Option<Uuid>,
    pub current_latitude: Option<f64>,
    pub current_longitude: Option<f64>,
    pub last_location_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
