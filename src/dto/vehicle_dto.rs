//! DTOs de Vehicle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::Vehicle;

/// Request para crear un nuevo vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 5, max = 20))]
    pub plate_number: String,

    #[validate(range(min = 1, max = 100))]
    pub capacity: i32,
}

/// Request para actualizar un vehículo existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 5, max = 20))]
    pub plate_number: Option<String>,

    #[validate(range(min = 1, max = 100))]
    pub capacity: Option<i32>,

    pub vehicle_status: Option<String>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
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

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            plate_number: vehicle.plate_number,
            capacity: vehicle.capacity,
            vehicle_status: vehicle.vehicle_status,
            assigned_driver_id: vehicle.assigned_driver_id,
            assigned_route_id: vehicle.assigned_route_id,
            current_latitude: vehicle.current_latitude,
            current_longitude: vehicle.current_longitude,
            last_location_at: vehicle.last_location_at,
            created_at: vehicle.created_at,
        }
    }
}
