//! DTOs de Driver

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::driver::Driver;

/// Request para registrar un conductor sobre una cuenta existente
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    pub user_id: Uuid,

    #[validate(length(min = 5, max = 50))]
    pub license_number: String,
}

/// Request para actualizar un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(length(min = 5, max = 50))]
    pub license_number: Option<String>,

    pub driver_status: Option<String>,
}

/// Response de conductor para la API
#[derive(Debug, Serialize)]
pub struct DriverResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub license_number: String,
    pub driver_status: String,
    pub assigned_line_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Driver> for DriverResponse {
    fn from(driver: Driver) -> Self {
        Self {
            id: driver.id,
            user_id: driver.user_id,
            license_number: driver.license_number,
            driver_status: driver.driver_status,
            assigned_line_id: driver.assigned_line_id,
            created_at: driver.created_at,
        }
    }
}
