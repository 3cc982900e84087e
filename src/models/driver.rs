//! Modelo de Driver
//!
//! Un conductor está ligado 1:1 a una cuenta de usuario. Su
//! assigned_line_id apunta a la ruta que tiene asignada; la
//! propagación de asignaciones lo mantiene consistente con el
//! vehículo al que esté vinculado.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Driver principal - mapea exactamente a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub user_id: Uuid,
    pub license_number: String,
    pub driver_status: String,
    pub assigned_line_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Driver junto con su cuenta de usuario (JOIN drivers + users)
#[derive(Debug, Clone, FromRow)]
pub struct DriverWithUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub license_number: String,
    pub driver_status: String,
    pub assigned_line_id: Option<Uuid>,
    pub full_name: String,
    pub email: String,
}
