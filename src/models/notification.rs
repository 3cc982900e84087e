//! Modelo de Notification
//!
//! Las notificaciones se insertan como efecto secundario de las
//! asignaciones y de los eventos del ticket. Nunca mutan otras
//! entidades; la entrega real (push/SMS) queda fuera del sistema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Notification principal - mapea exactamente a la tabla notifications
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
