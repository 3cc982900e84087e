//! Modelos de Route y RouteStop
//!
//! Una ruta es una línea origen-destino con tarifa base. Sus paradas
//! intermedias llevan distancia y tarifa acumuladas desde el origen,
//! monotónicas con stop_order, usadas para tarificar sub-segmentos.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Route principal - mapea exactamente a la tabla routes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub start_location: String,
    pub end_location: String,
    pub base_fare: Decimal,
    pub company_name: Option<String>,
    pub assigned_vehicle_id: Option<Uuid>,
    pub assigned_driver_id: Option<Uuid>,
    pub scheduled_departure: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// RouteStop - parada intermedia de una ruta
///
/// Invariante: stop_order es único dentro de la ruta y tanto
/// distance_from_start_km como fare_from_start no decrecen con él.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RouteStop {
    pub id: Uuid,
    pub route_id: Uuid,
    pub stop_name: String,
    pub stop_order: i32,
    pub distance_from_start_km: Decimal,
    pub fare_from_start: Decimal,
}
