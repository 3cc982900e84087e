//! DTOs de Route y RouteStop

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::route::{Route, RouteStop};

/// Request para crear una nueva ruta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(length(min = 2, max = 200))]
    pub start_location: String,

    #[validate(length(min = 2, max = 200))]
    pub end_location: String,

    pub base_fare: Decimal,

    #[validate(length(min = 2, max = 100))]
    pub company_name: Option<String>,

    pub scheduled_departure: Option<DateTime<Utc>>,
}

/// Request para actualizar una ruta existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 2, max = 200))]
    pub start_location: Option<String>,

    #[validate(length(min = 2, max = 200))]
    pub end_location: Option<String>,

    pub base_fare: Option<Decimal>,

    #[validate(length(min = 2, max = 100))]
    pub company_name: Option<String>,

    pub scheduled_departure: Option<DateTime<Utc>>,
}

/// Request para crear una parada de la ruta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStopRequest {
    #[validate(length(min = 2, max = 200))]
    pub stop_name: String,

    #[validate(range(min = 1))]
    pub stop_order: i32,

    pub distance_from_start_km: Decimal,

    pub fare_from_start: Decimal,
}

/// Request para actualizar una parada
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStopRequest {
    #[validate(length(min = 2, max = 200))]
    pub stop_name: Option<String>,

    #[validate(range(min = 1))]
    pub stop_order: Option<i32>,

    pub distance_from_start_km: Option<Decimal>,

    pub fare_from_start: Option<Decimal>,
}

/// Response de ruta para la API
#[derive(Debug, Serialize)]
pub struct RouteResponse {
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

/// Response de parada para la API
#[derive(Debug, Serialize)]
pub struct RouteStopResponse {
    pub id: Uuid,
    pub route_id: Uuid,
    pub stop_name: String,
    pub stop_order: i32,
    pub distance_from_start_km: Decimal,
    pub fare_from_start: Decimal,
}

/// Ruta junto con sus paradas ordenadas
#[derive(Debug, Serialize)]
pub struct RouteWithStopsResponse {
    #[serde(flatten)]
    pub route: RouteResponse,
    pub stops: Vec<RouteStopResponse>,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            id: route.id,
            name: route.name,
            start_location: route.start_location,
            end_location: route.end_location,
            base_fare: route.base_fare,
            company_name: route.company_name,
            assigned_vehicle_id: route.assigned_vehicle_id,
            assigned_driver_id: route.assigned_driver_id,
            scheduled_departure: route.scheduled_departure,
            created_at: route.created_at,
        }
    }
}

impl From<RouteStop> for RouteStopResponse {
    fn from(stop: RouteStop) -> Self {
        Self {
            id: stop.id,
            route_id: stop.route_id,
            stop_name: stop.stop_name,
            stop_order: stop.stop_order,
            distance_from_start_km: stop.distance_from_start_km,
            fare_from_start: stop.fare_from_start,
        }
    }
}
