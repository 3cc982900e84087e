//! Controller de administración de rutas y paradas

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::route_dto::{
    CreateRouteRequest, CreateStopRequest, RouteResponse, RouteStopResponse,
    RouteWithStopsResponse, UpdateRouteRequest, UpdateStopRequest,
};
use crate::models::route::RouteStop;
use crate::repositories::{PgRouteRepository, RouteStore};
use crate::utils::errors::AppError;

pub struct RouteController {
    routes: Arc<dyn RouteStore>,
}

impl RouteController {
    pub fn new(pool: PgPool) -> Self {
        Self::with_stores(Arc::new(PgRouteRepository::new(pool)))
    }

    pub fn with_stores(routes: Arc<dyn RouteStore>) -> Self {
        Self { routes }
    }

    pub async fn create(
        &self,
        request: CreateRouteRequest,
    ) -> Result<ApiResponse<RouteResponse>, AppError> {
        request.validate()?;

        if request.base_fare < Decimal::ZERO {
            return Err(AppError::BadRequest(
                "La tarifa base no puede ser negativa".to_string(),
            ));
        }

        let route = self
            .routes
            .create_route(
                request.name,
                request.start_location,
                request.end_location,
                request.base_fare,
                request.company_name,
                request.scheduled_departure,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            route.into(),
            "Ruta creada exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<RouteWithStopsResponse, AppError> {
        let route = self
            .routes
            .find_route_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        let stops = self.routes.list_stops(id).await?;

        Ok(RouteWithStopsResponse {
            route: route.into(),
            stops: stops.into_iter().map(RouteStopResponse::from).collect(),
        })
    }

    pub async fn list(&self) -> Result<Vec<RouteResponse>, AppError> {
        let routes = self.routes.list_routes().await?;
        Ok(routes.into_iter().map(RouteResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateRouteRequest,
    ) -> Result<ApiResponse<RouteResponse>, AppError> {
        request.validate()?;

        if let Some(base_fare) = request.base_fare {
            if base_fare < Decimal::ZERO {
                return Err(AppError::BadRequest(
                    "La tarifa base no puede ser negativa".to_string(),
                ));
            }
        }

        let route = self
            .routes
            .update_route(
                id,
                request.name,
                request.start_location,
                request.end_location,
                request.base_fare,
                request.company_name,
                request.scheduled_departure,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            route.into(),
            "Ruta actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.routes.delete_route(id).await
    }

    pub async fn add_stop(
        &self,
        route_id: Uuid,
        request: CreateStopRequest,
    ) -> Result<ApiResponse<RouteStopResponse>, AppError> {
        request.validate()?;

        self.routes
            .find_route_by_id(route_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        let existing = self.routes.list_stops(route_id).await?;
        check_stop_consistency(
            &existing,
            None,
            request.stop_order,
            request.distance_from_start_km,
            request.fare_from_start,
        )?;

        let stop = self
            .routes
            .create_stop(
                route_id,
                request.stop_name,
                request.stop_order,
                request.distance_from_start_km,
                request.fare_from_start,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            stop.into(),
            "Parada agregada exitosamente".to_string(),
        ))
    }

    pub async fn update_stop(
        &self,
        route_id: Uuid,
        stop_id: Uuid,
        request: UpdateStopRequest,
    ) -> Result<ApiResponse<RouteStopResponse>, AppError> {
        request.validate()?;

        let existing = self.routes.list_stops(route_id).await?;
        let current = existing
            .iter()
            .find(|s| s.id == stop_id)
            .ok_or_else(|| AppError::NotFound("Parada no encontrada".to_string()))?;

        check_stop_consistency(
            &existing,
            Some(stop_id),
            request.stop_order.unwrap_or(current.stop_order),
            request
                .distance_from_start_km
                .unwrap_or(current.distance_from_start_km),
            request.fare_from_start.unwrap_or(current.fare_from_start),
        )?;

        let stop = self
            .routes
            .update_stop(
                stop_id,
                request.stop_name,
                request.stop_order,
                request.distance_from_start_km,
                request.fare_from_start,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            stop.into(),
            "Parada actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete_stop(&self, stop_id: Uuid) -> Result<(), AppError> {
        self.routes.delete_stop(stop_id).await
    }
}

/// Verifica que la parada nueva/actualizada mantenga los invariantes:
/// stop_order único dentro de la ruta, y distancia y tarifa acumuladas
/// no decrecientes respecto a sus vecinas.
fn check_stop_consistency(
    existing: &[RouteStop],
    exclude: Option<Uuid>,
    stop_order: i32,
    distance_from_start_km: Decimal,
    fare_from_start: Decimal,
) -> Result<(), AppError> {
    if distance_from_start_km < Decimal::ZERO || fare_from_start < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "La distancia y la tarifa acumuladas no pueden ser negativas".to_string(),
        ));
    }

    let others = existing.iter().filter(|s| Some(s.id) != exclude);

    for stop in others {
        if stop.stop_order == stop_order {
            return Err(AppError::Conflict(format!(
                "Ya existe una parada con orden {} en esta ruta",
                stop_order
            )));
        }

        let decreasing_after = stop.stop_order < stop_order
            && (stop.distance_from_start_km > distance_from_start_km
                || stop.fare_from_start > fare_from_start);
        let increasing_before = stop.stop_order > stop_order
            && (stop.distance_from_start_km < distance_from_start_km
                || stop.fare_from_start < fare_from_start);

        if decreasing_after || increasing_before {
            return Err(AppError::BadRequest(
                "La distancia y la tarifa acumuladas deben crecer con el orden de las paradas"
                    .to_string(),
            ));
        }
    }

    Ok(())
}
