//! Controller de asignaciones conductor/vehículo/ruta

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::assignment_dto::{
    DriverRouteAssignmentResponse, DriverVehicleAssignmentResponse, VehicleRouteAssignmentResponse,
};
use crate::dto::common::ApiResponse;
use crate::repositories::{AssignmentStore, PgAssignmentRepository};
use crate::utils::errors::AppError;

pub struct AssignmentController {
    assignments: Arc<dyn AssignmentStore>,
}

impl AssignmentController {
    pub fn new(pool: PgPool) -> Self {
        Self::with_stores(Arc::new(PgAssignmentRepository::new(pool)))
    }

    pub fn with_stores(assignments: Arc<dyn AssignmentStore>) -> Self {
        Self { assignments }
    }

    pub async fn assign_driver_to_vehicle(
        &self,
        vehicle_id: Uuid,
        driver_id: Uuid,
    ) -> Result<ApiResponse<DriverVehicleAssignmentResponse>, AppError> {
        let assignment = self
            .assignments
            .assign_driver_to_vehicle(vehicle_id, driver_id)
            .await?;

        let response = DriverVehicleAssignmentResponse {
            vehicle: assignment.vehicle.into(),
            driver_id,
            propagated_route_id: assignment.propagated_route_id,
        };

        Ok(ApiResponse::success_with_message(
            response,
            "Conductor asignado al vehículo exitosamente".to_string(),
        ))
    }

    pub async fn assign_driver_to_route(
        &self,
        route_id: Uuid,
        driver_id: Uuid,
    ) -> Result<ApiResponse<DriverRouteAssignmentResponse>, AppError> {
        let assignment = self
            .assignments
            .assign_driver_to_route(route_id, driver_id)
            .await?;

        let response = DriverRouteAssignmentResponse {
            route: assignment.route.into(),
            driver_id,
        };

        Ok(ApiResponse::success_with_message(
            response,
            "Conductor asignado a la ruta exitosamente".to_string(),
        ))
    }

    pub async fn assign_vehicle_to_route(
        &self,
        route_id: Uuid,
        vehicle_id: Uuid,
    ) -> Result<ApiResponse<VehicleRouteAssignmentResponse>, AppError> {
        let route = self
            .assignments
            .assign_vehicle_to_route(route_id, vehicle_id)
            .await?;

        let response = VehicleRouteAssignmentResponse {
            route: route.into(),
            vehicle_id,
        };

        Ok(ApiResponse::success_with_message(
            response,
            "Vehículo asignado a la ruta exitosamente".to_string(),
        ))
    }
}
