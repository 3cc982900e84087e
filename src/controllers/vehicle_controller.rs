//! Controller de administración de vehículos

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::models::vehicle::VehicleStatus;
use crate::repositories::{PgVehicleRepository, VehicleStore};
use crate::utils::errors::AppError;
use crate::utils::validation::validate_plate_number;

pub struct VehicleController {
    vehicles: Arc<dyn VehicleStore>,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self::with_stores(Arc::new(PgVehicleRepository::new(pool)))
    }

    pub fn with_stores(vehicles: Arc<dyn VehicleStore>) -> Self {
        Self { vehicles }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        validate_plate_number(&request.plate_number)
            .map_err(|_| AppError::BadRequest("Formato de matrícula inválido".to_string()))?;

        if self.vehicles.plate_exists(&request.plate_number).await? {
            return Err(AppError::Conflict(
                "La matrícula ya está registrada".to_string(),
            ));
        }

        let vehicle = self
            .vehicles
            .create(request.plate_number, request.capacity)
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        Ok(vehicle.into())
    }

    pub async fn list(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.vehicles.list().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        if let Some(status) = &request.vehicle_status {
            let valid = [
                VehicleStatus::Active.as_str(),
                VehicleStatus::Inactive.as_str(),
            ];
            if !valid.contains(&status.as_str()) {
                return Err(AppError::BadRequest(
                    "Estado de vehículo inválido".to_string(),
                ));
            }
        }

        let vehicle = self
            .vehicles
            .update(id, request.plate_number, request.capacity, request.vehicle_status)
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.vehicles.delete(id).await
    }
}
