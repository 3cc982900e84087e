//! Controller de administración de conductores

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::driver_dto::{CreateDriverRequest, DriverResponse, UpdateDriverRequest};
use crate::repositories::{DriverStore, PgDriverRepository, PgUserRepository, UserStore};
use crate::utils::errors::AppError;

pub struct DriverController {
    drivers: Arc<dyn DriverStore>,
    users: Arc<dyn UserStore>,
}

impl DriverController {
    pub fn new(pool: PgPool) -> Self {
        Self::with_stores(
            Arc::new(PgDriverRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool)),
        )
    }

    pub fn with_stores(drivers: Arc<dyn DriverStore>, users: Arc<dyn UserStore>) -> Self {
        Self { drivers, users }
    }

    pub async fn create(
        &self,
        request: CreateDriverRequest,
    ) -> Result<ApiResponse<DriverResponse>, AppError> {
        request.validate()?;

        self.users
            .find_by_id(request.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        // Relación 1:1 con la cuenta de usuario
        if self.drivers.exists_for_user(request.user_id).await? {
            return Err(AppError::Conflict(
                "El usuario ya está registrado como conductor".to_string(),
            ));
        }

        let driver = self
            .drivers
            .create(request.user_id, request.license_number)
            .await?;

        Ok(ApiResponse::success_with_message(
            driver.into(),
            "Conductor registrado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<DriverResponse, AppError> {
        let driver = self
            .drivers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        Ok(driver.into())
    }

    pub async fn list(&self) -> Result<Vec<DriverResponse>, AppError> {
        let drivers = self.drivers.list().await?;
        Ok(drivers.into_iter().map(DriverResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateDriverRequest,
    ) -> Result<ApiResponse<DriverResponse>, AppError> {
        request.validate()?;

        let driver = self
            .drivers
            .update(id, request.license_number, request.driver_status)
            .await?;

        Ok(ApiResponse::success_with_message(
            driver.into(),
            "Conductor actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.drivers.delete(id).await
    }
}
