//! Repositorio de vehículos

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::Vehicle;
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn create(&self, plate_number: String, capacity: i32) -> AppResult<Vehicle>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn list(&self) -> AppResult<Vec<Vehicle>>;

    async fn plate_exists(&self, plate_number: &str) -> AppResult<bool>;

    async fn update(
        &self,
        id: Uuid,
        plate_number: Option<String>,
        capacity: Option<i32>,
        vehicle_status: Option<String>,
    ) -> AppResult<Vehicle>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Upsert de la posición actual del vehículo
    async fn update_location(
        &self,
        id: Uuid,
        latitude: f64,
        longitude: f64,
        at: DateTime<Utc>,
    ) -> AppResult<Vehicle>;
}

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleStore for PgVehicleRepository {
    async fn create(&self, plate_number: String, capacity: i32) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, plate_number, capacity, vehicle_status, created_at)
            VALUES ($1, $2, $3, 'active', $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(plate_number)
        .bind(capacity)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    async fn plate_exists(&self, plate_number: &str) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE plate_number = $1)")
                .bind(plate_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    async fn update(
        &self,
        id: Uuid,
        plate_number: Option<String>,
        capacity: Option<i32>,
        vehicle_status: Option<String>,
    ) -> AppResult<Vehicle> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET plate_number = $2, capacity = $3, vehicle_status = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(plate_number.unwrap_or(current.plate_number))
        .bind(capacity.unwrap_or(current.capacity))
        .bind(vehicle_status.unwrap_or(current.vehicle_status))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
        }

        Ok(())
    }

    async fn update_location(
        &self,
        id: Uuid,
        latitude: f64,
        longitude: f64,
        at: DateTime<Utc>,
    ) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET current_latitude = $2, current_longitude = $3, last_location_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(latitude)
        .bind(longitude)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        Ok(vehicle)
    }
}
