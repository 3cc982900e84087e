//! Repositorio de conductores

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::driver::{Driver, DriverWithUser};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait DriverStore: Send + Sync {
    async fn create(&self, user_id: Uuid, license_number: String) -> AppResult<Driver>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>>;

    /// Conductor junto con su cuenta de usuario (JOIN con users)
    async fn find_with_user(&self, id: Uuid) -> AppResult<Option<DriverWithUser>>;

    async fn exists_for_user(&self, user_id: Uuid) -> AppResult<bool>;

    async fn list(&self) -> AppResult<Vec<Driver>>;

    async fn update(
        &self,
        id: Uuid,
        license_number: Option<String>,
        driver_status: Option<String>,
    ) -> AppResult<Driver>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct PgDriverRepository {
    pool: PgPool,
}

impl PgDriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DriverStore for PgDriverRepository {
    async fn create(&self, user_id: Uuid, license_number: String) -> AppResult<Driver> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (id, user_id, license_number, driver_status, created_at)
            VALUES ($1, $2, $3, 'active', $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(license_number)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    async fn find_with_user(&self, id: Uuid) -> AppResult<Option<DriverWithUser>> {
        let driver = sqlx::query_as::<_, DriverWithUser>(
            r#"
            SELECT d.id, d.user_id, d.license_number, d.driver_status, d.assigned_line_id,
                   u.full_name, u.email
            FROM drivers d
            JOIN users u ON u.id = d.user_id
            WHERE d.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    async fn exists_for_user(&self, user_id: Uuid) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM drivers WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    async fn list(&self) -> AppResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>("SELECT * FROM drivers ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(drivers)
    }

    async fn update(
        &self,
        id: Uuid,
        license_number: Option<String>,
        driver_status: Option<String>,
    ) -> AppResult<Driver> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET license_number = $2, driver_status = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(license_number.unwrap_or(current.license_number))
        .bind(driver_status.unwrap_or(current.driver_status))
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Conductor no encontrado".to_string()));
        }

        Ok(())
    }
}
