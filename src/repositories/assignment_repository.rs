//! Propagación de asignaciones conductor/vehículo/ruta
//!
//! Cada operación aplica todas sus escrituras (incluida la
//! notificación al conductor) dentro de UNA transacción. Si cualquier
//! paso falla, la transacción se descarta entera: un vehículo
//! actualizado sin la ruta propagada al conductor sería un bug de
//! consistencia.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::driver::DriverWithUser;
use crate::models::route::Route;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::{AppError, AppResult};

/// Resultado de asignar un conductor a un vehículo
#[derive(Debug, Clone)]
pub struct DriverVehicleAssignment {
    pub vehicle: Vehicle,
    pub driver_user_id: Uuid,
    /// Ruta del vehículo que se propagó al conductor, si la había
    pub propagated_route_id: Option<Uuid>,
}

/// Resultado de asignar un conductor a una ruta
#[derive(Debug, Clone)]
pub struct DriverRouteAssignment {
    pub route: Route,
    pub driver_user_id: Uuid,
}

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Vincula el conductor al vehículo. Si el vehículo ya tiene ruta
    /// asignada, esa ruta se propaga también al conductor (la ruta del
    /// vehículo manda sobre la del conductor). Notifica al conductor.
    async fn assign_driver_to_vehicle(
        &self,
        vehicle_id: Uuid,
        driver_id: Uuid,
    ) -> AppResult<DriverVehicleAssignment>;

    /// Fija el conductor asignado de la ruta y notifica al conductor.
    async fn assign_driver_to_route(
        &self,
        route_id: Uuid,
        driver_id: Uuid,
    ) -> AppResult<DriverRouteAssignment>;

    /// Fija el vehículo asignado de la ruta. Se verifica primero el
    /// vehículo y después la ruta. Sin notificación.
    async fn assign_vehicle_to_route(&self, route_id: Uuid, vehicle_id: Uuid) -> AppResult<Route>;
}

pub struct PgAssignmentRepository {
    pool: PgPool,
}

impl PgAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentStore for PgAssignmentRepository {
    async fn assign_driver_to_vehicle(
        &self,
        vehicle_id: Uuid,
        driver_id: Uuid,
    ) -> AppResult<DriverVehicleAssignment> {
        let mut tx = self.pool.begin().await?;

        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
            .bind(vehicle_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let driver = sqlx::query_as::<_, DriverWithUser>(
            r#"
            SELECT d.id, d.user_id, d.license_number, d.driver_status, d.assigned_line_id,
                   u.full_name, u.email
            FROM drivers d
            JOIN users u ON u.id = d.user_id
            WHERE d.id = $1
            "#,
        )
        .bind(driver_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET assigned_driver_id = $2 WHERE id = $1 RETURNING *",
        )
        .bind(vehicle_id)
        .bind(driver_id)
        .fetch_one(&mut *tx)
        .await?;

        // La ruta del vehículo manda: se propaga al conductor
        let propagated_route_id = vehicle.assigned_route_id;
        if let Some(route_id) = propagated_route_id {
            sqlx::query("UPDATE drivers SET assigned_line_id = $2 WHERE id = $1")
                .bind(driver_id)
                .bind(route_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, title, message, is_read, created_at)
            VALUES ($1, $2, $3, $4, false, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(driver.user_id)
        .bind("Nuevo vehículo asignado")
        .bind(format!(
            "Se te asignó el vehículo {}. Revisa tu ruta antes de salir.",
            vehicle.plate_number
        ))
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DriverVehicleAssignment {
            vehicle,
            driver_user_id: driver.user_id,
            propagated_route_id,
        })
    }

    async fn assign_driver_to_route(
        &self,
        route_id: Uuid,
        driver_id: Uuid,
    ) -> AppResult<DriverRouteAssignment> {
        let mut tx = self.pool.begin().await?;

        let driver = sqlx::query_as::<_, DriverWithUser>(
            r#"
            SELECT d.id, d.user_id, d.license_number, d.driver_status, d.assigned_line_id,
                   u.full_name, u.email
            FROM drivers d
            JOIN users u ON u.id = d.user_id
            WHERE d.id = $1
            "#,
        )
        .bind(driver_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        let route = sqlx::query_as::<_, Route>(
            "UPDATE routes SET assigned_driver_id = $2 WHERE id = $1 RETURNING *",
        )
        .bind(route_id)
        .bind(driver_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, title, message, is_read, created_at)
            VALUES ($1, $2, $3, $4, false, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(driver.user_id)
        .bind("Nueva ruta asignada")
        .bind(format!(
            "Se te asignó la ruta {} ({} - {}).",
            route.name, route.start_location, route.end_location
        ))
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DriverRouteAssignment {
            route,
            driver_user_id: driver.user_id,
        })
    }

    async fn assign_vehicle_to_route(&self, route_id: Uuid, vehicle_id: Uuid) -> AppResult<Route> {
        let mut tx = self.pool.begin().await?;

        // El vehículo se verifica primero, después la ruta
        let vehicle_exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE id = $1)")
                .bind(vehicle_id)
                .fetch_one(&mut *tx)
                .await?;

        if !vehicle_exists.0 {
            return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
        }

        let route = sqlx::query_as::<_, Route>(
            "UPDATE routes SET assigned_vehicle_id = $2 WHERE id = $1 RETURNING *",
        )
        .bind(route_id)
        .bind(vehicle_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        tx.commit().await?;

        Ok(route)
    }
}
