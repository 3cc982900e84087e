//! Repositorio de rutas y paradas

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::route::{Route, RouteStop};
use crate::utils::errors::{AppError, AppResult};

#[async_trait]
pub trait RouteStore: Send + Sync {
    async fn create_route(
        &self,
        name: String,
        start_location: String,
        end_location: String,
        base_fare: Decimal,
        company_name: Option<String>,
        scheduled_departure: Option<DateTime<Utc>>,
    ) -> AppResult<Route>;

    async fn find_route_by_id(&self, id: Uuid) -> AppResult<Option<Route>>;

    async fn list_routes(&self) -> AppResult<Vec<Route>>;

    async fn update_route(
        &self,
        id: Uuid,
        name: Option<String>,
        start_location: Option<String>,
        end_location: Option<String>,
        base_fare: Option<Decimal>,
        company_name: Option<String>,
        scheduled_departure: Option<DateTime<Utc>>,
    ) -> AppResult<Route>;

    /// Borra la ruta y sus paradas en una sola transacción
    async fn delete_route(&self, id: Uuid) -> AppResult<()>;

    async fn create_stop(
        &self,
        route_id: Uuid,
        stop_name: String,
        stop_order: i32,
        distance_from_start_km: Decimal,
        fare_from_start: Decimal,
    ) -> AppResult<RouteStop>;

    /// Paradas de la ruta ordenadas por stop_order ascendente
    async fn list_stops(&self, route_id: Uuid) -> AppResult<Vec<RouteStop>>;

    /// Las dos paradas de un par start/end, ya ordenadas por stop_order
    async fn find_stop_pair(&self, route_id: Uuid, a: Uuid, b: Uuid) -> AppResult<Vec<RouteStop>>;

    async fn update_stop(
        &self,
        stop_id: Uuid,
        stop_name: Option<String>,
        stop_order: Option<i32>,
        distance_from_start_km: Option<Decimal>,
        fare_from_start: Option<Decimal>,
    ) -> AppResult<RouteStop>;

    async fn delete_stop(&self, stop_id: Uuid) -> AppResult<()>;
}

pub struct PgRouteRepository {
    pool: PgPool,
}

impl PgRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RouteStore for PgRouteRepository {
    async fn create_route(
        &self,
        name: String,
        start_location: String,
        end_location: String,
        base_fare: Decimal,
        company_name: Option<String>,
        scheduled_departure: Option<DateTime<Utc>>,
    ) -> AppResult<Route> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (id, name, start_location, end_location, base_fare, company_name, scheduled_departure, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(start_location)
        .bind(end_location)
        .bind(base_fare)
        .bind(company_name)
        .bind(scheduled_departure)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(route)
    }

    async fn find_route_by_id(&self, id: Uuid) -> AppResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route)
    }

    async fn list_routes(&self) -> AppResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>("SELECT * FROM routes ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(routes)
    }

    async fn update_route(
        &self,
        id: Uuid,
        name: Option<String>,
        start_location: Option<String>,
        end_location: Option<String>,
        base_fare: Option<Decimal>,
        company_name: Option<String>,
        scheduled_departure: Option<DateTime<Utc>>,
    ) -> AppResult<Route> {
        let current = self
            .find_route_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET name = $2, start_location = $3, end_location = $4, base_fare = $5, company_name = $6, scheduled_departure = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name.unwrap_or(current.name))
        .bind(start_location.unwrap_or(current.start_location))
        .bind(end_location.unwrap_or(current.end_location))
        .bind(base_fare.unwrap_or(current.base_fare))
        .bind(company_name.or(current.company_name))
        .bind(scheduled_departure.or(current.scheduled_departure))
        .fetch_one(&self.pool)
        .await?;

        Ok(route)
    }

    async fn delete_route(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM route_stops WHERE route_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ruta no encontrada".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn create_stop(
        &self,
        route_id: Uuid,
        stop_name: String,
        stop_order: i32,
        distance_from_start_km: Decimal,
        fare_from_start: Decimal,
    ) -> AppResult<RouteStop> {
        let stop = sqlx::query_as::<_, RouteStop>(
            r#"
            INSERT INTO route_stops (id, route_id, stop_name, stop_order, distance_from_start_km, fare_from_start)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(route_id)
        .bind(stop_name)
        .bind(stop_order)
        .bind(distance_from_start_km)
        .bind(fare_from_start)
        .fetch_one(&self.pool)
        .await?;

        Ok(stop)
    }

    async fn list_stops(&self, route_id: Uuid) -> AppResult<Vec<RouteStop>> {
        let stops = sqlx::query_as::<_, RouteStop>(
            "SELECT * FROM route_stops WHERE route_id = $1 ORDER BY stop_order ASC",
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stops)
    }

    async fn find_stop_pair(&self, route_id: Uuid, a: Uuid, b: Uuid) -> AppResult<Vec<RouteStop>> {
        let stops = sqlx::query_as::<_, RouteStop>(
            r#"
            SELECT * FROM route_stops
            WHERE route_id = $1 AND id IN ($2, $3)
            ORDER BY stop_order ASC
            "#,
        )
        .bind(route_id)
        .bind(a)
        .bind(b)
        .fetch_all(&self.pool)
        .await?;

        Ok(stops)
    }

    async fn update_stop(
        &self,
        stop_id: Uuid,
        stop_name: Option<String>,
        stop_order: Option<i32>,
        distance_from_start_km: Option<Decimal>,
        fare_from_start: Option<Decimal>,
    ) -> AppResult<RouteStop> {
        let current = sqlx::query_as::<_, RouteStop>("SELECT * FROM route_stops WHERE id = $1")
            .bind(stop_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Parada no encontrada".to_string()))?;

        let stop = sqlx::query_as::<_, RouteStop>(
            r#"
            UPDATE route_stops
            SET stop_name = $2, stop_order = $3, distance_from_start_km = $4, fare_from_start = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(stop_id)
        .bind(stop_name.unwrap_or(current.stop_name))
        .bind(stop_order.unwrap_or(current.stop_order))
        .bind(distance_from_start_km.unwrap_or(current.distance_from_start_km))
        .bind(fare_from_start.unwrap_or(current.fare_from_start))
        .fetch_one(&self.pool)
        .await?;

        Ok(stop)
    }

    async fn delete_stop(&self, stop_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM route_stops WHERE id = $1")
            .bind(stop_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Parada no encontrada".to_string()));
        }

        Ok(())
    }
}
