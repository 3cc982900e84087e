//! Repositorio de tickets
//!
//! Las transiciones de estado van con UPDATE condicionado al estado
//! previo, de modo que dos requests concurrentes no puedan aplicar la
//! misma transición dos veces.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::ticket::{NewTicket, Ticket};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn create(&self, ticket: NewTicket) -> AppResult<Ticket>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Ticket>>;

    async fn find_by_qr_code(&self, qr_code: &str) -> AppResult<Option<Ticket>>;

    /// Tickets comprados por el usuario o a su nombre
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Ticket>>;

    /// Transición pending → completed del pago. Devuelve None si el
    /// ticket no estaba pendiente (ya pagado o inexistente).
    async fn mark_paid(
        &self,
        id: Uuid,
        payment_method: &str,
        transaction_id: &str,
    ) -> AppResult<Option<Ticket>>;

    /// Confirma el abordaje de un ticket pagado y arranca su viaje.
    /// Devuelve None si el ticket no estaba en condiciones.
    async fn confirm_boarding(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<Option<Ticket>>;

    /// Transición masiva: todos los tickets pagados y aún pendientes
    /// del vehículo pasan a in_progress. Devuelve los afectados.
    async fn start_journey_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<Ticket>>;

    /// Tickets actualmente en viaje sobre el vehículo
    async fn list_in_progress_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<Ticket>>;
}

pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for PgTicketRepository {
    async fn create(&self, ticket: NewTicket) -> AppResult<Ticket> {
        let created = sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets (
                id, passenger_id, passenger_name, passenger_phone, passenger_email,
                booked_by, route_id, vehicle_id, start_stop_id, end_stop_id,
                actual_start_location, actual_end_location, travel_date, seat_number,
                amount_paid, payment_status, boarding_status, journey_status,
                qr_code, booked_at
            )
            VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                $11, $12, $13, $14,
                $15, 'pending', 'pending', 'pending',
                $16, $17
            )
            RETURNING *
            "#,
        )
        .bind(ticket.id)
        .bind(ticket.passenger_id)
        .bind(ticket.passenger_name)
        .bind(ticket.passenger_phone)
        .bind(ticket.passenger_email)
        .bind(ticket.booked_by)
        .bind(ticket.route_id)
        .bind(ticket.vehicle_id)
        .bind(ticket.start_stop_id)
        .bind(ticket.end_stop_id)
        .bind(ticket.actual_start_location)
        .bind(ticket.actual_end_location)
        .bind(ticket.travel_date)
        .bind(ticket.seat_number)
        .bind(ticket.amount_paid)
        .bind(ticket.qr_code)
        .bind(ticket.booked_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ticket)
    }

    async fn find_by_qr_code(&self, qr_code: &str) -> AppResult<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE qr_code = $1")
            .bind(qr_code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ticket)
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Ticket>> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE passenger_id = $1 OR booked_by = $1
            ORDER BY booked_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    async fn mark_paid(
        &self,
        id: Uuid,
        payment_method: &str,
        transaction_id: &str,
    ) -> AppResult<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets
            SET payment_status = 'completed', payment_method = $2, transaction_id = $3
            WHERE id = $1 AND payment_status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payment_method)
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn confirm_boarding(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets
            SET boarding_status = 'confirmed', journey_status = 'in_progress', boarded_at = $2
            WHERE id = $1 AND payment_status = 'completed' AND boarding_status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn start_journey_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<Ticket>> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets
            SET journey_status = 'in_progress'
            WHERE vehicle_id = $1 AND payment_status = 'completed' AND journey_status = 'pending'
            RETURNING *
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    async fn list_in_progress_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<Ticket>> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE vehicle_id = $1 AND journey_status = 'in_progress'
            ORDER BY booked_at ASC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }
}
