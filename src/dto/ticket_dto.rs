//! DTOs del ciclo de vida del ticket (reserva y pago)

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::ticket::Ticket;

/// Request para reservar un ticket
///
/// El comprador puede reservar para otra persona: los datos del
/// viajero se capturan aparte de la cuenta autenticada.
#[derive(Debug, Deserialize, Validate)]
pub struct BookTicketRequest {
    pub route_id: Uuid,

    pub vehicle_id: Option<Uuid>,

    pub start_stop_id: Option<Uuid>,

    pub end_stop_id: Option<Uuid>,

    #[validate(length(min = 2, max = 100))]
    pub passenger_name: String,

    #[validate(length(min = 10, max = 15))]
    pub passenger_phone: String,

    #[validate(email)]
    pub passenger_email: Option<String>,

    pub travel_date: NaiveDate,

    #[validate(range(min = 1))]
    pub seat_number: i32,
}

/// Request para pagar un ticket via mobile money
#[derive(Debug, Deserialize, Validate)]
pub struct PayTicketRequest {
    pub ticket_id: Uuid,

    #[validate(length(min = 10, max = 10))]
    pub phone_number: String,
}

/// Response de ticket para la API
#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub id: Uuid,
    pub passenger_id: Option<Uuid>,
    pub passenger_name: String,
    pub passenger_phone: String,
    pub passenger_email: Option<String>,
    pub route_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub start_stop_id: Option<Uuid>,
    pub end_stop_id: Option<Uuid>,
    pub actual_start_location: Option<String>,
    pub actual_end_location: Option<String>,
    pub travel_date: NaiveDate,
    pub seat_number: i32,
    pub amount_paid: Decimal,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub boarding_status: String,
    pub journey_status: String,
    pub qr_code: String,
    pub booked_at: DateTime<Utc>,
    pub boarded_at: Option<DateTime<Utc>>,
}

/// Detalle de la tarifa calculada al reservar
#[derive(Debug, Serialize)]
pub struct FareDetails {
    pub amount: Decimal,
    pub distance_km: Option<Decimal>,
    pub start_location: String,
    pub end_location: String,
}

/// Response de la reserva: ticket + detalle de tarifa
#[derive(Debug, Serialize)]
pub struct BookTicketResponse {
    pub ticket: TicketResponse,
    pub fare: FareDetails,
}

/// Response del pago
#[derive(Debug, Serialize)]
pub struct PayTicketResponse {
    pub ticket: TicketResponse,
    pub transaction_id: String,
    pub payment_method: String,
    pub loyalty_points_awarded: i32,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            passenger_id: ticket.passenger_id,
            passenger_name: ticket.passenger_name,
            passenger_phone: ticket.passenger_phone,
            passenger_email: ticket.passenger_email,
            route_id: ticket.route_id,
            vehicle_id: ticket.vehicle_id,
            start_stop_id: ticket.start_stop_id,
            end_stop_id: ticket.end_stop_id,
            actual_start_location: ticket.actual_start_location,
            actual_end_location: ticket.actual_end_location,
            travel_date: ticket.travel_date,
            seat_number: ticket.seat_number,
            amount_paid: ticket.amount_paid,
            payment_status: ticket.payment_status,
            payment_method: ticket.payment_method,
            transaction_id: ticket.transaction_id,
            boarding_status: ticket.boarding_status,
            journey_status: ticket.journey_status,
            qr_code: ticket.qr_code,
            booked_at: ticket.booked_at,
            boarded_at: ticket.boarded_at,
        }
    }
}
