//! Modelo de Ticket
//!
//! El ticket es el punto donde convergen pasajero, ruta, vehículo y
//! (opcionalmente) paradas. Lleva tres estados independientes: pago,
//! abordaje y viaje. Un comprador puede reservar para un viajero
//! distinto, por eso se capturan nombre/teléfono/email además de la
//! referencia al usuario.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado del pago del ticket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
        }
    }
}

/// Estado del abordaje
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BoardingStatus {
    Pending,
    Confirmed,
}

impl BoardingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardingStatus::Pending => "pending",
            BoardingStatus::Confirmed => "confirmed",
        }
    }
}

/// Estado del viaje, independiente del estado del pago
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JourneyStatus {
    Pending,
    InProgress,
    Completed,
}

impl JourneyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JourneyStatus::Pending => "pending",
            JourneyStatus::InProgress => "in_progress",
            JourneyStatus::Completed => "completed",
        }
    }
}

/// Ticket principal - mapea exactamente a la tabla tickets
///
/// Invariante: una vez payment_status = completed, amount_paid no se
/// vuelve a mutar (no existe flujo de reembolso).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub passenger_id: Option<Uuid>,
    pub passenger_name: String,
    pub passenger_phone: String,
    pub passenger_email: Option<String>,
    pub booked_by: Option<Uuid>,
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

/// Datos para insertar un ticket nuevo (estado inicial: todo pendiente)
///
/// El id se genera antes del INSERT porque el token QR se deriva de él.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub id: Uuid,
    pub passenger_id: Option<Uuid>,
    pub passenger_name: String,
    pub passenger_phone: String,
    pub passenger_email: Option<String>,
    pub booked_by: Option<Uuid>,
    pub route_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub start_stop_id: Option<Uuid>,
    pub end_stop_id: Option<Uuid>,
    pub actual_start_location: Option<String>,
    pub actual_end_location: Option<String>,
    pub travel_date: NaiveDate,
    pub seat_number: i32,
    pub amount_paid: Decimal,
    pub qr_code: String,
    pub booked_at: DateTime<Utc>,
}
