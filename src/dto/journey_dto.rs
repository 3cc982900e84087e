//! DTOs de las operaciones del conductor (abordaje, viaje, GPS)

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::ticket_dto::TicketResponse;

/// Request para validar un ticket escaneando su QR
#[derive(Debug, Deserialize, Validate)]
pub struct ScanTicketRequest {
    #[validate(length(min = 32, max = 32))]
    pub qr_code: String,

    pub vehicle_id: Uuid,
}

/// Request para confirmar el abordaje de un ticket
#[derive(Debug, Deserialize)]
pub struct ConfirmBoardingRequest {
    pub ticket_id: Uuid,
}

/// Request para iniciar el viaje de un vehículo completo
#[derive(Debug, Deserialize)]
pub struct StartJourneyRequest {
    pub vehicle_id: Uuid,
}

/// Request del broadcast de posición GPS
#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub vehicle_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
}

/// Response del escaneo: el ticket validado
#[derive(Debug, Serialize)]
pub struct ScanTicketResponse {
    pub ticket: TicketResponse,
    pub valid: bool,
}

/// Response del inicio de viaje, con conteos de éxito parcial
#[derive(Debug, Serialize)]
pub struct StartJourneyResponse {
    pub tickets_updated: usize,
    pub passengers_notified: usize,
}

/// Response del broadcast de posición
#[derive(Debug, Serialize)]
pub struct UpdateLocationResponse {
    pub vehicle_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub passengers_notified: usize,
}
