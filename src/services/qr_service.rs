//! Tokens QR de abordaje
//!
//! El "QR" del ticket es un token opaco derivado determinísticamente
//! del ticket, el vehículo, la ruta y el momento de la reserva. El
//! conductor lo escanea para validar el abordaje; no hay codificación
//! QR real en el backend.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Deriva el token QR del ticket: hash MD5 del payload, en hexadecimal
/// mayúsculas (32 caracteres). Un vehículo desconocido entra como UUID
/// nulo.
pub fn derive_qr_token(
    ticket_id: Uuid,
    vehicle_id: Option<Uuid>,
    route_id: Uuid,
    booked_at: DateTime<Utc>,
) -> String {
    let payload = format!(
        "{}:{}:{}:{}",
        ticket_id,
        vehicle_id.unwrap_or_else(Uuid::nil),
        route_id,
        booked_at.to_rfc3339()
    );

    let digest = md5::compute(payload.as_bytes());
    digest.0.iter().map(|b| format!("{:02X}", b)).collect()
}
