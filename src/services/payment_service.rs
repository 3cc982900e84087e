//! Pago simulado via mobile money
//!
//! El número de teléfono debe pertenecer a un prefijo de telecom
//! conocido (MTN 078/079, Airtel 072/073). El "pago" genera un
//! identificador de transacción; no hay integración real con el
//! agregador.

use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::utils::errors::{AppError, AppResult};

lazy_static! {
    static ref MOMO_PHONE_RE: Regex = Regex::new(r"^07[2389]\d{7}$").unwrap();
}

/// Valida el formato del teléfono mobile money
pub fn validate_momo_phone(phone: &str) -> AppResult<()> {
    if !MOMO_PHONE_RE.is_match(phone) {
        return Err(AppError::BadRequest(
            "Formato de teléfono inválido. Use un número 07XXXXXXXX de MTN o Airtel".to_string(),
        ));
    }
    Ok(())
}

/// Deduce el método de pago a partir del prefijo del teléfono.
/// Asume un teléfono ya validado.
pub fn payment_method_for(phone: &str) -> &'static str {
    match &phone[..3] {
        "078" | "079" => "mtn_momo",
        _ => "airtel_money",
    }
}

/// Genera un identificador de transacción: "MM" + 10 dígitos
pub fn generate_transaction_id() -> String {
    let mut rng = rand::thread_rng();
    let digits: String = (0..10).map(|_| rng.gen_range(0..10).to_string()).collect();
    format!("MM{}", digits)
}

/// Puntos de fidelidad que otorga un pago: 1 punto por cada 100 de
/// tarifa, redondeando hacia abajo
pub fn loyalty_points_for(amount: Decimal) -> i32 {
    let points = (amount / Decimal::from(100)).floor();
    points.to_i32().unwrap_or(0)
}
