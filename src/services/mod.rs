//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación:
//! resolución de tarifas, tokens QR, pagos mobile money,
//! notificaciones y verificación de JWT.

pub mod fare_service;
pub mod qr_service;
pub mod payment_service;
pub mod notification_service;
pub mod jwt_service;

pub use fare_service::{FareQuote, FareService};
pub use notification_service::NotificationService;
