//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod user;
pub mod route;
pub mod vehicle;
pub mod driver;
pub mod ticket;
pub mod notification;
