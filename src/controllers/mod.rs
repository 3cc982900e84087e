//! Controllers de la API
//!
//! Cada controller valida el request, orquesta repositorios y
//! servicios, y arma la respuesta. Los handlers de routes/ son solo
//! pegamento HTTP.

pub mod ticket_controller;
pub mod journey_controller;
pub mod assignment_controller;
pub mod route_controller;
pub mod vehicle_controller;
pub mod driver_controller;
pub mod notification_controller;
