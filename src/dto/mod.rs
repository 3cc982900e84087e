//! DTOs de la API
//!
//! Requests y responses que viajan por HTTP. Los modelos de dominio
//! viven en models/; aquí solo está la capa de transporte.

pub mod common;
pub mod route_dto;
pub mod vehicle_dto;
pub mod driver_dto;
pub mod ticket_dto;
pub mod journey_dto;
pub mod assignment_dto;
pub mod notification_dto;
