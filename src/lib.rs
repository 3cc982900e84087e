//! Backend de ticketing de transporte en bus
//!
//! Plataforma multi-rol (admin/conductor/pasajero): gestión de rutas,
//! vehículos y conductores, reserva y pago de tickets, validación de
//! abordaje por QR, broadcast de posición GPS y notificaciones.

pub mod config;
pub mod state;
pub mod database;
pub mod models;
pub mod dto;
pub mod repositories;
pub mod services;
pub mod controllers;
pub mod middleware;
pub mod routes;
pub mod utils;
