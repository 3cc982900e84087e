//! Módulo de base de datos
//!
//! Maneja la conexión y la verificación del schema en PostgreSQL

pub mod connection;

pub use connection::DatabaseConnection;
