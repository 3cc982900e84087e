//! Capa de acceso a datos
//!
//! Cada repositorio expone un trait de almacenamiento y su
//! implementación PostgreSQL. Los controllers reciben el trait, lo que
//! permite sustituirlo por un fake en memoria en los tests de
//! integración.

pub mod route_repository;
pub mod vehicle_repository;
pub mod driver_repository;
pub mod user_repository;
pub mod ticket_repository;
pub mod notification_repository;
pub mod assignment_repository;

pub use route_repository::{PgRouteRepository, RouteStore};
pub use vehicle_repository::{PgVehicleRepository, VehicleStore};
pub use driver_repository::{DriverStore, PgDriverRepository};
pub use user_repository::{PgUserRepository, UserStore};
pub use ticket_repository::{PgTicketRepository, TicketStore};
pub use notification_repository::{NotificationStore, PgNotificationRepository};
pub use assignment_repository::{
    AssignmentStore, DriverRouteAssignment, DriverVehicleAssignment, PgAssignmentRepository,
};
