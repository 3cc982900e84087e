pub mod route_routes;
pub mod vehicle_routes;
pub mod driver_routes;
pub mod ticket_routes;
pub mod journey_routes;
pub mod notification_routes;
