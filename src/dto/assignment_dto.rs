//! DTOs de las operaciones de asignación conductor/vehículo/ruta

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::route_dto::RouteResponse;
use super::vehicle_dto::VehicleResponse;

/// Request para asignar un conductor (a un vehículo o a una ruta)
#[derive(Debug, Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Uuid,
}

/// Request para asignar un vehículo a una ruta
#[derive(Debug, Deserialize)]
pub struct AssignVehicleRequest {
    pub vehicle_id: Uuid,
}

/// Response de la asignación conductor→vehículo
///
/// propagated_route_id indica si la ruta del vehículo se propagó
/// también al conductor.
#[derive(Debug, Serialize)]
pub struct DriverVehicleAssignmentResponse {
    pub vehicle: VehicleResponse,
    pub driver_id: Uuid,
    pub propagated_route_id: Option<Uuid>,
}

/// Response de la asignación conductor→ruta
#[derive(Debug, Serialize)]
pub struct DriverRouteAssignmentResponse {
    pub route: RouteResponse,
    pub driver_id: Uuid,
}

/// Response de la asignación vehículo→ruta
#[derive(Debug, Serialize)]
pub struct VehicleRouteAssignmentResponse {
    pub route: RouteResponse,
    pub vehicle_id: Uuid,
}
