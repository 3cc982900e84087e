use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::assignment_controller::AssignmentController;
use crate::controllers::route_controller::RouteController;
use crate::dto::assignment_dto::{
    AssignDriverRequest, AssignVehicleRequest, DriverRouteAssignmentResponse,
    VehicleRouteAssignmentResponse,
};
use crate::dto::common::ApiResponse;
use crate::dto::route_dto::{
    CreateRouteRequest, CreateStopRequest, RouteResponse, RouteStopResponse,
    RouteWithStopsResponse, UpdateRouteRequest, UpdateStopRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_route))
        .route("/", get(list_routes))
        .route("/:id", get(get_route))
        .route("/:id", put(update_route))
        .route("/:id", delete(delete_route))
        .route("/:id/stops", post(add_stop))
        .route("/:id/stops/:stop_id", put(update_stop))
        .route("/:id/stops/:stop_id", delete(delete_stop))
        .route("/:id/assign-driver", post(assign_driver))
        .route("/:id/assign-vehicle", put(assign_vehicle))
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_routes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteWithStopsResponse>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Ruta eliminada exitosamente"
    })))
}

async fn add_stop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateStopRequest>,
) -> Result<Json<ApiResponse<RouteStopResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.add_stop(id, request).await?;
    Ok(Json(response))
}

async fn update_stop(
    State(state): State<AppState>,
    Path((id, stop_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateStopRequest>,
) -> Result<Json<ApiResponse<RouteStopResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    let response = controller.update_stop(id, stop_id, request).await?;
    Ok(Json(response))
}

async fn delete_stop(
    State(state): State<AppState>,
    Path((_id, stop_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    controller.delete_stop(stop_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Parada eliminada exitosamente"
    })))
}

async fn assign_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignDriverRequest>,
) -> Result<Json<ApiResponse<DriverRouteAssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(state.pool.clone());
    let response = controller.assign_driver_to_route(id, request.driver_id).await?;
    Ok(Json(response))
}

async fn assign_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleRouteAssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(state.pool.clone());
    let response = controller
        .assign_vehicle_to_route(id, request.vehicle_id)
        .await?;
    Ok(Json(response))
}
