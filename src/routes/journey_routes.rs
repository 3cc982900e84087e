use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::journey_controller::JourneyController;
use crate::dto::common::ApiResponse;
use crate::dto::journey_dto::{
    ConfirmBoardingRequest, ScanTicketRequest, ScanTicketResponse, StartJourneyRequest,
    StartJourneyResponse, UpdateLocationRequest, UpdateLocationResponse,
};
use crate::dto::ticket_dto::TicketResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_journey_router() -> Router<AppState> {
    Router::new()
        .route("/scan-ticket", post(scan_ticket))
        .route("/confirm-boarding", post(confirm_boarding))
        .route("/start-journey", post(start_journey))
        .route("/update-location", post(update_location))
}

async fn scan_ticket(
    State(state): State<AppState>,
    Json(request): Json<ScanTicketRequest>,
) -> Result<Json<ScanTicketResponse>, AppError> {
    let controller = JourneyController::new(state.pool.clone());
    let response = controller.scan_ticket(request).await?;
    Ok(Json(response))
}

async fn confirm_boarding(
    State(state): State<AppState>,
    Json(request): Json<ConfirmBoardingRequest>,
) -> Result<Json<ApiResponse<TicketResponse>>, AppError> {
    let controller = JourneyController::new(state.pool.clone());
    let response = controller.confirm_boarding(request).await?;
    Ok(Json(response))
}

async fn start_journey(
    State(state): State<AppState>,
    Json(request): Json<StartJourneyRequest>,
) -> Result<Json<ApiResponse<StartJourneyResponse>>, AppError> {
    let controller = JourneyController::new(state.pool.clone());
    let response = controller.start_journey(request).await?;
    Ok(Json(response))
}

async fn update_location(
    State(state): State<AppState>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<ApiResponse<UpdateLocationResponse>>, AppError> {
    let controller = JourneyController::new(state.pool.clone());
    let response = controller.update_location(request).await?;
    Ok(Json(response))
}
