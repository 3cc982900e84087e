use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::ticket_controller::TicketController;
use crate::dto::common::ApiResponse;
use crate::dto::ticket_dto::{
    BookTicketRequest, BookTicketResponse, PayTicketRequest, PayTicketResponse, TicketResponse,
};
use crate::models::user::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_ticket_router() -> Router<AppState> {
    Router::new()
        .route("/book", post(book_ticket))
        .route("/pay", post(pay_ticket))
        .route("/", get(my_tickets))
        .route("/:id", get(get_ticket))
}

async fn book_ticket(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(request): Json<BookTicketRequest>,
) -> Result<Json<ApiResponse<BookTicketResponse>>, AppError> {
    let controller = TicketController::new(state.pool.clone());
    let response = controller.book(&auth_user, request).await?;
    Ok(Json(response))
}

async fn pay_ticket(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(request): Json<PayTicketRequest>,
) -> Result<Json<ApiResponse<PayTicketResponse>>, AppError> {
    let controller = TicketController::new(state.pool.clone());
    let response = controller.pay(&auth_user, request).await?;
    Ok(Json(response))
}

async fn my_tickets(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<TicketResponse>>, AppError> {
    let controller = TicketController::new(state.pool.clone());
    let response = controller.my_tickets(&auth_user).await?;
    Ok(Json(response))
}

async fn get_ticket(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<TicketResponse>, AppError> {
    let controller = TicketController::new(state.pool.clone());
    let response = controller.get_by_id(&auth_user, id).await?;
    Ok(Json(response))
}
