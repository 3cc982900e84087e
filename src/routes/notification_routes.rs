use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::notification_controller::NotificationController;
use crate::dto::common::ApiResponse;
use crate::dto::notification_dto::NotificationResponse;
use crate::models::user::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_notification_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/:id/read", put(mark_read))
}

async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let controller = NotificationController::new(state.pool.clone());
    let response = controller.list(&auth_user).await?;
    Ok(Json(response))
}

async fn mark_read(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NotificationResponse>>, AppError> {
    let controller = NotificationController::new(state.pool.clone());
    let response = controller.mark_read(&auth_user, id).await?;
    Ok(Json(response))
}
