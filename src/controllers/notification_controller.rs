//! Controller de notificaciones del usuario autenticado

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::ApiResponse;
use crate::dto::notification_dto::NotificationResponse;
use crate::models::user::AuthUser;
use crate::repositories::{NotificationStore, PgNotificationRepository};
use crate::utils::errors::AppError;

pub struct NotificationController {
    notifications: Arc<dyn NotificationStore>,
}

impl NotificationController {
    pub fn new(pool: PgPool) -> Self {
        Self::with_stores(Arc::new(PgNotificationRepository::new(pool)))
    }

    pub fn with_stores(notifications: Arc<dyn NotificationStore>) -> Self {
        Self { notifications }
    }

    pub async fn list(&self, auth_user: &AuthUser) -> Result<Vec<NotificationResponse>, AppError> {
        let notifications = self.notifications.list_for_user(auth_user.user_id).await?;
        Ok(notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect())
    }

    pub async fn mark_read(
        &self,
        auth_user: &AuthUser,
        id: Uuid,
    ) -> Result<ApiResponse<NotificationResponse>, AppError> {
        let notification = self
            .notifications
            .mark_read(id, auth_user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notificación no encontrada".to_string()))?;

        Ok(ApiResponse::success_with_message(
            notification.into(),
            "Notificación marcada como leída".to_string(),
        ))
    }
}
