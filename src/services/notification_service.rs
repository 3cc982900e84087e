//! Notificaciones
//!
//! Inserta filas en la tabla notifications y resuelve la cuenta del
//! viajero de un ticket. Los broadcasts (inicio de viaje, posición
//! GPS) notifican a cada pasajero de forma aislada: el fallo de uno no
//! interrumpe al resto, solo queda fuera del conteo.

use std::sync::Arc;

use futures::future::join_all;
use tracing::warn;
use uuid::Uuid;

use crate::models::notification::Notification;
use crate::models::ticket::Ticket;
use crate::models::user::User;
use crate::repositories::{NotificationStore, UserStore};
use crate::utils::errors::AppResult;

pub struct NotificationService {
    notifications: Arc<dyn NotificationStore>,
    users: Arc<dyn UserStore>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationStore>, users: Arc<dyn UserStore>) -> Self {
        Self {
            notifications,
            users,
        }
    }

    pub async fn notify(
        &self,
        user_id: Uuid,
        title: &str,
        message: &str,
    ) -> AppResult<Notification> {
        self.notifications.create(user_id, title, message).await
    }

    /// Resuelve la cuenta del viajero del ticket: por id de pasajero,
    /// si no por teléfono, si no por email.
    pub async fn resolve_passenger(&self, ticket: &Ticket) -> AppResult<Option<User>> {
        if let Some(passenger_id) = ticket.passenger_id {
            if let Some(user) = self.users.find_by_id(passenger_id).await? {
                return Ok(Some(user));
            }
        }

        if let Some(user) = self.users.find_by_phone(&ticket.passenger_phone).await? {
            return Ok(Some(user));
        }

        if let Some(email) = &ticket.passenger_email {
            if let Some(user) = self.users.find_by_email(email).await? {
                return Ok(Some(user));
            }
        }

        Ok(None)
    }

    /// Notifica al viajero de cada ticket. Cada intento es
    /// independiente: si uno falla se registra y se sigue con el resto.
    /// Devuelve cuántos pasajeros recibieron su notificación.
    pub async fn notify_passengers(
        &self,
        tickets: &[Ticket],
        title: &str,
        message_for: &(dyn Fn(&Ticket) -> String + Sync),
    ) -> usize {
        let attempts = tickets.iter().map(|ticket| async move {
            match self.resolve_passenger(ticket).await {
                Ok(Some(user)) => {
                    match self
                        .notifications
                        .create(user.id, title, &message_for(ticket))
                        .await
                    {
                        Ok(_) => true,
                        Err(e) => {
                            warn!(ticket_id = %ticket.id, "no se pudo notificar al pasajero: {}", e);
                            false
                        }
                    }
                }
                Ok(None) => {
                    warn!(
                        ticket_id = %ticket.id,
                        "el viajero del ticket no tiene cuenta, se omite la notificación"
                    );
                    false
                }
                Err(e) => {
                    warn!(ticket_id = %ticket.id, "no se pudo resolver al pasajero: {}", e);
                    false
                }
            }
        });

        join_all(attempts).await.into_iter().filter(|ok| *ok).count()
    }
}
