//! Controller del ciclo de vida del ticket: reserva y pago

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::ticket_dto::{
    BookTicketRequest, BookTicketResponse, FareDetails, PayTicketRequest, PayTicketResponse,
    TicketResponse,
};
use crate::models::ticket::{NewTicket, PaymentStatus, Ticket};
use crate::models::user::AuthUser;
use crate::repositories::{
    NotificationStore, PgNotificationRepository, PgRouteRepository, PgTicketRepository,
    PgUserRepository, PgVehicleRepository, RouteStore, TicketStore, UserStore, VehicleStore,
};
use crate::services::notification_service::NotificationService;
use crate::services::payment_service;
use crate::services::qr_service;
use crate::services::FareService;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_seat_number;

pub struct TicketController {
    tickets: Arc<dyn TicketStore>,
    vehicles: Arc<dyn VehicleStore>,
    users: Arc<dyn UserStore>,
    fare: FareService,
    notifier: NotificationService,
}

impl TicketController {
    pub fn new(pool: PgPool) -> Self {
        Self::with_stores(
            Arc::new(PgRouteRepository::new(pool.clone())),
            Arc::new(PgTicketRepository::new(pool.clone())),
            Arc::new(PgVehicleRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgNotificationRepository::new(pool)),
        )
    }

    pub fn with_stores(
        routes: Arc<dyn RouteStore>,
        tickets: Arc<dyn TicketStore>,
        vehicles: Arc<dyn VehicleStore>,
        users: Arc<dyn UserStore>,
        notifications: Arc<dyn NotificationStore>,
    ) -> Self {
        Self {
            fare: FareService::new(routes),
            notifier: NotificationService::new(notifications, users.clone()),
            tickets,
            vehicles,
            users,
        }
    }

    /// Reserva un ticket en estado pendiente de pago. La tarifa sale
    /// del resolver de tarifas; el QR se deriva del propio ticket.
    pub async fn book(
        &self,
        auth_user: &AuthUser,
        request: BookTicketRequest,
    ) -> Result<ApiResponse<BookTicketResponse>, AppError> {
        request.validate()?;

        // Si se indicó vehículo, debe existir y el asiento caber en él
        if let Some(vehicle_id) = request.vehicle_id {
            let vehicle = self
                .vehicles
                .find_by_id(vehicle_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

            validate_seat_number(request.seat_number, vehicle.capacity)
                .map_err(|_| AppError::BadRequest("Número de asiento inválido".to_string()))?;
        }

        let quote = self
            .fare
            .resolve(request.route_id, request.start_stop_id, request.end_stop_id)
            .await?;

        // El viajero puede no ser el comprador: su cuenta se resuelve
        // por el teléfono o el email capturados, si existe
        let passenger_id = self
            .resolve_traveler_account(&request.passenger_phone, request.passenger_email.as_deref())
            .await?;

        let ticket_id = Uuid::new_v4();
        let booked_at = Utc::now();
        let qr_code =
            qr_service::derive_qr_token(ticket_id, request.vehicle_id, request.route_id, booked_at);

        let ticket = self
            .tickets
            .create(NewTicket {
                id: ticket_id,
                passenger_id,
                passenger_name: request.passenger_name,
                passenger_phone: request.passenger_phone,
                passenger_email: request.passenger_email,
                booked_by: Some(auth_user.user_id),
                route_id: request.route_id,
                vehicle_id: request.vehicle_id,
                start_stop_id: request.start_stop_id,
                end_stop_id: request.end_stop_id,
                actual_start_location: Some(quote.start_location.clone()),
                actual_end_location: Some(quote.end_location.clone()),
                travel_date: request.travel_date,
                seat_number: request.seat_number,
                amount_paid: quote.amount,
                qr_code,
                booked_at,
            })
            .await?;

        self.notifier
            .notify(
                auth_user.user_id,
                "Ticket reservado",
                &format!(
                    "Reservaste un ticket {} - {} para el {}. Asiento {}. Monto a pagar: {}.",
                    quote.start_location,
                    quote.end_location,
                    ticket.travel_date,
                    ticket.seat_number,
                    quote.amount
                ),
            )
            .await?;

        let response = BookTicketResponse {
            fare: FareDetails {
                amount: quote.amount,
                distance_km: quote.distance_km,
                start_location: quote.start_location,
                end_location: quote.end_location,
            },
            ticket: ticket.into(),
        };

        Ok(ApiResponse::success_with_message(
            response,
            "Ticket reservado exitosamente. Proceda al pago.".to_string(),
        ))
    }

    /// Paga un ticket pendiente via mobile money simulado
    pub async fn pay(
        &self,
        auth_user: &AuthUser,
        request: PayTicketRequest,
    ) -> Result<ApiResponse<PayTicketResponse>, AppError> {
        payment_service::validate_momo_phone(&request.phone_number)?;

        let ticket = self
            .tickets
            .find_by_id(request.ticket_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ticket no encontrado".to_string()))?;

        self.ensure_owned(auth_user, &ticket)?;

        if ticket.payment_status == PaymentStatus::Completed.as_str() {
            return Err(AppError::Conflict("El ticket ya fue pagado".to_string()));
        }

        let payment_method = payment_service::payment_method_for(&request.phone_number);
        let transaction_id = payment_service::generate_transaction_id();

        let ticket = self
            .tickets
            .mark_paid(request.ticket_id, payment_method, &transaction_id)
            .await?
            .ok_or_else(|| AppError::Conflict("El ticket ya fue pagado".to_string()))?;

        let loyalty_points_awarded = self.award_loyalty(&ticket).await;
        let buyer_id = ticket.booked_by.unwrap_or(auth_user.user_id);

        // El viajero recibe la confirmación; si el comprador es otra
        // cuenta, también se le avisa
        match self.notifier.resolve_passenger(&ticket).await {
            Ok(Some(passenger)) => {
                if let Err(e) = self
                    .notifier
                    .notify(
                        passenger.id,
                        "Pago confirmado",
                        &format!(
                            "Tu ticket para el {} quedó pagado. Transacción {}.",
                            ticket.travel_date, transaction_id
                        ),
                    )
                    .await
                {
                    warn!(ticket_id = %ticket.id, "no se pudo notificar al viajero: {}", e);
                }

                if passenger.id != buyer_id {
                    if let Err(e) = self
                        .notifier
                        .notify(
                            buyer_id,
                            "Pago confirmado",
                            &format!(
                                "El pago del ticket de {} quedó confirmado. Transacción {}.",
                                ticket.passenger_name, transaction_id
                            ),
                        )
                        .await
                    {
                        warn!(ticket_id = %ticket.id, "no se pudo notificar al comprador: {}", e);
                    }
                }
            }
            Ok(None) => {
                warn!(ticket_id = %ticket.id, "el viajero no tiene cuenta, se omite la notificación");
            }
            Err(e) => {
                warn!(ticket_id = %ticket.id, "no se pudo resolver al viajero: {}", e);
            }
        }

        let response = PayTicketResponse {
            transaction_id,
            payment_method: payment_method.to_string(),
            loyalty_points_awarded,
            ticket: ticket.into(),
        };

        Ok(ApiResponse::success_with_message(
            response,
            "Pago procesado exitosamente".to_string(),
        ))
    }

    pub async fn my_tickets(&self, auth_user: &AuthUser) -> Result<Vec<TicketResponse>, AppError> {
        let tickets = self.tickets.list_by_user(auth_user.user_id).await?;
        Ok(tickets.into_iter().map(TicketResponse::from).collect())
    }

    pub async fn get_by_id(
        &self,
        auth_user: &AuthUser,
        id: Uuid,
    ) -> Result<TicketResponse, AppError> {
        let ticket = self
            .tickets
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ticket no encontrado".to_string()))?;

        self.ensure_owned(auth_user, &ticket)?;

        Ok(ticket.into())
    }

    async fn resolve_traveler_account(
        &self,
        phone: &str,
        email: Option<&str>,
    ) -> Result<Option<Uuid>, AppError> {
        if let Some(user) = self.users.find_by_phone(phone).await? {
            return Ok(Some(user.id));
        }

        if let Some(email) = email {
            if let Some(user) = self.users.find_by_email(email).await? {
                return Ok(Some(user.id));
            }
        }

        Ok(None)
    }

    fn ensure_owned(&self, auth_user: &AuthUser, ticket: &Ticket) -> Result<(), AppError> {
        let is_owner = ticket.passenger_id == Some(auth_user.user_id)
            || ticket.booked_by == Some(auth_user.user_id);

        if !is_owner {
            return Err(AppError::Forbidden(
                "No tienes permiso para acceder a este ticket".to_string(),
            ));
        }
        Ok(())
    }

    /// La acreditación de puntos es best-effort: el pago ya quedó
    /// confirmado y no se revierte por esto.
    async fn award_loyalty(&self, ticket: &Ticket) -> i32 {
        let points = payment_service::loyalty_points_for(ticket.amount_paid);
        if points == 0 {
            return 0;
        }

        match self.notifier.resolve_passenger(ticket).await {
            Ok(Some(passenger)) => match self.users.add_loyalty_points(passenger.id, points).await {
                Ok(()) => points,
                Err(e) => {
                    warn!(ticket_id = %ticket.id, "no se pudieron acreditar los puntos: {}", e);
                    0
                }
            },
            _ => 0,
        }
    }
}
