//! Controller de las operaciones del conductor: escaneo de tickets,
//! abordaje, inicio de viaje y broadcast de posición GPS

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::journey_dto::{
    ConfirmBoardingRequest, ScanTicketRequest, ScanTicketResponse, StartJourneyRequest,
    StartJourneyResponse, UpdateLocationRequest, UpdateLocationResponse,
};
use crate::dto::ticket_dto::TicketResponse;
use crate::models::ticket::{BoardingStatus, PaymentStatus, Ticket};
use crate::repositories::{
    NotificationStore, PgNotificationRepository, PgTicketRepository, PgUserRepository,
    PgVehicleRepository, TicketStore, UserStore, VehicleStore,
};
use crate::services::notification_service::NotificationService;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_coordinates;

pub struct JourneyController {
    tickets: Arc<dyn TicketStore>,
    vehicles: Arc<dyn VehicleStore>,
    notifier: NotificationService,
}

impl JourneyController {
    pub fn new(pool: PgPool) -> Self {
        Self::with_stores(
            Arc::new(PgTicketRepository::new(pool.clone())),
            Arc::new(PgVehicleRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgNotificationRepository::new(pool)),
        )
    }

    pub fn with_stores(
        tickets: Arc<dyn TicketStore>,
        vehicles: Arc<dyn VehicleStore>,
        users: Arc<dyn UserStore>,
        notifications: Arc<dyn NotificationStore>,
    ) -> Self {
        Self {
            notifier: NotificationService::new(notifications, users),
            tickets,
            vehicles,
        }
    }

    /// Valida un ticket escaneado contra el vehículo que escanea.
    /// Solo lectura: no transiciona ningún estado.
    pub async fn scan_ticket(
        &self,
        request: ScanTicketRequest,
    ) -> Result<ScanTicketResponse, AppError> {
        request.validate()?;

        let ticket = self
            .tickets
            .find_by_qr_code(&request.qr_code)
            .await?
            .filter(|t| t.payment_status == PaymentStatus::Completed.as_str())
            .ok_or_else(|| AppError::NotFound("Ticket no encontrado o sin pagar".to_string()))?;

        if ticket.vehicle_id != Some(request.vehicle_id) {
            return Err(AppError::Forbidden(
                "El ticket pertenece a otro vehículo".to_string(),
            ));
        }

        Ok(ScanTicketResponse {
            ticket: ticket.into(),
            valid: true,
        })
    }

    /// Confirma el abordaje de un ticket pagado y arranca su viaje
    pub async fn confirm_boarding(
        &self,
        request: ConfirmBoardingRequest,
    ) -> Result<ApiResponse<TicketResponse>, AppError> {
        let ticket = self
            .tickets
            .find_by_id(request.ticket_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ticket no encontrado".to_string()))?;

        if ticket.payment_status != PaymentStatus::Completed.as_str() {
            return Err(AppError::BadRequest("El ticket no está pagado".to_string()));
        }

        if ticket.boarding_status == BoardingStatus::Confirmed.as_str() {
            return Err(AppError::Conflict(
                "El abordaje ya fue confirmado".to_string(),
            ));
        }

        let ticket = self
            .tickets
            .confirm_boarding(request.ticket_id, Utc::now())
            .await?
            .ok_or_else(|| AppError::Conflict("El abordaje ya fue confirmado".to_string()))?;

        self.notifier
            .notify_passengers(
                std::slice::from_ref(&ticket),
                "Abordaje confirmado",
                &|t: &Ticket| {
                    format!(
                        "Tu abordaje quedó confirmado. Asiento {}. Buen viaje.",
                        t.seat_number
                    )
                },
            )
            .await;

        Ok(ApiResponse::success_with_message(
            ticket.into(),
            "Abordaje confirmado exitosamente".to_string(),
        ))
    }

    /// Arranca el viaje de todos los tickets pagados del vehículo y
    /// avisa a cada pasajero de forma aislada
    pub async fn start_journey(
        &self,
        request: StartJourneyRequest,
    ) -> Result<ApiResponse<StartJourneyResponse>, AppError> {
        self.vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let updated = self
            .tickets
            .start_journey_for_vehicle(request.vehicle_id)
            .await?;

        let passengers_notified = self
            .notifier
            .notify_passengers(&updated, "Viaje iniciado", &|t: &Ticket| {
                format!(
                    "Tu viaje del {} acaba de iniciar. Asiento {}.",
                    t.travel_date, t.seat_number
                )
            })
            .await;

        Ok(ApiResponse::success_with_message(
            StartJourneyResponse {
                tickets_updated: updated.len(),
                passengers_notified,
            },
            "Viaje iniciado".to_string(),
        ))
    }

    /// Broadcast de posición GPS: actualiza el vehículo y avisa a los
    /// pasajeros en viaje. Las notificaciones son best-effort.
    pub async fn update_location(
        &self,
        request: UpdateLocationRequest,
    ) -> Result<ApiResponse<UpdateLocationResponse>, AppError> {
        validate_coordinates(request.latitude, request.longitude)
            .map_err(|_| AppError::BadRequest("Coordenadas inválidas".to_string()))?;

        let vehicle = self
            .vehicles
            .update_location(
                request.vehicle_id,
                request.latitude,
                request.longitude,
                Utc::now(),
            )
            .await?;

        let in_progress = self
            .tickets
            .list_in_progress_for_vehicle(request.vehicle_id)
            .await?;

        let passengers_notified = self
            .notifier
            .notify_passengers(&in_progress, "Posición actualizada", &|_t: &Ticket| {
                format!(
                    "El vehículo {} actualizó su posición.",
                    vehicle.plate_number
                )
            })
            .await;

        Ok(ApiResponse::success(UpdateLocationResponse {
            vehicle_id: vehicle.id,
            latitude: request.latitude,
            longitude: request.longitude,
            passengers_notified,
        }))
    }
}
