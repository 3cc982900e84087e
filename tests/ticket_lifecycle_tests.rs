//! Tests del ciclo de vida del ticket: reserva, pago, escaneo QR,
//! abordaje, inicio de viaje y broadcast de posición

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use common::FakeDb;
use transit_ticketing::controllers::journey_controller::JourneyController;
use transit_ticketing::controllers::ticket_controller::TicketController;
use transit_ticketing::dto::journey_dto::{
    ConfirmBoardingRequest, ScanTicketRequest, StartJourneyRequest, UpdateLocationRequest,
};
use transit_ticketing::dto::ticket_dto::{BookTicketRequest, PayTicketRequest};
use transit_ticketing::models::user::{AuthUser, UserRole};
use transit_ticketing::utils::errors::AppError;

fn ticket_controller(db: &Arc<FakeDb>) -> TicketController {
    TicketController::with_stores(
        db.clone(),
        db.clone(),
        db.clone(),
        db.clone(),
        db.clone(),
    )
}

fn journey_controller(db: &Arc<FakeDb>) -> JourneyController {
    JourneyController::with_stores(db.clone(), db.clone(), db.clone(), db.clone())
}

fn auth(user_id: Uuid) -> AuthUser {
    AuthUser {
        user_id,
        role: UserRole::Passenger,
    }
}

fn book_request(
    route_id: Uuid,
    vehicle_id: Option<Uuid>,
    name: &str,
    phone: &str,
    seat: i32,
) -> BookTicketRequest {
    BookTicketRequest {
        route_id,
        vehicle_id,
        start_stop_id: None,
        end_stop_id: None,
        passenger_name: name.to_string(),
        passenger_phone: phone.to_string(),
        passenger_email: None,
        travel_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        seat_number: seat,
    }
}

#[tokio::test]
async fn test_book_without_stops_uses_base_fare_and_pending_state() {
    let db = FakeDb::new();
    let passenger = db.insert_user("Alice", Some("0788123456"), "alice@example.com", "passenger");
    let route = db.insert_route("Kigali - Huye", 1000);

    let response = ticket_controller(&db)
        .book(
            &auth(passenger.id),
            book_request(route.id, None, "Alice", "0788123456", 5),
        )
        .await
        .unwrap();

    let data = response.data.unwrap();
    assert_eq!(data.fare.amount, Decimal::from(1000));
    assert_eq!(data.fare.distance_km, None);
    assert_eq!(data.ticket.payment_status, "pending");
    assert_eq!(data.ticket.boarding_status, "pending");
    assert_eq!(data.ticket.journey_status, "pending");
    assert_eq!(data.ticket.amount_paid, Decimal::from(1000));
    assert_eq!(data.ticket.qr_code.len(), 32);
    assert_eq!(data.ticket.actual_start_location.as_deref(), Some("Nyabugogo"));
    assert_eq!(data.ticket.actual_end_location.as_deref(), Some("Huye"));

    // El comprador recibe la notificación de la reserva
    let notifications = db.notifications_for(passenger.id);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Ticket reservado");
}

#[tokio::test]
async fn test_book_with_stops_charges_segment_fare() {
    let db = FakeDb::new();
    let passenger = db.insert_user("Alice", Some("0788123456"), "alice@example.com", "passenger");
    let route = db.insert_route("Kigali - Huye", 1000);
    let s1 = db.insert_stop(route.id, 1, 0, 0);
    db.insert_stop(route.id, 2, 5, 500);
    let s3 = db.insert_stop(route.id, 3, 12, 1200);

    let mut request = book_request(route.id, None, "Alice", "0788123456", 5);
    request.start_stop_id = Some(s3.id);
    request.end_stop_id = Some(s1.id);

    let response = ticket_controller(&db)
        .book(&auth(passenger.id), request)
        .await
        .unwrap();

    let data = response.data.unwrap();
    assert_eq!(data.fare.amount, Decimal::from(1200));
    assert_eq!(data.fare.distance_km, Some(Decimal::from(12)));
    assert_eq!(data.ticket.actual_start_location.as_deref(), Some("Parada 1"));
    assert_eq!(data.ticket.actual_end_location.as_deref(), Some("Parada 3"));
}

#[tokio::test]
async fn test_book_then_pay_scenario() {
    let db = FakeDb::new();
    let passenger = db.insert_user("Alice", Some("0788123456"), "alice@example.com", "passenger");
    let route = db.insert_route("Kigali - Huye", 1000);

    let controller = ticket_controller(&db);
    let booked = controller
        .book(
            &auth(passenger.id),
            book_request(route.id, None, "Alice", "0788123456", 5),
        )
        .await
        .unwrap()
        .data
        .unwrap();

    let paid = controller
        .pay(
            &auth(passenger.id),
            PayTicketRequest {
                ticket_id: booked.ticket.id,
                phone_number: "0788123456".to_string(),
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();

    assert_eq!(paid.ticket.payment_status, "completed");
    assert_eq!(paid.payment_method, "mtn_momo");
    assert!(paid.transaction_id.starts_with("MM"));
    assert_eq!(paid.transaction_id.len(), 12);
    assert_eq!(paid.loyalty_points_awarded, 10);

    let stored_user = db.users.lock().unwrap().get(&passenger.id).cloned().unwrap();
    assert_eq!(stored_user.loyalty_points, 10);

    // Comprador y viajero son la misma cuenta: una sola notificación
    // de pago
    let payment_notifications: Vec<_> = db
        .notifications_for(passenger.id)
        .into_iter()
        .filter(|n| n.title == "Pago confirmado")
        .collect();
    assert_eq!(payment_notifications.len(), 1);
}

#[tokio::test]
async fn test_pay_rejects_invalid_phone_format() {
    let db = FakeDb::new();
    let passenger = db.insert_user("Alice", Some("0788123456"), "alice@example.com", "passenger");
    let route = db.insert_route("Kigali - Huye", 1000);

    let controller = ticket_controller(&db);
    let booked = controller
        .book(
            &auth(passenger.id),
            book_request(route.id, None, "Alice", "0788123456", 5),
        )
        .await
        .unwrap()
        .data
        .unwrap();

    let result = controller
        .pay(
            &auth(passenger.id),
            PayTicketRequest {
                ticket_id: booked.ticket.id,
                phone_number: "0701234567".to_string(),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let stored = db.tickets.lock().unwrap().get(&booked.ticket.id).cloned().unwrap();
    assert_eq!(stored.payment_status, "pending");
}

#[tokio::test]
async fn test_pay_twice_is_a_conflict() {
    let db = FakeDb::new();
    let passenger = db.insert_user("Alice", Some("0788123456"), "alice@example.com", "passenger");
    let route = db.insert_route("Kigali - Huye", 1000);

    let controller = ticket_controller(&db);
    let booked = controller
        .book(
            &auth(passenger.id),
            book_request(route.id, None, "Alice", "0788123456", 5),
        )
        .await
        .unwrap()
        .data
        .unwrap();

    let request = PayTicketRequest {
        ticket_id: booked.ticket.id,
        phone_number: "0788123456".to_string(),
    };
    controller.pay(&auth(passenger.id), request).await.unwrap();

    let second = controller
        .pay(
            &auth(passenger.id),
            PayTicketRequest {
                ticket_id: booked.ticket.id,
                phone_number: "0788123456".to_string(),
            },
        )
        .await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_buyer_and_traveler_both_notified() {
    let db = FakeDb::new();
    let buyer = db.insert_user("Bob", Some("0788000001"), "bob@example.com", "passenger");
    let traveler = db.insert_user("Chantal", Some("0722123456"), "ch@example.com", "passenger");
    let route = db.insert_route("Kigali - Huye", 1000);

    let controller = ticket_controller(&db);
    let booked = controller
        .book(
            &auth(buyer.id),
            book_request(route.id, None, "Chantal", "0722123456", 7),
        )
        .await
        .unwrap()
        .data
        .unwrap();

    // La cuenta del viajero se resolvió por su teléfono
    assert_eq!(booked.ticket.passenger_id, Some(traveler.id));

    let paid = controller
        .pay(
            &auth(buyer.id),
            PayTicketRequest {
                ticket_id: booked.ticket.id,
                phone_number: "0722123456".to_string(),
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();

    assert_eq!(paid.payment_method, "airtel_money");

    let traveler_notifications: Vec<_> = db
        .notifications_for(traveler.id)
        .into_iter()
        .filter(|n| n.title == "Pago confirmado")
        .collect();
    let buyer_notifications: Vec<_> = db
        .notifications_for(buyer.id)
        .into_iter()
        .filter(|n| n.title == "Pago confirmado")
        .collect();

    assert_eq!(traveler_notifications.len(), 1);
    assert_eq!(buyer_notifications.len(), 1);
}

#[tokio::test]
async fn test_qr_round_trip_scan() {
    let db = FakeDb::new();
    let passenger = db.insert_user("Alice", Some("0788123456"), "alice@example.com", "passenger");
    let route = db.insert_route("Kigali - Huye", 1000);
    let vehicle = db.insert_vehicle("RAD 123 B", Some(route.id));
    let other_vehicle = db.insert_vehicle("RAD 999 Z", None);

    let tickets = ticket_controller(&db);
    let journeys = journey_controller(&db);

    let booked = tickets
        .book(
            &auth(passenger.id),
            book_request(route.id, Some(vehicle.id), "Alice", "0788123456", 5),
        )
        .await
        .unwrap()
        .data
        .unwrap();

    // Sin pagar, el escaneo no encuentra un ticket válido
    let unpaid = journeys
        .scan_ticket(ScanTicketRequest {
            qr_code: booked.ticket.qr_code.clone(),
            vehicle_id: vehicle.id,
        })
        .await;
    assert!(matches!(unpaid, Err(AppError::NotFound(_))));

    tickets
        .pay(
            &auth(passenger.id),
            PayTicketRequest {
                ticket_id: booked.ticket.id,
                phone_number: "0788123456".to_string(),
            },
        )
        .await
        .unwrap();

    // El vehículo del ticket valida
    let scanned = journeys
        .scan_ticket(ScanTicketRequest {
            qr_code: booked.ticket.qr_code.clone(),
            vehicle_id: vehicle.id,
        })
        .await
        .unwrap();
    assert!(scanned.valid);
    assert_eq!(scanned.ticket.id, booked.ticket.id);

    // Otro vehículo es un mismatch
    let mismatch = journeys
        .scan_ticket(ScanTicketRequest {
            qr_code: booked.ticket.qr_code,
            vehicle_id: other_vehicle.id,
        })
        .await;
    assert!(matches!(mismatch, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_confirm_boarding_transitions_states() {
    let db = FakeDb::new();
    let passenger = db.insert_user("Alice", Some("0788123456"), "alice@example.com", "passenger");
    let route = db.insert_route("Kigali - Huye", 1000);
    let vehicle = db.insert_vehicle("RAD 123 B", Some(route.id));

    let tickets = ticket_controller(&db);
    let journeys = journey_controller(&db);

    let booked = tickets
        .book(
            &auth(passenger.id),
            book_request(route.id, Some(vehicle.id), "Alice", "0788123456", 5),
        )
        .await
        .unwrap()
        .data
        .unwrap();

    // Sin pagar no hay abordaje
    let unpaid = journeys
        .confirm_boarding(ConfirmBoardingRequest {
            ticket_id: booked.ticket.id,
        })
        .await;
    assert!(matches!(unpaid, Err(AppError::BadRequest(_))));

    tickets
        .pay(
            &auth(passenger.id),
            PayTicketRequest {
                ticket_id: booked.ticket.id,
                phone_number: "0788123456".to_string(),
            },
        )
        .await
        .unwrap();

    let confirmed = journeys
        .confirm_boarding(ConfirmBoardingRequest {
            ticket_id: booked.ticket.id,
        })
        .await
        .unwrap()
        .data
        .unwrap();

    assert_eq!(confirmed.boarding_status, "confirmed");
    assert_eq!(confirmed.journey_status, "in_progress");
    assert!(confirmed.boarded_at.is_some());

    // Repetir el abordaje es un conflicto
    let again = journeys
        .confirm_boarding(ConfirmBoardingRequest {
            ticket_id: booked.ticket.id,
        })
        .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_start_journey_isolates_notification_failures() {
    let db = FakeDb::new();
    let route = db.insert_route("Kigali - Huye", 1000);
    let vehicle = db.insert_vehicle("RAD 123 B", Some(route.id));

    let tickets = ticket_controller(&db);
    let journeys = journey_controller(&db);

    let phones = ["0788000001", "0788000002", "0788000003"];
    let mut travelers = Vec::new();
    for (i, phone) in phones.into_iter().enumerate() {
        let traveler = db.insert_user(
            &format!("Pasajero {}", i + 1),
            Some(phone),
            &format!("p{}@example.com", i + 1),
            "passenger",
        );
        let booked = tickets
            .book(
                &auth(traveler.id),
                book_request(route.id, Some(vehicle.id), "Viajero", phone, (i + 1) as i32),
            )
            .await
            .unwrap()
            .data
            .unwrap();
        tickets
            .pay(
                &auth(traveler.id),
                PayTicketRequest {
                    ticket_id: booked.ticket.id,
                    phone_number: phone.to_string(),
                },
            )
            .await
            .unwrap();
        travelers.push(traveler);
    }

    // La notificación del segundo pasajero falla; el lote no se cae
    db.fail_notifications_for
        .lock()
        .unwrap()
        .insert(travelers[1].id);

    let response = journeys
        .start_journey(StartJourneyRequest {
            vehicle_id: vehicle.id,
        })
        .await
        .unwrap()
        .data
        .unwrap();

    assert_eq!(response.tickets_updated, 3);
    assert_eq!(response.passengers_notified, 2);

    // Todos los tickets quedaron en viaje, incluido el del fallo
    let in_progress = db
        .tickets
        .lock()
        .unwrap()
        .values()
        .filter(|t| t.journey_status == "in_progress")
        .count();
    assert_eq!(in_progress, 3);
}

#[tokio::test]
async fn test_start_journey_skips_unpaid_tickets() {
    let db = FakeDb::new();
    let route = db.insert_route("Kigali - Huye", 1000);
    let vehicle = db.insert_vehicle("RAD 123 B", Some(route.id));

    let tickets = ticket_controller(&db);
    let journeys = journey_controller(&db);

    let paid_user = db.insert_user("Pago", Some("0788000010"), "pg@example.com", "passenger");
    let unpaid_user = db.insert_user("Debe", Some("0788000011"), "db@example.com", "passenger");

    let paid_ticket = tickets
        .book(
            &auth(paid_user.id),
            book_request(route.id, Some(vehicle.id), "Pago", "0788000010", 1),
        )
        .await
        .unwrap()
        .data
        .unwrap();
    tickets
        .pay(
            &auth(paid_user.id),
            PayTicketRequest {
                ticket_id: paid_ticket.ticket.id,
                phone_number: "0788000010".to_string(),
            },
        )
        .await
        .unwrap();

    let unpaid_ticket = tickets
        .book(
            &auth(unpaid_user.id),
            book_request(route.id, Some(vehicle.id), "Debe", "0788000011", 2),
        )
        .await
        .unwrap()
        .data
        .unwrap();

    let response = journeys
        .start_journey(StartJourneyRequest {
            vehicle_id: vehicle.id,
        })
        .await
        .unwrap()
        .data
        .unwrap();

    assert_eq!(response.tickets_updated, 1);

    let stored_unpaid = db
        .tickets
        .lock()
        .unwrap()
        .get(&unpaid_ticket.ticket.id)
        .cloned()
        .unwrap();
    assert_eq!(stored_unpaid.journey_status, "pending");
}

#[tokio::test]
async fn test_update_location_notifies_passengers_in_progress() {
    let db = FakeDb::new();
    let route = db.insert_route("Kigali - Huye", 1000);
    let vehicle = db.insert_vehicle("RAD 123 B", Some(route.id));
    let passenger = db.insert_user("Alice", Some("0788123456"), "alice@example.com", "passenger");

    let tickets = ticket_controller(&db);
    let journeys = journey_controller(&db);

    let booked = tickets
        .book(
            &auth(passenger.id),
            book_request(route.id, Some(vehicle.id), "Alice", "0788123456", 5),
        )
        .await
        .unwrap()
        .data
        .unwrap();
    tickets
        .pay(
            &auth(passenger.id),
            PayTicketRequest {
                ticket_id: booked.ticket.id,
                phone_number: "0788123456".to_string(),
            },
        )
        .await
        .unwrap();
    journeys
        .start_journey(StartJourneyRequest {
            vehicle_id: vehicle.id,
        })
        .await
        .unwrap();

    let response = journeys
        .update_location(UpdateLocationRequest {
            vehicle_id: vehicle.id,
            latitude: -1.9536,
            longitude: 30.0606,
        })
        .await
        .unwrap()
        .data
        .unwrap();

    assert_eq!(response.passengers_notified, 1);

    let stored_vehicle = db.vehicles.lock().unwrap().get(&vehicle.id).cloned().unwrap();
    assert_eq!(stored_vehicle.current_latitude, Some(-1.9536));
    assert_eq!(stored_vehicle.current_longitude, Some(30.0606));
    assert!(stored_vehicle.last_location_at.is_some());

    let position_notifications: Vec<_> = db
        .notifications_for(passenger.id)
        .into_iter()
        .filter(|n| n.title == "Posición actualizada")
        .collect();
    assert_eq!(position_notifications.len(), 1);
}

#[tokio::test]
async fn test_update_location_rejects_invalid_coordinates() {
    let db = FakeDb::new();
    let route = db.insert_route("Kigali - Huye", 1000);
    let vehicle = db.insert_vehicle("RAD 123 B", Some(route.id));

    let result = journey_controller(&db)
        .update_location(UpdateLocationRequest {
            vehicle_id: vehicle.id,
            latitude: 95.0,
            longitude: 30.0,
        })
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
}
