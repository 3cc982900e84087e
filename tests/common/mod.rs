//! Almacenamiento en memoria para los tests de integración
//!
//! `FakeDb` implementa los traits de repositorio sobre HashMaps. Las
//! operaciones de asignación preparan sus escrituras sobre copias y
//! las aplican todas juntas, igual que la transacción real; los flags
//! de fallo permiten simular errores de almacenamiento a mitad de una
//! operación o al insertar la notificación de un usuario concreto.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use transit_ticketing::models::driver::{Driver, DriverWithUser};
use transit_ticketing::models::notification::Notification;
use transit_ticketing::models::route::{Route, RouteStop};
use transit_ticketing::models::ticket::{NewTicket, Ticket};
use transit_ticketing::models::user::User;
use transit_ticketing::models::vehicle::Vehicle;
use transit_ticketing::repositories::{
    AssignmentStore, DriverRouteAssignment, DriverStore, DriverVehicleAssignment,
    NotificationStore, RouteStore, TicketStore, UserStore, VehicleStore,
};
use transit_ticketing::utils::errors::{AppError, AppResult};

#[derive(Default)]
pub struct FakeDb {
    pub routes: Mutex<HashMap<Uuid, Route>>,
    pub stops: Mutex<HashMap<Uuid, RouteStop>>,
    pub vehicles: Mutex<HashMap<Uuid, Vehicle>>,
    pub drivers: Mutex<HashMap<Uuid, Driver>>,
    pub users: Mutex<HashMap<Uuid, User>>,
    pub tickets: Mutex<HashMap<Uuid, Ticket>>,
    pub notifications: Mutex<Vec<Notification>>,

    /// Simula un fallo de almacenamiento a mitad de una asignación
    pub fail_next_assignment: AtomicBool,
    /// Inserts de notificación que deben fallar, por usuario destino
    pub fail_notifications_for: Mutex<HashSet<Uuid>>,
}

impl FakeDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert_user(&self, full_name: &str, phone: Option<&str>, email: &str, role: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            role: role.to_string(),
            loyalty_points: 0,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().insert(user.id, user.clone());
        user
    }

    pub fn insert_route(&self, name: &str, base_fare: i64) -> Route {
        let route = Route {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_location: "Nyabugogo".to_string(),
            end_location: "Huye".to_string(),
            base_fare: Decimal::from(base_fare),
            company_name: None,
            assigned_vehicle_id: None,
            assigned_driver_id: None,
            scheduled_departure: None,
            created_at: Utc::now(),
        };
        self.routes.lock().unwrap().insert(route.id, route.clone());
        route
    }

    pub fn insert_stop(&self, route_id: Uuid, order: i32, distance: i64, fare: i64) -> RouteStop {
        let stop = RouteStop {
            id: Uuid::new_v4(),
            route_id,
            stop_name: format!("Parada {}", order),
            stop_order: order,
            distance_from_start_km: Decimal::from(distance),
            fare_from_start: Decimal::from(fare),
        };
        self.stops.lock().unwrap().insert(stop.id, stop.clone());
        stop
    }

    pub fn insert_vehicle(&self, plate: &str, assigned_route_id: Option<Uuid>) -> Vehicle {
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            plate_number: plate.to_string(),
            capacity: 30,
            vehicle_status: "active".to_string(),
            assigned_driver_id: None,
            assigned_route_id,
            current_latitude: None,
            current_longitude: None,
            last_location_at: None,
            created_at: Utc::now(),
        };
        self.vehicles.lock().unwrap().insert(vehicle.id, vehicle.clone());
        vehicle
    }

    pub fn insert_driver(&self, user_id: Uuid) -> Driver {
        let driver = Driver {
            id: Uuid::new_v4(),
            user_id,
            license_number: "B1234567".to_string(),
            driver_status: "active".to_string(),
            assigned_line_id: None,
            created_at: Utc::now(),
        };
        self.drivers.lock().unwrap().insert(driver.id, driver.clone());
        driver
    }

    pub fn notifications_for(&self, user_id: Uuid) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    fn driver_with_user(&self, driver_id: Uuid) -> Option<DriverWithUser> {
        let driver = self.drivers.lock().unwrap().get(&driver_id).cloned()?;
        let user = self.users.lock().unwrap().get(&driver.user_id).cloned()?;
        Some(DriverWithUser {
            id: driver.id,
            user_id: driver.user_id,
            license_number: driver.license_number,
            driver_status: driver.driver_status,
            assigned_line_id: driver.assigned_line_id,
            full_name: user.full_name,
            email: user.email,
        })
    }

    fn push_notification(&self, user_id: Uuid, title: &str, message: &str) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            message: message.to_string(),
            is_read: false,
            created_at: Utc::now(),
        };
        self.notifications.lock().unwrap().push(notification.clone());
        notification
    }
}

#[async_trait]
impl RouteStore for FakeDb {
    async fn create_route(
        &self,
        name: String,
        start_location: String,
        end_location: String,
        base_fare: Decimal,
        company_name: Option<String>,
        scheduled_departure: Option<DateTime<Utc>>,
    ) -> AppResult<Route> {
        let route = Route {
            id: Uuid::new_v4(),
            name,
            start_location,
            end_location,
            base_fare,
            company_name,
            assigned_vehicle_id: None,
            assigned_driver_id: None,
            scheduled_departure,
            created_at: Utc::now(),
        };
        self.routes.lock().unwrap().insert(route.id, route.clone());
        Ok(route)
    }

    async fn find_route_by_id(&self, id: Uuid) -> AppResult<Option<Route>> {
        Ok(self.routes.lock().unwrap().get(&id).cloned())
    }

    async fn list_routes(&self) -> AppResult<Vec<Route>> {
        Ok(self.routes.lock().unwrap().values().cloned().collect())
    }

    async fn update_route(
        &self,
        id: Uuid,
        name: Option<String>,
        start_location: Option<String>,
        end_location: Option<String>,
        base_fare: Option<Decimal>,
        company_name: Option<String>,
        scheduled_departure: Option<DateTime<Utc>>,
    ) -> AppResult<Route> {
        let mut routes = self.routes.lock().unwrap();
        let route = routes
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        if let Some(name) = name {
            route.name = name;
        }
        if let Some(start_location) = start_location {
            route.start_location = start_location;
        }
        if let Some(end_location) = end_location {
            route.end_location = end_location;
        }
        if let Some(base_fare) = base_fare {
            route.base_fare = base_fare;
        }
        if company_name.is_some() {
            route.company_name = company_name;
        }
        if scheduled_departure.is_some() {
            route.scheduled_departure = scheduled_departure;
        }

        Ok(route.clone())
    }

    async fn delete_route(&self, id: Uuid) -> AppResult<()> {
        self.stops.lock().unwrap().retain(|_, s| s.route_id != id);
        self.routes
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))
    }

    async fn create_stop(
        &self,
        route_id: Uuid,
        stop_name: String,
        stop_order: i32,
        distance_from_start_km: Decimal,
        fare_from_start: Decimal,
    ) -> AppResult<RouteStop> {
        let stop = RouteStop {
            id: Uuid::new_v4(),
            route_id,
            stop_name,
            stop_order,
            distance_from_start_km,
            fare_from_start,
        };
        self.stops.lock().unwrap().insert(stop.id, stop.clone());
        Ok(stop)
    }

    async fn list_stops(&self, route_id: Uuid) -> AppResult<Vec<RouteStop>> {
        let mut stops: Vec<RouteStop> = self
            .stops
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.route_id == route_id)
            .cloned()
            .collect();
        stops.sort_by_key(|s| s.stop_order);
        Ok(stops)
    }

    async fn find_stop_pair(&self, route_id: Uuid, a: Uuid, b: Uuid) -> AppResult<Vec<RouteStop>> {
        let mut stops: Vec<RouteStop> = self
            .stops
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.route_id == route_id && (s.id == a || s.id == b))
            .cloned()
            .collect();
        stops.sort_by_key(|s| s.stop_order);
        Ok(stops)
    }

    async fn update_stop(
        &self,
        stop_id: Uuid,
        stop_name: Option<String>,
        stop_order: Option<i32>,
        distance_from_start_km: Option<Decimal>,
        fare_from_start: Option<Decimal>,
    ) -> AppResult<RouteStop> {
        let mut stops = self.stops.lock().unwrap();
        let stop = stops
            .get_mut(&stop_id)
            .ok_or_else(|| AppError::NotFound("Parada no encontrada".to_string()))?;

        if let Some(stop_name) = stop_name {
            stop.stop_name = stop_name;
        }
        if let Some(stop_order) = stop_order {
            stop.stop_order = stop_order;
        }
        if let Some(distance) = distance_from_start_km {
            stop.distance_from_start_km = distance;
        }
        if let Some(fare) = fare_from_start {
            stop.fare_from_start = fare;
        }

        Ok(stop.clone())
    }

    async fn delete_stop(&self, stop_id: Uuid) -> AppResult<()> {
        self.stops
            .lock()
            .unwrap()
            .remove(&stop_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Parada no encontrada".to_string()))
    }
}

#[async_trait]
impl VehicleStore for FakeDb {
    async fn create(&self, plate_number: String, capacity: i32) -> AppResult<Vehicle> {
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            plate_number,
            capacity,
            vehicle_status: "active".to_string(),
            assigned_driver_id: None,
            assigned_route_id: None,
            current_latitude: None,
            current_longitude: None,
            last_location_at: None,
            created_at: Utc::now(),
        };
        self.vehicles.lock().unwrap().insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.vehicles.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Vehicle>> {
        Ok(self.vehicles.lock().unwrap().values().cloned().collect())
    }

    async fn plate_exists(&self, plate_number: &str) -> AppResult<bool> {
        Ok(self
            .vehicles
            .lock()
            .unwrap()
            .values()
            .any(|v| v.plate_number == plate_number))
    }

    async fn update(
        &self,
        id: Uuid,
        plate_number: Option<String>,
        capacity: Option<i32>,
        vehicle_status: Option<String>,
    ) -> AppResult<Vehicle> {
        let mut vehicles = self.vehicles.lock().unwrap();
        let vehicle = vehicles
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if let Some(plate_number) = plate_number {
            vehicle.plate_number = plate_number;
        }
        if let Some(capacity) = capacity {
            vehicle.capacity = capacity;
        }
        if let Some(vehicle_status) = vehicle_status {
            vehicle.vehicle_status = vehicle_status;
        }

        Ok(vehicle.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.vehicles
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))
    }

    async fn update_location(
        &self,
        id: Uuid,
        latitude: f64,
        longitude: f64,
        at: DateTime<Utc>,
    ) -> AppResult<Vehicle> {
        let mut vehicles = self.vehicles.lock().unwrap();
        let vehicle = vehicles
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        vehicle.current_latitude = Some(latitude);
        vehicle.current_longitude = Some(longitude);
        vehicle.last_location_at = Some(at);

        Ok(vehicle.clone())
    }
}

#[async_trait]
impl DriverStore for FakeDb {
    async fn create(&self, user_id: Uuid, license_number: String) -> AppResult<Driver> {
        let driver = Driver {
            id: Uuid::new_v4(),
            user_id,
            license_number,
            driver_status: "active".to_string(),
            assigned_line_id: None,
            created_at: Utc::now(),
        };
        self.drivers.lock().unwrap().insert(driver.id, driver.clone());
        Ok(driver)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        Ok(self.drivers.lock().unwrap().get(&id).cloned())
    }

    async fn find_with_user(&self, id: Uuid) -> AppResult<Option<DriverWithUser>> {
        Ok(self.driver_with_user(id))
    }

    async fn exists_for_user(&self, user_id: Uuid) -> AppResult<bool> {
        Ok(self
            .drivers
            .lock()
            .unwrap()
            .values()
            .any(|d| d.user_id == user_id))
    }

    async fn list(&self) -> AppResult<Vec<Driver>> {
        Ok(self.drivers.lock().unwrap().values().cloned().collect())
    }

    async fn update(
        &self,
        id: Uuid,
        license_number: Option<String>,
        driver_status: Option<String>,
    ) -> AppResult<Driver> {
        let mut drivers = self.drivers.lock().unwrap();
        let driver = drivers
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        if let Some(license_number) = license_number {
            driver.license_number = license_number;
        }
        if let Some(driver_status) = driver_status {
            driver.driver_status = driver_status;
        }

        Ok(driver.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.drivers
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))
    }
}

#[async_trait]
impl UserStore for FakeDb {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn add_loyalty_points(&self, user_id: Uuid, points: i32) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.get_mut(&user_id) {
            user.loyalty_points += points;
        }
        Ok(())
    }
}

#[async_trait]
impl TicketStore for FakeDb {
    async fn create(&self, ticket: NewTicket) -> AppResult<Ticket> {
        let created = Ticket {
            id: ticket.id,
            passenger_id: ticket.passenger_id,
            passenger_name: ticket.passenger_name,
            passenger_phone: ticket.passenger_phone,
            passenger_email: ticket.passenger_email,
            booked_by: ticket.booked_by,
            route_id: ticket.route_id,
            vehicle_id: ticket.vehicle_id,
            start_stop_id: ticket.start_stop_id,
            end_stop_id: ticket.end_stop_id,
            actual_start_location: ticket.actual_start_location,
            actual_end_location: ticket.actual_end_location,
            travel_date: ticket.travel_date,
            seat_number: ticket.seat_number,
            amount_paid: ticket.amount_paid,
            payment_status: "pending".to_string(),
            payment_method: None,
            transaction_id: None,
            boarding_status: "pending".to_string(),
            journey_status: "pending".to_string(),
            qr_code: ticket.qr_code,
            booked_at: ticket.booked_at,
            boarded_at: None,
        };
        self.tickets.lock().unwrap().insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Ticket>> {
        Ok(self.tickets.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_qr_code(&self, qr_code: &str) -> AppResult<Option<Ticket>> {
        Ok(self
            .tickets
            .lock()
            .unwrap()
            .values()
            .find(|t| t.qr_code == qr_code)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Ticket>> {
        Ok(self
            .tickets
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.passenger_id == Some(user_id) || t.booked_by == Some(user_id))
            .cloned()
            .collect())
    }

    async fn mark_paid(
        &self,
        id: Uuid,
        payment_method: &str,
        transaction_id: &str,
    ) -> AppResult<Option<Ticket>> {
        let mut tickets = self.tickets.lock().unwrap();
        match tickets.get_mut(&id) {
            Some(ticket) if ticket.payment_status == "pending" => {
                ticket.payment_status = "completed".to_string();
                ticket.payment_method = Some(payment_method.to_string());
                ticket.transaction_id = Some(transaction_id.to_string());
                Ok(Some(ticket.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn confirm_boarding(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<Option<Ticket>> {
        let mut tickets = self.tickets.lock().unwrap();
        match tickets.get_mut(&id) {
            Some(ticket)
                if ticket.payment_status == "completed"
                    && ticket.boarding_status == "pending" =>
            {
                ticket.boarding_status = "confirmed".to_string();
                ticket.journey_status = "in_progress".to_string();
                ticket.boarded_at = Some(at);
                Ok(Some(ticket.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn start_journey_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<Ticket>> {
        let mut tickets = self.tickets.lock().unwrap();
        let mut updated = Vec::new();
        for ticket in tickets.values_mut() {
            if ticket.vehicle_id == Some(vehicle_id)
                && ticket.payment_status == "completed"
                && ticket.journey_status == "pending"
            {
                ticket.journey_status = "in_progress".to_string();
                updated.push(ticket.clone());
            }
        }
        Ok(updated)
    }

    async fn list_in_progress_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<Ticket>> {
        Ok(self
            .tickets
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.vehicle_id == Some(vehicle_id) && t.journey_status == "in_progress")
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationStore for FakeDb {
    async fn create(&self, user_id: Uuid, title: &str, message: &str) -> AppResult<Notification> {
        if self.fail_notifications_for.lock().unwrap().contains(&user_id) {
            return Err(AppError::Internal(
                "simulated notification insert failure".to_string(),
            ));
        }
        Ok(self.push_notification(user_id, title, message))
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        Ok(self.notifications_for(user_id))
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Notification>> {
        let mut notifications = self.notifications.lock().unwrap();
        for notification in notifications.iter_mut() {
            if notification.id == id && notification.user_id == user_id {
                notification.is_read = true;
                return Ok(Some(notification.clone()));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl AssignmentStore for FakeDb {
    async fn assign_driver_to_vehicle(
        &self,
        vehicle_id: Uuid,
        driver_id: Uuid,
    ) -> AppResult<DriverVehicleAssignment> {
        let vehicle = self
            .vehicles
            .lock()
            .unwrap()
            .get(&vehicle_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let driver = self
            .driver_with_user(driver_id)
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        // Escrituras preparadas sobre copias; se aplican todas o ninguna
        let mut staged_vehicle = vehicle;
        staged_vehicle.assigned_driver_id = Some(driver_id);
        let propagated_route_id = staged_vehicle.assigned_route_id;

        if self.fail_next_assignment.swap(false, Ordering::SeqCst) {
            return Err(AppError::Internal(
                "simulated storage failure mid-assignment".to_string(),
            ));
        }

        self.vehicles
            .lock()
            .unwrap()
            .insert(vehicle_id, staged_vehicle.clone());

        if let Some(route_id) = propagated_route_id {
            if let Some(d) = self.drivers.lock().unwrap().get_mut(&driver_id) {
                d.assigned_line_id = Some(route_id);
            }
        }

        self.push_notification(
            driver.user_id,
            "Nuevo vehículo asignado",
            &format!(
                "Se te asignó el vehículo {}. Revisa tu ruta antes de salir.",
                staged_vehicle.plate_number
            ),
        );

        Ok(DriverVehicleAssignment {
            vehicle: staged_vehicle,
            driver_user_id: driver.user_id,
            propagated_route_id,
        })
    }

    async fn assign_driver_to_route(
        &self,
        route_id: Uuid,
        driver_id: Uuid,
    ) -> AppResult<DriverRouteAssignment> {
        let driver = self
            .driver_with_user(driver_id)
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        let route = {
            let mut routes = self.routes.lock().unwrap();
            let route = routes
                .get_mut(&route_id)
                .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;
            route.assigned_driver_id = Some(driver_id);
            route.clone()
        };

        self.push_notification(
            driver.user_id,
            "Nueva ruta asignada",
            &format!(
                "Se te asignó la ruta {} ({} - {}).",
                route.name, route.start_location, route.end_location
            ),
        );

        Ok(DriverRouteAssignment {
            route,
            driver_user_id: driver.user_id,
        })
    }

    async fn assign_vehicle_to_route(&self, route_id: Uuid, vehicle_id: Uuid) -> AppResult<Route> {
        if !self.vehicles.lock().unwrap().contains_key(&vehicle_id) {
            return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
        }

        let mut routes = self.routes.lock().unwrap();
        let route = routes
            .get_mut(&route_id)
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;
        route.assigned_vehicle_id = Some(vehicle_id);

        Ok(route.clone())
    }
}
