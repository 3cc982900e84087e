use anyhow::Result;
use axum::{middleware as axum_middleware, response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use transit_ticketing::config::environment::EnvironmentConfig;
use transit_ticketing::database::DatabaseConnection;
use transit_ticketing::middleware::auth::{auth_middleware, require_admin, require_driver};
use transit_ticketing::middleware::cors::cors_middleware;
use transit_ticketing::routes;
use transit_ticketing::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚌 Transit Ticketing - Plataforma de transporte en bus");
    info!("======================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Schema fijo: verificar una sola vez al arranque
    if let Err(e) = db_connection.verify_schema().await {
        error!("❌ Schema incompleto: {}", e);
        return Err(e);
    }
    info!("✅ Schema verificado");

    let pool = db_connection.pool().clone();
    let app_state = AppState::new(pool, EnvironmentConfig::default());

    // Routers por rol
    let admin_api = Router::new()
        .nest("/routes", routes::route_routes::create_route_router())
        .nest("/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest("/drivers", routes::driver_routes::create_driver_router())
        .layer(axum_middleware::from_fn(require_admin));

    let driver_api = routes::journey_routes::create_journey_router()
        .layer(axum_middleware::from_fn(require_driver));

    let api = Router::new()
        .nest("/api/admin", admin_api)
        .nest("/api/driver", driver_api)
        .nest(
            "/api/passenger/tickets",
            routes::ticket_routes::create_ticket_router(),
        )
        .nest(
            "/api/notifications",
            routes::notification_routes::create_notification_router(),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .merge(api)
        .layer(cors_middleware())
        .with_state(app_state);

    // Puerto del servidor
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🛣️ Endpoints Admin - Rutas:");
    info!("   POST /api/admin/routes - Crear ruta");
    info!("   GET  /api/admin/routes - Listar rutas");
    info!("   GET  /api/admin/routes/:id - Obtener ruta con paradas");
    info!("   PUT  /api/admin/routes/:id - Actualizar ruta");
    info!("   DELETE /api/admin/routes/:id - Eliminar ruta");
    info!("   POST /api/admin/routes/:id/stops - Agregar parada");
    info!("   PUT  /api/admin/routes/:id/stops/:stop_id - Actualizar parada");
    info!("   DELETE /api/admin/routes/:id/stops/:stop_id - Eliminar parada");
    info!("   POST /api/admin/routes/:id/assign-driver - Asignar conductor");
    info!("   PUT  /api/admin/routes/:id/assign-vehicle - Asignar vehículo");
    info!("🚗 Endpoints Admin - Vehículos:");
    info!("   POST /api/admin/vehicles - Crear vehículo");
    info!("   GET  /api/admin/vehicles - Listar vehículos");
    info!("   GET  /api/admin/vehicles/:id - Obtener vehículo");
    info!("   PUT  /api/admin/vehicles/:id - Actualizar vehículo");
    info!("   DELETE /api/admin/vehicles/:id - Eliminar vehículo");
    info!("   POST /api/admin/vehicles/:id/assign-driver - Asignar conductor");
    info!("👤 Endpoints Admin - Conductores:");
    info!("   POST /api/admin/drivers - Registrar conductor");
    info!("   GET  /api/admin/drivers - Listar conductores");
    info!("🎫 Endpoints Pasajero:");
    info!("   POST /api/passenger/tickets/book - Reservar ticket");
    info!("   POST /api/passenger/tickets/pay - Pagar ticket");
    info!("   GET  /api/passenger/tickets - Mis tickets");
    info!("🧭 Endpoints Conductor:");
    info!("   POST /api/driver/scan-ticket - Validar QR");
    info!("   POST /api/driver/confirm-boarding - Confirmar abordaje");
    info!("   POST /api/driver/start-journey - Iniciar viaje");
    info!("   POST /api/driver/update-location - Broadcast de posición");
    info!("🔔 Endpoints Notificaciones:");
    info!("   GET  /api/notifications - Mis notificaciones");
    info!("   PUT  /api/notifications/:id/read - Marcar leída");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de health check
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "transit-ticketing",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
