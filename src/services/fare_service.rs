//! Resolución de tarifas
//!
//! Calcula cuánto debe pagar un pasajero por un viaje. Sin paradas, la
//! tarifa es la base de la ruta. Con un par de paradas, la tarifa es la
//! diferencia absoluta entre las tarifas acumuladas de ambas, sin
//! importar el orden en que el caller las pase. Si el cálculo por
//! paradas falla por cualquier motivo, la reserva sigue adelante con la
//! tarifa base: un ticket siempre obtiene alguna tarifa.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::models::route::{Route, RouteStop};
use crate::repositories::RouteStore;
use crate::utils::errors::{AppError, AppResult};

/// Tarifa resuelta para una reserva
#[derive(Debug, Clone)]
pub struct FareQuote {
    pub amount: Decimal,
    pub distance_km: Option<Decimal>,
    pub start_location: String,
    pub end_location: String,
}

/// Fallos internos del cálculo por paradas. Nunca llegan al caller:
/// degradan a la tarifa base.
#[derive(Error, Debug)]
enum FareError {
    #[error("invalid stop pair")]
    InvalidStopPair,

    #[error(transparent)]
    Storage(#[from] AppError),
}

pub struct FareService {
    routes: Arc<dyn RouteStore>,
}

impl FareService {
    pub fn new(routes: Arc<dyn RouteStore>) -> Self {
        Self { routes }
    }

    /// Resuelve la tarifa de la ruta, con sub-segmento opcional.
    /// Solo falla si la ruta misma no existe.
    pub async fn resolve(
        &self,
        route_id: Uuid,
        start_stop_id: Option<Uuid>,
        end_stop_id: Option<Uuid>,
    ) -> AppResult<FareQuote> {
        let route = self
            .routes
            .find_route_by_id(route_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        match (start_stop_id, end_stop_id) {
            (Some(start), Some(end)) if start != end => {
                match self.segment_quote(&route, start, end).await {
                    Ok(quote) => Ok(quote),
                    Err(e) => {
                        warn!(
                            route_id = %route.id,
                            "fallo el cálculo por paradas ({}), se usa la tarifa base",
                            e
                        );
                        Ok(base_quote(&route))
                    }
                }
            }
            _ => Ok(base_quote(&route)),
        }
    }

    async fn segment_quote(
        &self,
        route: &Route,
        start: Uuid,
        end: Uuid,
    ) -> Result<FareQuote, FareError> {
        let stops = self.routes.find_stop_pair(route.id, start, end).await?;

        // Exactamente dos paradas distintas de esta ruta, ya ordenadas
        // por stop_order
        if stops.len() != 2 {
            return Err(FareError::InvalidStopPair);
        }

        let (fare, distance) = segment_between(&stops[0], &stops[1]);

        Ok(FareQuote {
            amount: fare,
            distance_km: Some(distance),
            start_location: stops[0].stop_name.clone(),
            end_location: stops[1].stop_name.clone(),
        })
    }
}

fn base_quote(route: &Route) -> FareQuote {
    FareQuote {
        amount: route.base_fare,
        distance_km: None,
        start_location: route.start_location.clone(),
        end_location: route.end_location.clone(),
    }
}

/// Tarifa y distancia de un sub-segmento como diferencia absoluta de
/// los acumulados, independiente del orden de los argumentos.
pub fn segment_between(a: &RouteStop, b: &RouteStop) -> (Decimal, Decimal) {
    let fare = (a.fare_from_start - b.fare_from_start).abs();
    let distance = (a.distance_from_start_km - b.distance_from_start_km).abs();
    (fare, distance)
}
