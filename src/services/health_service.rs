use tracing::warn;

use crate::{
    dto::health::HealthResponse,
    state::{GamePhase, SharedState},
};

/// Report degraded health while the country dataset is in the error phase.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if state.phase().await == GamePhase::Error {
        warn!("country dataset unavailable (error phase)");
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
