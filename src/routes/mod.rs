//! Route definitions for the crewboard API.

pub mod daily_logs;
pub mod health;
pub mod zones;

use axum::routing::get;
use axum::Router;

use crate::AppState;

/// Build the API router. Transport layers (CORS, tracing, limits) are added by the binary.
///
/// The API is served under `/api/v1` and also at the root (`/daily-logs`,
/// `/zones`) for dashboards built against the unversioned paths.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/daily-logs",
            get(daily_logs::list).post(daily_logs::create),
        )
        .route("/daily-logs/stats", get(daily_logs::stats))
        .route("/daily-logs/revenue", get(daily_logs::revenue))
        .route("/zones", get(zones::list));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", api_routes.clone())
        .merge(api_routes)
        .with_state(state)
}
