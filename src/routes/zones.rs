//! Zone routes.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::models::zone::ZoneWithMetrics;
use crate::services::zone as zone_service;
use crate::AppState;

/// GET /api/v1/zones -- zones with lifetime revenue and utilization.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ZoneWithMetrics>>>, AppError> {
    let zones = zone_service::list_with_metrics(&state.db).await?;
    Ok(ApiResponse::success(zones))
}
