//! Daily log routes: upsert, listing, dashboard stats and monthly revenue.

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::models::daily_log::{DailyLog, DailyLogPayload, DailyLogRecord};
use crate::models::pagination::{PagedResult, Pagination};
use crate::services::daily_log::{self as log_service, DailyLogFilters, MonthlyRevenue};
use crate::services::dashboard::{self, DashboardStats};
use crate::AppState;

/// `?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD`, each optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevenueQuery {
    pub year: Option<i32>,
}

/// POST /api/v1/daily-logs -- create or update one or many logs by (date, crewId).
pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<DailyLogPayload>, AppError>,
) -> Result<Json<ApiResponse<Vec<DailyLog>>>, AppError> {
    let entries = body.into_entries();
    let saved = log_service::upsert_many(&state.db, &entries).await?;
    Ok(ApiResponse::success(saved))
}

/// GET /api/v1/daily-logs -- list logs with filters and pagination.
pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(pagination), _): WithRejection<Query<Pagination>, AppError>,
    WithRejection(Query(filters), _): WithRejection<Query<DailyLogFilters>, AppError>,
) -> Result<Json<ApiResponse<PagedResult<DailyLogRecord>>>, AppError> {
    let result = log_service::list(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/v1/daily-logs/stats -- utilization, revenue and zone allocation.
pub async fn stats(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<StatsQuery>, AppError>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let stats = dashboard::get_stats(
        &state.db,
        query.start_date,
        query.end_date,
        state.config.today(),
        state.config.stats_default_window_days,
    )
    .await?;
    Ok(ApiResponse::success(stats))
}

/// GET /api/v1/daily-logs/revenue -- revenue per month of a year (default: current year).
pub async fn revenue(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<RevenueQuery>, AppError>,
) -> Result<Json<ApiResponse<MonthlyRevenue>>, AppError> {
    let year = query.year.unwrap_or_else(|| state.config.today().year());
    let revenue = log_service::monthly_revenue(&state.db, year).await?;
    Ok(ApiResponse::success(revenue))
}
