//! Dashboard statistics: crew utilization, revenue and per-zone allocation
//! over a date window.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::calendar::StatsWindow;

/// Aggregated dashboard statistics for the overview page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_crew: i64,
    pub active_crews: i64,
    pub utilization_rate: i64,
    pub total_revenue: f64,
    pub total_zones: i64,
    pub working_days: i64,
    pub total_worked_hours: f64,
    pub total_scheduled_hours: f64,
    pub zone_allocation: Vec<ZoneAllocation>,
}

/// Crew allocation and utilization for a single zone.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneAllocation {
    pub zone_id: Uuid,
    pub zone_name: String,
    pub crew_count: i64,
    pub technician_count: i64,
    pub cleaner_count: i64,
    pub active_crew_count: i64,
    pub zone_daily_capacity: f64,
    pub technician_daily_capacity: f64,
    pub cleaner_daily_capacity: f64,
    pub total_capacity: f64,
    pub technician_capacity: f64,
    pub cleaner_capacity: f64,
    pub worked_hours: f64,
    pub technician_worked: f64,
    pub cleaner_worked: f64,
    pub utilization_rate: i64,
    pub technician_utilization: i64,
    pub cleaner_utilization: i64,
}

/// Structural crew counts and daily capacity for one zone (no date filter).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ZoneCapacityRow {
    pub zone_id: Uuid,
    pub zone_name: String,
    pub crew_count: i64,
    pub technician_count: i64,
    pub cleaner_count: i64,
    pub zone_daily_capacity: f64,
    pub technician_daily_capacity: f64,
    pub cleaner_daily_capacity: f64,
}

/// Logged activity for one zone inside the log window.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct ZoneActivityRow {
    pub zone_id: Uuid,
    pub worked_hours: f64,
    pub technician_worked: f64,
    pub cleaner_worked: f64,
    pub active_crew_count: i64,
}

/// Global activity totals inside the log window.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct ActivityTotals {
    pub active_crews: i64,
    pub worked_hours: f64,
    pub total_revenue: f64,
}

/// Global structural counts.
#[derive(Debug, Clone, Default)]
pub struct CrewTotals {
    pub total_crew: i64,
    pub total_zones: i64,
    /// Sum of daily scheduled hours over Active crews only.
    pub active_daily_scheduled: f64,
}

/// Rounded percentage of `worked` over `capacity`; 0 when there is no capacity.
pub fn utilization_rate(worked: f64, capacity: f64) -> i64 {
    if capacity > 0.0 {
        (worked / capacity * 100.0).round() as i64
    } else {
        0
    }
}

/// Compute dashboard statistics for an optional inclusive date range.
pub async fn get_stats(
    pool: &PgPool,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
    fallback_days: u64,
) -> Result<DashboardStats, AppError> {
    let window = StatsWindow::resolve(start_date, end_date, today, fallback_days);

    let (total_crew, total_zones, active_daily_scheduled, activity, zone_capacity, zone_activity) = tokio::try_join!(
        fetch_total_crew(pool),
        fetch_total_zones(pool),
        fetch_active_daily_scheduled(pool),
        fetch_activity_totals(pool, &window),
        fetch_zone_capacity(pool),
        fetch_zone_activity(pool, &window),
    )?;

    let totals = CrewTotals {
        total_crew,
        total_zones,
        active_daily_scheduled,
    };

    let stats = assemble(&window, &totals, &activity, zone_capacity, zone_activity);

    tracing::debug!(
        log_from = ?window.log_from,
        log_to = ?window.log_to,
        capacity_to = %window.capacity_to,
        working_days = window.working_days,
        utilization_rate = stats.utilization_rate,
        zones = stats.zone_allocation.len(),
        "Computed dashboard stats"
    );

    Ok(stats)
}

/// Combine query results into the dashboard payload.
pub fn assemble(
    window: &StatsWindow,
    totals: &CrewTotals,
    activity: &ActivityTotals,
    zone_capacity: Vec<ZoneCapacityRow>,
    zone_activity: Vec<ZoneActivityRow>,
) -> DashboardStats {
    let total_scheduled_hours = totals.active_daily_scheduled * window.working_days as f64;

    DashboardStats {
        total_crew: totals.total_crew,
        active_crews: activity.active_crews,
        utilization_rate: utilization_rate(activity.worked_hours, total_scheduled_hours),
        total_revenue: activity.total_revenue,
        total_zones: totals.total_zones,
        working_days: window.working_days,
        total_worked_hours: activity.worked_hours,
        total_scheduled_hours,
        zone_allocation: build_zone_allocation(zone_capacity, zone_activity, window.working_days),
    }
}

/// Merge structural capacity with logged activity, one entry per zone.
///
/// Order follows `capacity`; zones with no activity get zero worked hours.
pub fn build_zone_allocation(
    capacity: Vec<ZoneCapacityRow>,
    activity: Vec<ZoneActivityRow>,
    working_days: i64,
) -> Vec<ZoneAllocation> {
    let mut activity_by_zone: HashMap<Uuid, ZoneActivityRow> =
        activity.into_iter().map(|row| (row.zone_id, row)).collect();
    let days = working_days as f64;

    capacity
        .into_iter()
        .map(|zone| {
            let worked = activity_by_zone.remove(&zone.zone_id).unwrap_or_default();

            let total_capacity = zone.zone_daily_capacity * days;
            let technician_capacity = zone.technician_daily_capacity * days;
            let cleaner_capacity = zone.cleaner_daily_capacity * days;

            ZoneAllocation {
                zone_id: zone.zone_id,
                zone_name: zone.zone_name,
                crew_count: zone.crew_count,
                technician_count: zone.technician_count,
                cleaner_count: zone.cleaner_count,
                active_crew_count: worked.active_crew_count,
                zone_daily_capacity: zone.zone_daily_capacity,
                technician_daily_capacity: zone.technician_daily_capacity,
                cleaner_daily_capacity: zone.cleaner_daily_capacity,
                total_capacity,
                technician_capacity,
                cleaner_capacity,
                worked_hours: worked.worked_hours,
                technician_worked: worked.technician_worked,
                cleaner_worked: worked.cleaner_worked,
                utilization_rate: utilization_rate(worked.worked_hours, total_capacity),
                technician_utilization: utilization_rate(
                    worked.technician_worked,
                    technician_capacity,
                ),
                cleaner_utilization: utilization_rate(worked.cleaner_worked, cleaner_capacity),
            }
        })
        .collect()
}

async fn fetch_total_crew(pool: &PgPool) -> Result<i64, AppError> {
    let row = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM crews")
        .fetch_one(pool)
        .await?;
    Ok(row)
}

async fn fetch_total_zones(pool: &PgPool) -> Result<i64, AppError> {
    let row = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM zones")
        .fetch_one(pool)
        .await?;
    Ok(row)
}

/// Daily scheduled hours summed over Active crews.
async fn fetch_active_daily_scheduled(pool: &PgPool) -> Result<f64, AppError> {
    let row = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(scheduled_hours), 0)::FLOAT8 FROM crews WHERE status = 'Active'",
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Distinct active crews, worked hours and revenue inside the log window.
async fn fetch_activity_totals(
    pool: &PgPool,
    window: &StatsWindow,
) -> Result<ActivityTotals, AppError> {
    let row = sqlx::query_as::<_, ActivityTotals>(
        r#"
        SELECT
            COUNT(DISTINCT crew_id)                      AS active_crews,
            COALESCE(SUM(hours_worked), 0)::FLOAT8       AS worked_hours,
            COALESCE(SUM(total_revenue), 0)::FLOAT8      AS total_revenue
        FROM daily_logs
        WHERE ($1::DATE IS NULL OR date >= $1)
          AND ($2::DATE IS NULL OR date <= $2)
        "#,
    )
    .bind(window.log_from)
    .bind(window.log_to)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Crew counts and daily capacity per zone, split by role. Every zone appears.
async fn fetch_zone_capacity(pool: &PgPool) -> Result<Vec<ZoneCapacityRow>, AppError> {
    let rows = sqlx::query_as::<_, ZoneCapacityRow>(
        r#"
        SELECT
            z.id   AS zone_id,
            z.name AS zone_name,
            COUNT(c.id) AS crew_count,
            COALESCE(SUM(CASE WHEN c.role = 'Technician' THEN 1 ELSE 0 END), 0) AS technician_count,
            COALESCE(SUM(CASE WHEN c.role = 'Cleaner'    THEN 1 ELSE 0 END), 0) AS cleaner_count,
            COALESCE(SUM(c.scheduled_hours), 0)::FLOAT8 AS zone_daily_capacity,
            COALESCE(SUM(CASE WHEN c.role = 'Technician' THEN c.scheduled_hours ELSE 0 END), 0)::FLOAT8 AS technician_daily_capacity,
            COALESCE(SUM(CASE WHEN c.role = 'Cleaner'    THEN c.scheduled_hours ELSE 0 END), 0)::FLOAT8 AS cleaner_daily_capacity
        FROM zones z
        LEFT JOIN crews c ON c.zone_id = z.id
        GROUP BY z.id, z.name
        ORDER BY z.name ASC, z.id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Worked hours (by role) and distinct active crews per zone inside the log window.
async fn fetch_zone_activity(
    pool: &PgPool,
    window: &StatsWindow,
) -> Result<Vec<ZoneActivityRow>, AppError> {
    let rows = sqlx::query_as::<_, ZoneActivityRow>(
        r#"
        SELECT
            c.zone_id AS zone_id,
            COALESCE(SUM(l.hours_worked), 0)::FLOAT8 AS worked_hours,
            COALESCE(SUM(CASE WHEN c.role = 'Technician' THEN l.hours_worked ELSE 0 END), 0)::FLOAT8 AS technician_worked,
            COALESCE(SUM(CASE WHEN c.role = 'Cleaner'    THEN l.hours_worked ELSE 0 END), 0)::FLOAT8 AS cleaner_worked,
            COUNT(DISTINCT l.crew_id) AS active_crew_count
        FROM daily_logs l
        INNER JOIN crews c ON c.id = l.crew_id
        WHERE c.zone_id IS NOT NULL
          AND ($1::DATE IS NULL OR l.date >= $1)
          AND ($2::DATE IS NULL OR l.date <= $2)
        GROUP BY c.zone_id
        "#,
    )
    .bind(window.log_from)
    .bind(window.log_to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
