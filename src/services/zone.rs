//! Zone listing with lifetime activity metrics.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::zone::ZoneWithMetrics;
use crate::services::dashboard::utilization_rate;

/// Per-zone sums across every log of the zone's current crews.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ZoneMetricsRow {
    pub id: Uuid,
    pub name: String,
    pub zone_type: String,
    pub status: String,
    pub crew_count: i64,
    pub total_revenue: f64,
    pub total_hours: f64,
    /// Scheduled hours of the logging crew, summed once per log row.
    pub logged_capacity: f64,
}

impl From<ZoneMetricsRow> for ZoneWithMetrics {
    fn from(row: ZoneMetricsRow) -> Self {
        Self {
            utilization: utilization_rate(row.total_hours, row.logged_capacity),
            id: row.id,
            name: row.name,
            zone_type: row.zone_type,
            status: row.status,
            crew_count: row.crew_count,
            total_revenue: row.total_revenue,
            total_hours: row.total_hours,
        }
    }
}

/// List all zones with revenue, hours and utilization against logged days.
pub async fn list_with_metrics(pool: &PgPool) -> Result<Vec<ZoneWithMetrics>, AppError> {
    let rows = sqlx::query_as::<_, ZoneMetricsRow>(
        r#"
        SELECT
            z.id,
            z.name,
            z.zone_type,
            z.status,
            COUNT(DISTINCT c.id) AS crew_count,
            COALESCE(SUM(l.total_revenue), 0)::FLOAT8 AS total_revenue,
            COALESCE(SUM(l.hours_worked), 0)::FLOAT8 AS total_hours,
            COALESCE(SUM(CASE WHEN l.id IS NOT NULL THEN c.scheduled_hours ELSE 0 END), 0)::FLOAT8 AS logged_capacity
        FROM zones z
        LEFT JOIN crews c ON c.zone_id = z.id
        LEFT JOIN daily_logs l ON l.crew_id = c.id
        GROUP BY z.id, z.name, z.zone_type, z.status
        ORDER BY z.name ASC, z.id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ZoneWithMetrics::from).collect())
}
