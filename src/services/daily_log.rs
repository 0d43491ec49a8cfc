//! Daily log service: upsert by `(date, crew_id)`, filtered listing and
//! monthly revenue.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::crew::CrewRole;
use crate::models::daily_log::{CreateDailyLog, DailyLog, DailyLogRecord};
use crate::models::pagination::{PagedResult, Pagination};

/// Numeric columns are stored as NUMERIC and read back as FLOAT8.
const DAILY_LOG_COLUMNS: &str = "id, date, crew_id, \
    hours_worked::FLOAT8 AS hours_worked, jobs_completed, \
    revenue_per_job::FLOAT8 AS revenue_per_job, \
    total_revenue::FLOAT8 AS total_revenue, created_at, updated_at";

/// Filters for listing daily logs. `all` for zone or role means unfiltered.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogFilters {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub zone_id: Option<String>,
    pub role: Option<String>,
}

impl DailyLogFilters {
    pub fn zone(&self) -> Result<Option<Uuid>, AppError> {
        match self.zone_id.as_deref() {
            None | Some("") | Some("all") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| AppError::Validation(format!("Invalid zoneId '{raw}'"))),
        }
    }

    pub fn crew_role(&self) -> Result<Option<CrewRole>, AppError> {
        match self.role.as_deref() {
            None | Some("") | Some("all") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(AppError::Validation),
        }
    }
}

/// Revenue per calendar month of one year; index 0 is January.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    pub year: i32,
    pub monthly_revenue: [f64; 12],
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonthRevenueRow {
    pub month: i32,
    pub total_revenue: f64,
}

/// Create or update logs keyed by `(date, crew_id)`, all in one transaction.
///
/// An omitted `revenue_per_job` keeps the stored value on update. Returns the
/// saved rows in input order.
pub async fn upsert_many(
    pool: &PgPool,
    entries: &[CreateDailyLog],
) -> Result<Vec<DailyLog>, AppError> {
    if entries.is_empty() {
        return Err(AppError::Validation(
            "At least one daily log entry is required".to_string(),
        ));
    }
    for (index, entry) in entries.iter().enumerate() {
        entry
            .validate()
            .map_err(|e| AppError::Validation(format!("Entry {index}: {e}")))?;
    }

    let sql = format!(
        r#"
        INSERT INTO daily_logs (date, crew_id, hours_worked, jobs_completed, revenue_per_job, total_revenue)
        VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6)
        ON CONFLICT (date, crew_id) DO UPDATE SET
            hours_worked = EXCLUDED.hours_worked,
            jobs_completed = EXCLUDED.jobs_completed,
            revenue_per_job = COALESCE($5, daily_logs.revenue_per_job),
            total_revenue = EXCLUDED.total_revenue,
            updated_at = NOW()
        RETURNING {columns}
        "#,
        columns = DAILY_LOG_COLUMNS
    );

    let mut tx = pool.begin().await?;
    let mut saved = Vec::with_capacity(entries.len());

    for entry in entries {
        let log = sqlx::query_as::<_, DailyLog>(&sql)
            .bind(entry.date)
            .bind(entry.crew_id)
            .bind(entry.hours_worked)
            .bind(entry.jobs_completed)
            .bind(entry.revenue_per_job)
            .bind(entry.total_revenue)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::NotFound(format!("Crew with ID {} not found", entry.crew_id))
                }
                _ => AppError::Database(e),
            })?;
        saved.push(log);
    }

    tx.commit().await?;

    tracing::info!(count = saved.len(), "Upserted daily logs");
    Ok(saved)
}

/// List logs with crew and zone display fields, newest date first.
pub async fn list(
    pool: &PgPool,
    filters: &DailyLogFilters,
    pagination: &Pagination,
) -> Result<PagedResult<DailyLogRecord>, AppError> {
    let zone_id = filters.zone()?;
    let role = filters.crew_role()?;

    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    if filters.date.is_some() {
        param_index += 1;
        conditions.push(format!("l.date = ${param_index}"));
    }
    if filters.start_date.is_some() {
        param_index += 1;
        conditions.push(format!("l.date >= ${param_index}"));
    }
    if filters.end_date.is_some() {
        param_index += 1;
        conditions.push(format!("l.date <= ${param_index}"));
    }
    if zone_id.is_some() {
        param_index += 1;
        conditions.push(format!("z.id = ${param_index}"));
    }
    if role.is_some() {
        param_index += 1;
        conditions.push(format!("c.role = ${param_index}"));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let from_clause = "FROM daily_logs l \
         LEFT JOIN crews c ON c.id = l.crew_id \
         LEFT JOIN zones z ON z.id = c.zone_id";

    let count_sql = format!("SELECT COUNT(*) {from_clause} {where_clause}");
    let data_sql = format!(
        "SELECT l.id, l.date, l.crew_id, \
            l.hours_worked::FLOAT8 AS hours_worked, l.jobs_completed, \
            l.revenue_per_job::FLOAT8 AS revenue_per_job, \
            l.total_revenue::FLOAT8 AS total_revenue, l.created_at, l.updated_at, \
            c.first_name AS crew_first_name, c.last_name AS crew_last_name, \
            c.role AS crew_role, z.id AS zone_id, z.name AS zone_name \
         {from_clause} {where_clause} \
         ORDER BY l.date DESC, l.created_at DESC, l.id ASC LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, DailyLogRecord>(&data_sql);

    // Bind parameters in the same order for both queries
    macro_rules! bind_both {
        ($val:expr) => {
            count_query = count_query.bind($val);
            data_query = data_query.bind($val);
        };
    }

    if let Some(date) = filters.date {
        bind_both!(date);
    }
    if let Some(start) = filters.start_date {
        bind_both!(start);
    }
    if let Some(end) = filters.end_date {
        bind_both!(end);
    }
    if let Some(zone) = zone_id {
        bind_both!(zone);
    }
    if let Some(role) = role {
        bind_both!(role);
    }

    let total = count_query.fetch_one(pool).await?;
    let data = data_query.fetch_all(pool).await?;

    Ok(PagedResult::new(data, total, pagination))
}

/// Sum revenue per month for `year`; months without logs report 0.
pub async fn monthly_revenue(pool: &PgPool, year: i32) -> Result<MonthlyRevenue, AppError> {
    if !(1..=9999).contains(&year) {
        return Err(AppError::Validation(format!("Invalid year {year}")));
    }

    let rows = sqlx::query_as::<_, MonthRevenueRow>(
        r#"
        SELECT
            EXTRACT(MONTH FROM date)::INT4 AS month,
            COALESCE(SUM(total_revenue), 0)::FLOAT8 AS total_revenue
        FROM daily_logs
        WHERE date >= make_date($1, 1, 1)
          AND date < make_date($1 + 1, 1, 1)
        GROUP BY 1
        ORDER BY 1 ASC
        "#,
    )
    .bind(year)
    .fetch_all(pool)
    .await?;

    Ok(MonthlyRevenue {
        year,
        monthly_revenue: fold_months(&rows),
    })
}

/// Spread per-month rows over a fixed January..December array.
pub fn fold_months(rows: &[MonthRevenueRow]) -> [f64; 12] {
    let mut months = [0.0; 12];
    for row in rows {
        if let Some(slot) = usize::try_from(row.month - 1)
            .ok()
            .and_then(|index| months.get_mut(index))
        {
            *slot = row.total_revenue;
        }
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_without_data_are_zero() {
        let rows = vec![
            MonthRevenueRow {
                month: 1,
                total_revenue: 1200.0,
            },
            MonthRevenueRow {
                month: 12,
                total_revenue: 80.5,
            },
        ];
        let months = fold_months(&rows);
        assert_eq!(months[0], 1200.0);
        assert_eq!(months[11], 80.5);
        assert_eq!(months[1..11].iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn out_of_range_months_are_ignored() {
        let rows = vec![
            MonthRevenueRow {
                month: 0,
                total_revenue: 5.0,
            },
            MonthRevenueRow {
                month: 13,
                total_revenue: 5.0,
            },
        ];
        assert_eq!(fold_months(&rows), [0.0; 12]);
    }

    #[test]
    fn monthly_revenue_serializes_twelve_values() {
        let revenue = MonthlyRevenue {
            year: 2024,
            monthly_revenue: fold_months(&[]),
        };
        let json = serde_json::to_value(&revenue).unwrap();
        assert_eq!(json["year"], 2024);
        assert_eq!(json["monthlyRevenue"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn all_means_no_zone_or_role_filter() {
        let filters = DailyLogFilters {
            zone_id: Some("all".to_string()),
            role: Some("all".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.zone().unwrap(), None);
        assert_eq!(filters.crew_role().unwrap(), None);
    }

    #[test]
    fn concrete_zone_and_role_filters_parse() {
        let id = Uuid::from_u128(7);
        let filters = DailyLogFilters {
            zone_id: Some(id.to_string()),
            role: Some("Technician".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.zone().unwrap(), Some(id));
        assert_eq!(filters.crew_role().unwrap(), Some(CrewRole::Technician));
    }

    #[test]
    fn malformed_filters_are_validation_errors() {
        let filters = DailyLogFilters {
            zone_id: Some("north".to_string()),
            role: Some("Driver".to_string()),
            ..Default::default()
        };
        assert!(filters.zone().unwrap_err().is_validation());
        assert!(filters.crew_role().unwrap_err().is_validation());
    }

    #[test]
    fn filters_deserialize_from_camel_case_query() {
        let filters: DailyLogFilters = serde_json::from_value(serde_json::json!({
            "startDate": "2024-01-01",
            "endDate": "2024-01-31",
            "zoneId": "all"
        }))
        .unwrap();
        assert_eq!(filters.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filters.end_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert!(filters.date.is_none());
    }
}
