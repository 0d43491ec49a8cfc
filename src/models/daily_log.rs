//! Daily activity log model: one crew's work on one calendar date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::crew::CrewRole;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Cleared when the crew is deleted; the log itself is retained.
    pub crew_id: Option<Uuid>,
    pub hours_worked: f64,
    pub jobs_completed: i32,
    pub revenue_per_job: f64,
    /// Caller-supplied, not derived from `revenue_per_job * jobs_completed`.
    pub total_revenue: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Largest magnitude a NUMERIC(10,2) column holds.
pub const MAX_MONEY: f64 = 99_999_999.99;
pub const MIN_MONEY: f64 = -MAX_MONEY;

/// Input for creating or updating the log keyed by `(date, crew_id)`.
///
/// Accepted ranges:
/// - `hoursWorked`: 0 to 24, one crew cannot log more than a day.
/// - `jobsCompleted`: 0 or more.
/// - `revenuePerJob`: 0 to [`MAX_MONEY`].
/// - `totalRevenue`: within ±[`MAX_MONEY`]; negative values record adjustments.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDailyLog {
    pub date: NaiveDate,
    pub crew_id: Uuid,
    #[validate(range(min = 0.0, max = 24.0))]
    pub hours_worked: f64,
    #[validate(range(min = 0))]
    pub jobs_completed: i32,
    #[validate(range(min = 0.0, max = MAX_MONEY))]
    pub revenue_per_job: Option<f64>,
    #[validate(range(min = MIN_MONEY, max = MAX_MONEY))]
    pub total_revenue: f64,
}

/// POST body: a single log entry or a batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DailyLogPayload {
    Many(Vec<CreateDailyLog>),
    One(CreateDailyLog),
}

impl DailyLogPayload {
    pub fn into_entries(self) -> Vec<CreateDailyLog> {
        match self {
            Self::Many(entries) => entries,
            Self::One(entry) => vec![entry],
        }
    }
}

/// Log row joined with crew and zone display fields for list views.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub crew_id: Option<Uuid>,
    pub hours_worked: f64,
    pub jobs_completed: i32,
    pub revenue_per_job: f64,
    pub total_revenue: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub crew_first_name: Option<String>,
    pub crew_last_name: Option<String>,
    pub crew_role: Option<CrewRole>,
    pub zone_id: Option<Uuid>,
    pub zone_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry_json() -> serde_json::Value {
        json!({
            "date": "2024-03-04",
            "crewId": "6f1c1f3e-7d2a-4a51-9f0e-2b8f4c1d9a10",
            "hoursWorked": 7.5,
            "jobsCompleted": 3,
            "totalRevenue": 450.0
        })
    }

    #[test]
    fn payload_accepts_single_object() {
        let payload: DailyLogPayload = serde_json::from_value(entry_json()).unwrap();
        let entries = payload.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(entries[0].revenue_per_job, None);
    }

    #[test]
    fn payload_accepts_array() {
        let payload: DailyLogPayload =
            serde_json::from_value(json!([entry_json(), entry_json()])).unwrap();
        assert_eq!(payload.into_entries().len(), 2);
    }

    #[test]
    fn payload_rejects_missing_required_field() {
        let mut body = entry_json();
        body.as_object_mut().unwrap().remove("hoursWorked");
        assert!(serde_json::from_value::<DailyLogPayload>(body).is_err());
    }

    #[test]
    fn payload_rejects_malformed_date() {
        let mut body = entry_json();
        body["date"] = json!("04/03/2024");
        assert!(serde_json::from_value::<DailyLogPayload>(body).is_err());
    }

    #[test]
    fn negative_hours_fail_validation() {
        let mut body = entry_json();
        body["hoursWorked"] = json!(-1.0);
        let entry: CreateDailyLog = serde_json::from_value(body).unwrap();
        let errors = entry.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("hours_worked"));
    }

    #[test]
    fn revenue_beyond_column_precision_fails_validation() {
        let mut body = entry_json();
        body["totalRevenue"] = json!(1.0e9);
        body["revenuePerJob"] = json!(1.0e8);
        let entry: CreateDailyLog = serde_json::from_value(body).unwrap();
        let errors = entry.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("total_revenue"));
        assert!(errors.field_errors().contains_key("revenue_per_job"));
    }

    #[test]
    fn negative_total_revenue_is_an_adjustment() {
        let mut body = entry_json();
        body["totalRevenue"] = json!(-120.0);
        let entry: CreateDailyLog = serde_json::from_value(body).unwrap();
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn valid_entry_passes_validation() {
        let entry: CreateDailyLog = serde_json::from_value(entry_json()).unwrap();
        assert!(entry.validate().is_ok());
    }
}
