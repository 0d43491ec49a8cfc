//! Crew member model.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "crew_role")]
pub enum CrewRole {
    Technician,
    Cleaner,
}

impl FromStr for CrewRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Technician" => Ok(Self::Technician),
            "Cleaner" => Ok(Self::Cleaner),
            other => Err(format!("Unknown crew role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "crew_status")]
pub enum CrewStatus {
    Active,
    Inactive,
    #[serde(rename = "On Leave")]
    #[sqlx(rename = "On Leave")]
    OnLeave,
    Maintenance,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Crew {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_joining: NaiveDate,
    pub zone_id: Option<Uuid>,
    pub role: CrewRole,
    pub status: CrewStatus,
    /// Daily capacity in hours.
    pub scheduled_hours: f64,
    pub efficiency: i32,
    pub created_at: DateTime<Utc>,
}
