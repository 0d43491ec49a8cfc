//! Operational zone model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    /// Commercial, Residential, ...
    #[serde(rename = "type")]
    pub zone_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Zone with lifetime activity metrics for the zone management view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneWithMetrics {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    pub status: String,
    pub crew_count: i64,
    pub total_revenue: f64,
    pub total_hours: f64,
    pub utilization: i64,
}
