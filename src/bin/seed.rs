//! Seed script for development. Populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env). Logs are written for the trailing two
//! weeks so the default dashboard window has activity.

use chrono::{Days, NaiveDate};
use crewboard::config::AppConfig;
use crewboard::models::crew::{Crew, CrewRole, CrewStatus};
use crewboard::models::daily_log::CreateDailyLog;
use crewboard::models::zone::Zone;
use crewboard::services::{calendar, daily_log};
use sqlx::PgPool;

const LOG_DAYS: u64 = 14;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let pool = crewboard::db::create_pool(&config.database_url, 5).await?;

    // Run migrations first
    crewboard::db::run_migrations(&pool).await?;

    println!("=== crewboard Seed Script ===");

    let zones = seed_zones(&pool).await?;
    let crews = seed_crews(&pool, &zones).await?;
    seed_daily_logs(&pool, &crews, config.today()).await?;

    println!("\n=== Seed complete! ===");
    Ok(())
}

async fn seed_zones(pool: &PgPool) -> anyhow::Result<Vec<Zone>> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM zones")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Zones already exist ({count})");
        let zones = sqlx::query_as::<_, Zone>("SELECT * FROM zones ORDER BY name")
            .fetch_all(pool)
            .await?;
        return Ok(zones);
    }

    let definitions = [
        ("Harbour District", "Commercial", "Active"),
        ("Northside Estates", "Residential", "Active"),
        ("Industrial Park", "Industrial", "Active"),
        ("Old Town", "Residential", "Inactive"),
    ];

    let mut zones = Vec::with_capacity(definitions.len());
    for (name, zone_type, status) in definitions {
        let zone = sqlx::query_as::<_, Zone>(
            "INSERT INTO zones (name, zone_type, status) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(zone_type)
        .bind(status)
        .fetch_one(pool)
        .await?;
        zones.push(zone);
    }

    println!("[done] Created {} zones", zones.len());
    Ok(zones)
}

async fn seed_crews(pool: &PgPool, zones: &[Zone]) -> anyhow::Result<Vec<Crew>> {
    let select = "SELECT id, first_name, last_name, date_of_joining, zone_id, role, status, \
                  scheduled_hours::FLOAT8 AS scheduled_hours, efficiency, created_at FROM crews";

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM crews")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Crews already exist ({count})");
        let crews = sqlx::query_as::<_, Crew>(select).fetch_all(pool).await?;
        return Ok(crews);
    }

    // (first, last, zone index, role, status, scheduled hours)
    let roster = [
        ("Amira", "Haddad", Some(0), CrewRole::Technician, CrewStatus::Active, 8.0),
        ("Jonas", "Berg", Some(0), CrewRole::Cleaner, CrewStatus::Active, 6.0),
        ("Priya", "Nair", Some(1), CrewRole::Technician, CrewStatus::Active, 8.0),
        ("Tomás", "Ruiz", Some(1), CrewRole::Cleaner, CrewStatus::OnLeave, 6.0),
        ("Lena", "Fischer", Some(2), CrewRole::Technician, CrewStatus::Active, 9.0),
        ("Kwame", "Mensah", Some(2), CrewRole::Technician, CrewStatus::Maintenance, 8.0),
        ("Sofia", "Marino", None, CrewRole::Cleaner, CrewStatus::Inactive, 4.0),
    ];

    let mut crews = Vec::with_capacity(roster.len());
    for (first, last, zone_index, role, status, hours) in roster {
        let zone_id = zone_index.and_then(|i: usize| zones.get(i)).map(|z| z.id);
        let crew = sqlx::query_as::<_, Crew>(
            "INSERT INTO crews (first_name, last_name, zone_id, role, status, scheduled_hours) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, first_name, last_name, date_of_joining, zone_id, role, status, \
                       scheduled_hours::FLOAT8 AS scheduled_hours, efficiency, created_at",
        )
        .bind(first)
        .bind(last)
        .bind(zone_id)
        .bind(role)
        .bind(status)
        .bind(hours)
        .fetch_one(pool)
        .await?;
        crews.push(crew);
    }

    println!("[done] Created {} crews", crews.len());
    Ok(crews)
}

async fn seed_daily_logs(pool: &PgPool, crews: &[Crew], today: NaiveDate) -> anyhow::Result<()> {
    let mut entries = Vec::new();

    for offset in 0..LOG_DAYS {
        let Some(date) = today.checked_sub_days(Days::new(offset)) else {
            continue;
        };
        if !calendar::is_working_day(date) {
            continue;
        }

        for (index, crew) in crews.iter().enumerate() {
            if crew.status != CrewStatus::Active {
                continue;
            }
            // Vary output a little per crew and day so charts are not flat.
            let shortfall = ((offset as usize + index) % 4) as f64;
            let hours_worked = (crew.scheduled_hours - shortfall).max(0.0);
            let jobs_completed = (hours_worked / 2.0).floor() as i32;
            let revenue_per_job = match crew.role {
                CrewRole::Technician => 120.0,
                CrewRole::Cleaner => 45.0,
            };

            entries.push(CreateDailyLog {
                date,
                crew_id: crew.id,
                hours_worked,
                jobs_completed,
                revenue_per_job: Some(revenue_per_job),
                total_revenue: revenue_per_job * jobs_completed as f64,
            });
        }
    }

    if entries.is_empty() {
        println!("[skip] No active crews to log");
        return Ok(());
    }

    let saved = daily_log::upsert_many(pool, &entries).await?;
    println!("[done] Upserted {} daily logs", saved.len());
    Ok(())
}
