use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::{
    AvailabilityOverrideRepository, BookingRepository, EntitlementRepository,
    SchedulingSettingsRepository, TrainerAvailabilityRepository,
};
use crate::domain::services::booking_lifecycle::BookingService;
use crate::domain::services::calendar::CalendarAggregator;
use crate::infra::repositories::{
    postgres_availability_repo::PostgresAvailabilityRepo,
    postgres_booking_repo::PostgresBookingRepo,
    postgres_entitlement_repo::PostgresEntitlementRepo,
    postgres_override_repo::PostgresOverrideRepo, postgres_settings_repo::PostgresSettingsRepo,
    sqlite_availability_repo::SqliteAvailabilityRepo, sqlite_booking_repo::SqliteBookingRepo,
    sqlite_entitlement_repo::SqliteEntitlementRepo, sqlite_override_repo::SqliteOverrideRepo,
    sqlite_settings_repo::SqliteSettingsRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        assemble(
            config,
            Arc::new(PostgresAvailabilityRepo::new(pool.clone())),
            Arc::new(PostgresOverrideRepo::new(pool.clone())),
            Arc::new(PostgresBookingRepo::new(pool.clone())),
            Arc::new(PostgresEntitlementRepo::new(pool.clone())),
            Arc::new(PostgresSettingsRepo::new(pool)),
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        assemble(
            config,
            Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
            Arc::new(SqliteOverrideRepo::new(pool.clone())),
            Arc::new(SqliteBookingRepo::new(pool.clone())),
            Arc::new(SqliteEntitlementRepo::new(pool.clone())),
            Arc::new(SqliteSettingsRepo::new(pool)),
        )
    }
}

fn assemble(
    config: &Config,
    availability_repo: Arc<dyn TrainerAvailabilityRepository>,
    override_repo: Arc<dyn AvailabilityOverrideRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    entitlement_repo: Arc<dyn EntitlementRepository>,
    settings_repo: Arc<dyn SchedulingSettingsRepository>,
) -> AppState {
    let booking_service = Arc::new(BookingService::new(
        booking_repo.clone(),
        availability_repo.clone(),
        override_repo.clone(),
        entitlement_repo.clone(),
        settings_repo.clone(),
    ));
    let calendar = Arc::new(CalendarAggregator::new(
        booking_repo.clone(),
        availability_repo.clone(),
        override_repo.clone(),
    ));

    AppState {
        config: config.clone(),
        availability_repo,
        override_repo,
        booking_repo,
        entitlement_repo,
        settings_repo,
        booking_service,
        calendar,
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
