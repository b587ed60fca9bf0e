use crate::domain::models::settings::SchedulingSettings;
use crate::domain::ports::SchedulingSettingsRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresSettingsRepo {
    pool: PgPool,
}

impl PostgresSettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchedulingSettingsRepository for PostgresSettingsRepo {
    async fn get(&self, tenant_id: &str) -> Result<SchedulingSettings, AppError> {
        let stored = sqlx::query_as::<_, SchedulingSettings>(
            "SELECT * FROM tenant_scheduling_settings WHERE tenant_id = $1",
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(stored.unwrap_or_else(|| SchedulingSettings::defaults(tenant_id)))
    }

    async fn upsert(&self, settings: &SchedulingSettings) -> Result<SchedulingSettings, AppError> {
        sqlx::query_as::<_, SchedulingSettings>(
            "INSERT INTO tenant_scheduling_settings (tenant_id, slot_duration_minutes, booking_lead_time_hours, cancellation_window_hours, updated_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (tenant_id) DO UPDATE SET
                 slot_duration_minutes = EXCLUDED.slot_duration_minutes,
                 booking_lead_time_hours = EXCLUDED.booking_lead_time_hours,
                 cancellation_window_hours = EXCLUDED.cancellation_window_hours,
                 updated_at = EXCLUDED.updated_at
             RETURNING *",
        )
        .bind(&settings.tenant_id)
        .bind(settings.slot_duration_minutes)
        .bind(settings.booking_lead_time_hours)
        .bind(settings.cancellation_window_hours)
        .bind(settings.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
