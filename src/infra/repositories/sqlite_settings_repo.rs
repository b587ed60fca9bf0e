use crate::domain::models::settings::SchedulingSettings;
use crate::domain::ports::SchedulingSettingsRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteSettingsRepo {
    pool: SqlitePool,
}

impl SqliteSettingsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchedulingSettingsRepository for SqliteSettingsRepo {
    async fn get(&self, tenant_id: &str) -> Result<SchedulingSettings, AppError> {
        let stored = sqlx::query_as::<_, SchedulingSettings>(
            "SELECT * FROM tenant_scheduling_settings WHERE tenant_id = ?",
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
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (tenant_id) DO UPDATE SET
                 slot_duration_minutes = excluded.slot_duration_minutes,
                 booking_lead_time_hours = excluded.booking_lead_time_hours,
                 cancellation_window_hours = excluded.cancellation_window_hours,
                 updated_at = excluded.updated_at
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
