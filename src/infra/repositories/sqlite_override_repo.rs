use crate::domain::models::availability::AvailabilityOverride;
use crate::domain::ports::AvailabilityOverrideRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteOverrideRepo {
    pool: SqlitePool,
}

impl SqliteOverrideRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityOverrideRepository for SqliteOverrideRepo {
    async fn create(&self, entity: &AvailabilityOverride) -> Result<AvailabilityOverride, AppError> {
        sqlx::query_as::<_, AvailabilityOverride>(
            "INSERT INTO trainer_availability_overrides (id, tenant_id, trainer_id, date, override_type, start_time, end_time, reason, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&entity.id)
        .bind(&entity.tenant_id)
        .bind(&entity.trainer_id)
        .bind(entity.date)
        .bind(entity.override_type)
        .bind(&entity.start_time)
        .bind(&entity.end_time)
        .bind(&entity.reason)
        .bind(entity.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn delete(&self, tenant_id: &str, trainer_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM trainer_availability_overrides WHERE tenant_id = ? AND trainer_id = ? AND id = ?",
        )
        .bind(tenant_id)
        .bind(trainer_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Override not found".into()));
        }
        Ok(())
    }

    async fn list_for_date(
        &self,
        tenant_id: &str,
        trainer_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilityOverride>, AppError> {
        sqlx::query_as::<_, AvailabilityOverride>(
            "SELECT * FROM trainer_availability_overrides
             WHERE tenant_id = ? AND trainer_id = ? AND date = ?
             ORDER BY created_at ASC",
        )
        .bind(tenant_id)
        .bind(trainer_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_by_range(
        &self,
        tenant_id: &str,
        trainer_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AvailabilityOverride>, AppError> {
        sqlx::query_as::<_, AvailabilityOverride>(
            "SELECT * FROM trainer_availability_overrides
             WHERE tenant_id = ? AND trainer_id = ? AND date >= ? AND date <= ?
             ORDER BY date ASC, created_at ASC",
        )
        .bind(tenant_id)
        .bind(trainer_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_in_range(
        &self,
        tenant_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AvailabilityOverride>, AppError> {
        sqlx::query_as::<_, AvailabilityOverride>(
            "SELECT * FROM trainer_availability_overrides
             WHERE tenant_id = ? AND date >= ? AND date <= ?
             ORDER BY date ASC, created_at ASC",
        )
        .bind(tenant_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
