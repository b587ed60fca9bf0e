use crate::domain::models::availability::AvailabilityOverride;
use crate::domain::ports::AvailabilityOverrideRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresOverrideRepo {
    pool: PgPool,
}

impl PostgresOverrideRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityOverrideRepository for PostgresOverrideRepo {
    async fn create(&self, entity: &AvailabilityOverride) -> Result<AvailabilityOverride, AppError> {
        sqlx::query_as::<_, AvailabilityOverride>(
            "INSERT INTO trainer_availability_overrides (id, tenant_id, trainer_id, date, override_type, start_time, end_time, reason, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
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
            "DELETE FROM trainer_availability_overrides WHERE tenant_id = $1 AND trainer_id = $2 AND id = $3",
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
             WHERE tenant_id = $1 AND trainer_id = $2 AND date = $3
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
             WHERE tenant_id = $1 AND trainer_id = $2 AND date >= $3 AND date <= $4
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
             WHERE tenant_id = $1 AND date >= $2 AND date <= $3
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
