use crate::domain::models::availability::TemplateSlot;
use crate::domain::ports::TrainerAvailabilityRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAvailabilityRepo {
    pool: PgPool,
}

impl PostgresAvailabilityRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrainerAvailabilityRepository for PostgresAvailabilityRepo {
    async fn list_template(
        &self,
        tenant_id: &str,
        trainer_id: &str,
    ) -> Result<Vec<TemplateSlot>, AppError> {
        sqlx::query_as::<_, TemplateSlot>(
            "SELECT * FROM trainer_availability
             WHERE tenant_id = $1 AND trainer_id = $2
             ORDER BY day_of_week ASC, start_time ASC",
        )
        .bind(tenant_id)
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn replace_template(
        &self,
        tenant_id: &str,
        trainer_id: &str,
        slots: &[TemplateSlot],
    ) -> Result<Vec<TemplateSlot>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM trainer_availability WHERE tenant_id = $1 AND trainer_id = $2")
            .bind(tenant_id)
            .bind(trainer_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for slot in slots {
            sqlx::query(
                "INSERT INTO trainer_availability (id, tenant_id, trainer_id, day_of_week, start_time, end_time, is_active, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(&slot.id)
            .bind(tenant_id)
            .bind(trainer_id)
            .bind(slot.day_of_week)
            .bind(&slot.start_time)
            .bind(&slot.end_time)
            .bind(slot.is_active)
            .bind(slot.created_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        self.list_template(tenant_id, trainer_id).await
    }

    async fn list_active_for_day(
        &self,
        tenant_id: &str,
        trainer_id: &str,
        day_of_week: i32,
    ) -> Result<Vec<TemplateSlot>, AppError> {
        sqlx::query_as::<_, TemplateSlot>(
            "SELECT * FROM trainer_availability
             WHERE tenant_id = $1 AND trainer_id = $2 AND day_of_week = $3 AND is_active = TRUE
             ORDER BY start_time ASC",
        )
        .bind(tenant_id)
        .bind(trainer_id)
        .bind(day_of_week)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_active(&self, tenant_id: &str) -> Result<Vec<TemplateSlot>, AppError> {
        sqlx::query_as::<_, TemplateSlot>(
            "SELECT * FROM trainer_availability
             WHERE tenant_id = $1 AND is_active = TRUE
             ORDER BY trainer_id ASC, day_of_week ASC, start_time ASC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
