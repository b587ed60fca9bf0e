use crate::domain::models::entitlement::{Entitlement, EntitlementKind};
use crate::domain::ports::EntitlementRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteEntitlementRepo {
    pool: SqlitePool,
}

impl SqliteEntitlementRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntitlementRepository for SqliteEntitlementRepo {
    async fn create(&self, entitlement: &Entitlement) -> Result<Entitlement, AppError> {
        sqlx::query_as::<_, Entitlement>(
            "INSERT INTO entitlements (id, tenant_id, member_id, kind, total_sessions, used_sessions, remaining_sessions, status, expiry_date, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&entitlement.id)
        .bind(&entitlement.tenant_id)
        .bind(&entitlement.member_id)
        .bind(entitlement.kind)
        .bind(entitlement.total_sessions)
        .bind(entitlement.used_sessions)
        .bind(entitlement.remaining_sessions)
        .bind(entitlement.status)
        .bind(entitlement.expiry_date)
        .bind(&entitlement.notes)
        .bind(entitlement.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Entitlement>, AppError> {
        sqlx::query_as::<_, Entitlement>(
            "SELECT * FROM entitlements WHERE tenant_id = ? AND id = ?",
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn find_oldest_active(
        &self,
        tenant_id: &str,
        member_id: &str,
        kind: EntitlementKind,
    ) -> Result<Option<Entitlement>, AppError> {
        sqlx::query_as::<_, Entitlement>(
            "SELECT * FROM entitlements
             WHERE tenant_id = ? AND member_id = ? AND kind = ?
               AND status = 'ACTIVE' AND remaining_sessions >= 1
             ORDER BY created_at ASC
             LIMIT 1",
        )
        .bind(tenant_id)
        .bind(member_id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_by_member(
        &self,
        tenant_id: &str,
        member_id: &str,
    ) -> Result<Vec<Entitlement>, AppError> {
        sqlx::query_as::<_, Entitlement>(
            "SELECT * FROM entitlements
             WHERE tenant_id = ? AND member_id = ?
             ORDER BY created_at ASC",
        )
        .bind(tenant_id)
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn deduct_session(&self, tenant_id: &str, id: &str) -> Result<Entitlement, AppError> {
        let updated = sqlx::query_as::<_, Entitlement>(
            "UPDATE entitlements
             SET used_sessions = used_sessions + 1,
                 remaining_sessions = remaining_sessions - 1,
                 status = CASE WHEN remaining_sessions - 1 <= 0 THEN 'EXHAUSTED' ELSE status END
             WHERE id = ? AND tenant_id = ? AND status = 'ACTIVE' AND remaining_sessions >= 1
             RETURNING *",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        match updated {
            Some(e) => Ok(e),
            // Distinguish a missing row from one that cannot be consumed.
            None => match self.find_by_id(tenant_id, id).await? {
                Some(_) => Err(AppError::InsufficientSessions),
                None => Err(AppError::NotFound("Entitlement not found".into())),
            },
        }
    }

    async fn find_expired_active(&self, today: NaiveDate) -> Result<Vec<Entitlement>, AppError> {
        sqlx::query_as::<_, Entitlement>(
            "SELECT * FROM entitlements
             WHERE status = 'ACTIVE' AND expiry_date IS NOT NULL AND expiry_date < ?",
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn mark_expired(&self, tenant_id: &str, id: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE entitlements SET status = 'EXPIRED'
             WHERE id = ? AND tenant_id = ? AND status = 'ACTIVE'",
        )
        .bind(id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;
        Ok(())
    }
}
