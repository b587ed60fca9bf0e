use crate::domain::models::booking::{Booking, BookingFilter, BookingPage};
use crate::domain::ports::BookingRepository;
use crate::domain::services::conflict::double_booking_conflict;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Pessimistic per-(tenant, trainer) serialization point. The UPDATE takes
/// SQLite's write lock for the remainder of the transaction, so a second
/// booking attempt blocks here (busy_timeout) until the first commits, then
/// re-evaluates overlap against the committed state.
async fn lock_trainer(
    tx: &mut Transaction<'_, Sqlite>,
    tenant_id: &str,
    trainer_id: &str,
) -> Result<(), AppError> {
    sqlx::query("INSERT OR IGNORE INTO trainer_schedule_locks (tenant_id, trainer_id, locked_at) VALUES (?, ?, NULL)")
        .bind(tenant_id)
        .bind(trainer_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::Database)?;
    sqlx::query("UPDATE trainer_schedule_locks SET locked_at = ? WHERE tenant_id = ? AND trainer_id = ?")
        .bind(Utc::now())
        .bind(tenant_id)
        .bind(trainer_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::Database)?;
    Ok(())
}

async fn overlapping_under_lock(
    tx: &mut Transaction<'_, Sqlite>,
    booking: &Booking,
) -> Result<Vec<Booking>, AppError> {
    sqlx::query_as::<_, Booking>(
        "SELECT * FROM schedule_bookings
         WHERE tenant_id = ? AND trainer_id = ? AND booking_date = ?
           AND status IN ('SCHEDULED', 'COMPLETED')
           AND start_time < ? AND end_time > ?",
    )
    .bind(&booking.tenant_id)
    .bind(&booking.trainer_id)
    .bind(booking.booking_date)
    .bind(&booking.end_time)
    .bind(&booking.start_time)
    .fetch_all(&mut **tx)
    .await
    .map_err(AppError::Database)
}

async fn deduct_entitlement(
    tx: &mut Transaction<'_, Sqlite>,
    tenant_id: &str,
    entitlement_id: &str,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE entitlements
         SET used_sessions = used_sessions + 1,
             remaining_sessions = remaining_sessions - 1,
             status = CASE WHEN remaining_sessions - 1 <= 0 THEN 'EXHAUSTED' ELSE status END
         WHERE id = ? AND tenant_id = ? AND status = 'ACTIVE' AND remaining_sessions >= 1",
    )
    .bind(entitlement_id)
    .bind(tenant_id)
    .execute(&mut **tx)
    .await
    .map_err(AppError::Database)?;

    if result.rows_affected() == 0 {
        return Err(AppError::InsufficientSessions);
    }
    Ok(())
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_scheduled(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        lock_trainer(&mut tx, &booking.tenant_id, &booking.trainer_id).await?;

        let existing = overlapping_under_lock(&mut tx, booking).await?;
        if let Some(detail) = double_booking_conflict(
            booking.booking_type,
            &booking.start_time,
            &booking.end_time,
            &existing,
            None,
        ) {
            return Err(AppError::BookingConflict(detail));
        }

        // The reservation happened outside the lock; re-validate it here so
        // the entitlement cannot be exhausted between check and insert.
        if let Some(entitlement_id) = &booking.entitlement_id {
            let ok = sqlx::query("SELECT 1 FROM entitlements WHERE id = ? AND tenant_id = ? AND status = 'ACTIVE' AND remaining_sessions >= 1")
                .bind(entitlement_id)
                .bind(&booking.tenant_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            if ok.is_none() {
                return Err(AppError::InsufficientSessions);
            }
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO schedule_bookings (id, tenant_id, booking_type, member_id, trainer_id, entitlement_id, booking_date, start_time, end_time, duration_minutes, status, notes, completed_at, cancelled_at, cancelled_reason, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&booking.id)
        .bind(&booking.tenant_id)
        .bind(booking.booking_type)
        .bind(&booking.member_id)
        .bind(&booking.trainer_id)
        .bind(&booking.entitlement_id)
        .bind(booking.booking_date)
        .bind(&booking.start_time)
        .bind(&booking.end_time)
        .bind(booking.duration_minutes)
        .bind(booking.status)
        .bind(&booking.notes)
        .bind(booking.completed_at)
        .bind(booking.cancelled_at)
        .bind(&booking.cancelled_reason)
        .bind(booking.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn reschedule(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        lock_trainer(&mut tx, &booking.tenant_id, &booking.trainer_id).await?;

        let existing = overlapping_under_lock(&mut tx, booking).await?;
        if let Some(detail) = double_booking_conflict(
            booking.booking_type,
            &booking.start_time,
            &booking.end_time,
            &existing,
            Some(&booking.id),
        ) {
            return Err(AppError::BookingConflict(detail));
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE schedule_bookings
             SET booking_date = ?, start_time = ?, end_time = ?, duration_minutes = ?, notes = ?
             WHERE id = ? AND tenant_id = ? AND status = 'SCHEDULED'
             RETURNING *",
        )
        .bind(booking.booking_date)
        .bind(&booking.start_time)
        .bind(&booking.end_time)
        .bind(booking.duration_minutes)
        .bind(&booking.notes)
        .bind(&booking.id)
        .bind(&booking.tenant_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::InvalidTransition("Only scheduled bookings can be updated".into()))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn update_notes(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE schedule_bookings SET notes = ? WHERE id = ? AND tenant_id = ? RETURNING *",
        )
        .bind(&booking.notes)
        .bind(&booking.id)
        .bind(&booking.tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM schedule_bookings WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, tenant_id: &str, filter: &BookingFilter) -> Result<BookingPage, AppError> {
        let where_clause = "tenant_id = ?
            AND (? IS NULL OR trainer_id = ?)
            AND (? IS NULL OR member_id = ?)
            AND (? IS NULL OR status = ?)
            AND (? IS NULL OR booking_type = ?)
            AND (? IS NULL OR booking_date = ?)
            AND (? IS NULL OR booking_date >= ?)
            AND (? IS NULL OR booking_date <= ?)";

        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, 100);
        let offset = (page - 1) * limit;

        let items = sqlx::query_as::<_, Booking>(&format!(
            "SELECT * FROM schedule_bookings WHERE {}
             ORDER BY booking_date DESC, start_time ASC
             LIMIT ? OFFSET ?",
            where_clause
        ))
        .bind(tenant_id)
        .bind(&filter.trainer_id).bind(&filter.trainer_id)
        .bind(&filter.member_id).bind(&filter.member_id)
        .bind(filter.status).bind(filter.status)
        .bind(filter.booking_type).bind(filter.booking_type)
        .bind(filter.date).bind(filter.date)
        .bind(filter.date_from).bind(filter.date_from)
        .bind(filter.date_to).bind(filter.date_to)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let total = sqlx::query(&format!(
            "SELECT COUNT(*) as count FROM schedule_bookings WHERE {}",
            where_clause
        ))
        .bind(tenant_id)
        .bind(&filter.trainer_id).bind(&filter.trainer_id)
        .bind(&filter.member_id).bind(&filter.member_id)
        .bind(filter.status).bind(filter.status)
        .bind(filter.booking_type).bind(filter.booking_type)
        .bind(filter.date).bind(filter.date)
        .bind(filter.date_from).bind(filter.date_from)
        .bind(filter.date_to).bind(filter.date_to)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?
        .get::<i64, _>("count");

        Ok(BookingPage {
            items,
            total,
            page,
            limit,
        })
    }

    async fn list_active_for_day(
        &self,
        tenant_id: &str,
        trainer_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM schedule_bookings
             WHERE tenant_id = ? AND trainer_id = ? AND booking_date = ?
               AND status IN ('SCHEDULED', 'COMPLETED')
             ORDER BY start_time ASC",
        )
        .bind(tenant_id)
        .bind(trainer_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list_calendar_range(
        &self,
        tenant_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM schedule_bookings
             WHERE tenant_id = ? AND booking_date >= ? AND booking_date <= ?
               AND status IN ('SCHEDULED', 'COMPLETED')
             ORDER BY booking_date ASC, start_time ASC",
        )
        .bind(tenant_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn complete(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(entitlement_id) = &booking.entitlement_id {
            deduct_entitlement(&mut tx, &booking.tenant_id, entitlement_id).await?;
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE schedule_bookings SET status = 'COMPLETED', completed_at = ?
             WHERE id = ? AND tenant_id = ? AND status = 'SCHEDULED'
             RETURNING *",
        )
        .bind(booking.completed_at)
        .bind(&booking.id)
        .bind(&booking.tenant_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| {
            AppError::InvalidTransition("Only scheduled bookings can be completed".into())
        })?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn cancel(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE schedule_bookings SET status = 'CANCELLED', cancelled_at = ?, cancelled_reason = ?
             WHERE id = ? AND tenant_id = ? AND status = 'SCHEDULED'
             RETURNING *",
        )
        .bind(booking.cancelled_at)
        .bind(&booking.cancelled_reason)
        .bind(&booking.id)
        .bind(&booking.tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::InvalidTransition("Only scheduled bookings can be cancelled".into()))
    }

    async fn mark_no_show(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        if let Some(entitlement_id) = &booking.entitlement_id {
            deduct_entitlement(&mut tx, &booking.tenant_id, entitlement_id).await?;
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE schedule_bookings SET status = 'NO_SHOW'
             WHERE id = ? AND tenant_id = ? AND status = 'SCHEDULED'
             RETURNING *",
        )
        .bind(&booking.id)
        .bind(&booking.tenant_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| {
            AppError::InvalidTransition("Only scheduled bookings can be marked as no-show".into())
        })?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
}
