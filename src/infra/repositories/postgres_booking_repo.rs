use crate::domain::models::booking::{Booking, BookingFilter, BookingPage};
use crate::domain::ports::BookingRepository;
use crate::domain::services::conflict::double_booking_conflict;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row lock on the trainer's entry in trainer_schedule_locks. Concurrent
/// booking attempts for the same trainer queue on the FOR UPDATE and
/// re-evaluate overlap against the winner's committed row.
async fn lock_trainer(
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: &str,
    trainer_id: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO trainer_schedule_locks (tenant_id, trainer_id, locked_at)
         VALUES ($1, $2, NULL)
         ON CONFLICT (tenant_id, trainer_id) DO NOTHING",
    )
    .bind(tenant_id)
    .bind(trainer_id)
    .execute(&mut **tx)
    .await
    .map_err(AppError::Database)?;
    sqlx::query(
        "SELECT 1 FROM trainer_schedule_locks WHERE tenant_id = $1 AND trainer_id = $2 FOR UPDATE",
    )
    .bind(tenant_id)
    .bind(trainer_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(AppError::Database)?;
    Ok(())
}

async fn overlapping_under_lock(
    tx: &mut Transaction<'_, Postgres>,
    booking: &Booking,
) -> Result<Vec<Booking>, AppError> {
    sqlx::query_as::<_, Booking>(
        "SELECT * FROM schedule_bookings
         WHERE tenant_id = $1 AND trainer_id = $2 AND booking_date = $3
           AND status IN ('SCHEDULED', 'COMPLETED')
           AND start_time < $4 AND end_time > $5",
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
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: &str,
    entitlement_id: &str,
) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE entitlements
         SET used_sessions = used_sessions + 1,
             remaining_sessions = remaining_sessions - 1,
             status = CASE WHEN remaining_sessions - 1 <= 0 THEN 'EXHAUSTED'::entitlement_status ELSE status END
         WHERE id = $1 AND tenant_id = $2 AND status = 'ACTIVE' AND remaining_sessions >= 1",
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
impl BookingRepository for PostgresBookingRepo {
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

        if let Some(entitlement_id) = &booking.entitlement_id {
            let ok = sqlx::query(
                "SELECT 1 FROM entitlements WHERE id = $1 AND tenant_id = $2 AND status = 'ACTIVE' AND remaining_sessions >= 1",
            )
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
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
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
             SET booking_date = $1, start_time = $2, end_time = $3, duration_minutes = $4, notes = $5
             WHERE id = $6 AND tenant_id = $7 AND status = 'SCHEDULED'
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
            "UPDATE schedule_bookings SET notes = $1 WHERE id = $2 AND tenant_id = $3 RETURNING *",
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
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM schedule_bookings WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn list(&self, tenant_id: &str, filter: &BookingFilter) -> Result<BookingPage, AppError> {
        let where_clause = "tenant_id = $1
            AND ($2 IS NULL OR trainer_id = $2)
            AND ($3 IS NULL OR member_id = $3)
            AND ($4 IS NULL OR status = $4)
            AND ($5 IS NULL OR booking_type = $5)
            AND ($6 IS NULL OR booking_date = $6)
            AND ($7 IS NULL OR booking_date >= $7)
            AND ($8 IS NULL OR booking_date <= $8)";

        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, 100);
        let offset = (page - 1) * limit;

        let items = sqlx::query_as::<_, Booking>(&format!(
            "SELECT * FROM schedule_bookings WHERE {}
             ORDER BY booking_date DESC, start_time ASC
             LIMIT $9 OFFSET $10",
            where_clause
        ))
        .bind(tenant_id)
        .bind(&filter.trainer_id)
        .bind(&filter.member_id)
        .bind(filter.status)
        .bind(filter.booking_type)
        .bind(filter.date)
        .bind(filter.date_from)
        .bind(filter.date_to)
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
        .bind(&filter.trainer_id)
        .bind(&filter.member_id)
        .bind(filter.status)
        .bind(filter.booking_type)
        .bind(filter.date)
        .bind(filter.date_from)
        .bind(filter.date_to)
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
             WHERE tenant_id = $1 AND trainer_id = $2 AND booking_date = $3
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
             WHERE tenant_id = $1 AND booking_date >= $2 AND booking_date <= $3
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
            "UPDATE schedule_bookings SET status = 'COMPLETED', completed_at = $1
             WHERE id = $2 AND tenant_id = $3 AND status = 'SCHEDULED'
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
            "UPDATE schedule_bookings SET status = 'CANCELLED', cancelled_at = $1, cancelled_reason = $2
             WHERE id = $3 AND tenant_id = $4 AND status = 'SCHEDULED'
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
             WHERE id = $1 AND tenant_id = $2 AND status = 'SCHEDULED'
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
