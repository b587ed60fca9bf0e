use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::domain::models::booking::{
    Booking, BookingStatus, BookingType, NewBookingParams,
};
use crate::domain::ports::{
    AvailabilityOverrideRepository, BookingRepository, EntitlementRepository,
    SchedulingSettingsRepository, TrainerAvailabilityRepository,
};
use crate::error::AppError;
use super::conflict::{ConflictCheckRequest, ConflictResolver};
use super::entitlement_ledger::EntitlementLedger;
use super::window_algebra;

pub struct CreateBookingParams {
    pub booking_type: BookingType,
    pub member_id: String,
    pub trainer_id: String,
    pub entitlement_id: Option<String>,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

#[derive(Default)]
pub struct UpdateBookingParams {
    pub booking_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

/// The booking state machine. SCHEDULED is the only non-terminal state;
/// COMPLETED, CANCELLED and NO_SHOW accept no further transitions.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    settings: Arc<dyn SchedulingSettingsRepository>,
    resolver: ConflictResolver,
    ledger: EntitlementLedger,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        templates: Arc<dyn TrainerAvailabilityRepository>,
        overrides: Arc<dyn AvailabilityOverrideRepository>,
        entitlements: Arc<dyn EntitlementRepository>,
        settings: Arc<dyn SchedulingSettingsRepository>,
    ) -> Self {
        let resolver = ConflictResolver::new(templates, overrides, bookings.clone());
        let ledger = EntitlementLedger::new(entitlements);
        Self {
            bookings,
            settings,
            resolver,
            ledger,
        }
    }

    pub async fn create(
        &self,
        tenant_id: &str,
        params: CreateBookingParams,
    ) -> Result<Booking, AppError> {
        let settings = self.settings.get(tenant_id).await?;
        if params.duration_minutes <= 0
            || params.duration_minutes % settings.slot_duration_minutes != 0
        {
            return Err(AppError::Validation(format!(
                "INVALID_DURATION: duration must be a positive multiple of {} minutes",
                settings.slot_duration_minutes
            )));
        }

        let (start_time, end_time) =
            booking_window(&params.start_time, params.duration_minutes)?;

        let check = ConflictCheckRequest {
            trainer_id: params.trainer_id.clone(),
            booking_date: params.booking_date,
            start_time: start_time.clone(),
            end_time: end_time.clone(),
            booking_type: params.booking_type,
        };
        if let Some(detail) = self
            .resolver
            .check_for_conflicts(tenant_id, &check, None)
            .await?
        {
            return Err(AppError::BookingConflict(detail));
        }

        let entitlement_id = self
            .ledger
            .reserve(
                tenant_id,
                &params.member_id,
                params.booking_type,
                params.entitlement_id.as_deref(),
            )
            .await?;

        let booking = Booking::new(NewBookingParams {
            tenant_id: tenant_id.to_string(),
            booking_type: params.booking_type,
            member_id: params.member_id,
            trainer_id: params.trainer_id,
            entitlement_id: Some(entitlement_id),
            booking_date: params.booking_date,
            start_time,
            end_time,
            duration_minutes: params.duration_minutes,
            notes: params.notes,
        });

        // The repository re-checks overlap and the entitlement under the
        // per-trainer lock; the insert and both checks share one transaction.
        let created = self.bookings.create_scheduled(&booking).await?;
        info!(
            "Booking {} scheduled for trainer {} on {}",
            created.id, created.trainer_id, created.booking_date
        );
        Ok(created)
    }

    /// Permitted only while SCHEDULED. The trainer is not reassignable; a
    /// changed date/time re-runs conflict resolution excluding the
    /// booking's own id.
    pub async fn update(
        &self,
        tenant_id: &str,
        id: &str,
        params: UpdateBookingParams,
    ) -> Result<Booking, AppError> {
        let mut booking = self
            .bookings
            .find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        if booking.status != BookingStatus::Scheduled {
            return Err(AppError::InvalidTransition(
                "Only scheduled bookings can be updated".into(),
            ));
        }

        if let Some(notes) = params.notes {
            booking.notes = Some(notes);
        }

        let time_changed = params.booking_date.is_some()
            || params.start_time.is_some()
            || params.duration_minutes.is_some();
        if !time_changed {
            return self.bookings.update_notes(&booking).await;
        }

        if let Some(date) = params.booking_date {
            booking.booking_date = date;
        }
        if let Some(start) = params.start_time {
            booking.start_time = start;
        }
        if let Some(duration) = params.duration_minutes {
            booking.duration_minutes = duration;
        }

        let settings = self.settings.get(tenant_id).await?;
        if booking.duration_minutes <= 0
            || booking.duration_minutes % settings.slot_duration_minutes != 0
        {
            return Err(AppError::Validation(format!(
                "INVALID_DURATION: duration must be a positive multiple of {} minutes",
                settings.slot_duration_minutes
            )));
        }

        let (start_time, end_time) =
            booking_window(&booking.start_time, booking.duration_minutes)?;
        booking.start_time = start_time;
        booking.end_time = end_time;

        let check = ConflictCheckRequest {
            trainer_id: booking.trainer_id.clone(),
            booking_date: booking.booking_date,
            start_time: booking.start_time.clone(),
            end_time: booking.end_time.clone(),
            booking_type: booking.booking_type,
        };
        if let Some(detail) = self
            .resolver
            .check_for_conflicts(tenant_id, &check, Some(&booking.id))
            .await?
        {
            return Err(AppError::BookingConflict(detail));
        }

        self.bookings.reschedule(&booking).await
    }

    /// SCHEDULED -> COMPLETED; deducts one session from the reserved
    /// entitlement in the same transaction.
    pub async fn complete(&self, tenant_id: &str, id: &str) -> Result<Booking, AppError> {
        let mut booking = self.load_scheduled(tenant_id, id, "completed").await?;
        booking.status = BookingStatus::Completed;
        booking.completed_at = Some(Utc::now());
        let completed = self.bookings.complete(&booking).await?;
        info!("Booking {} completed", completed.id);
        Ok(completed)
    }

    /// SCHEDULED -> CANCELLED; no entitlement effect.
    pub async fn cancel(
        &self,
        tenant_id: &str,
        id: &str,
        reason: Option<String>,
    ) -> Result<Booking, AppError> {
        let mut booking = self.load_scheduled(tenant_id, id, "cancelled").await?;
        booking.status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(Utc::now());
        booking.cancelled_reason = reason;
        let cancelled = self.bookings.cancel(&booking).await?;
        info!("Booking {} cancelled", cancelled.id);
        Ok(cancelled)
    }

    /// SCHEDULED -> NO_SHOW; deducts like complete.
    pub async fn no_show(&self, tenant_id: &str, id: &str) -> Result<Booking, AppError> {
        let mut booking = self.load_scheduled(tenant_id, id, "marked as no-show").await?;
        booking.status = BookingStatus::NoShow;
        let updated = self.bookings.mark_no_show(&booking).await?;
        info!("Booking {} marked as no-show", updated.id);
        Ok(updated)
    }

    async fn load_scheduled(
        &self,
        tenant_id: &str,
        id: &str,
        action: &str,
    ) -> Result<Booking, AppError> {
        let booking = self
            .bookings
            .find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;
        if booking.status != BookingStatus::Scheduled {
            return Err(AppError::InvalidTransition(format!(
                "Only scheduled bookings can be {}",
                action
            )));
        }
        Ok(booking)
    }
}

/// Normalizes the requested start and derives the end from the duration.
/// Bookings must fit within one day; "24:00" is allowed as an exclusive end.
fn booking_window(start_time: &str, duration_minutes: i32) -> Result<(String, String), AppError> {
    let start = window_algebra::minutes_of(start_time)
        .ok_or_else(|| AppError::Validation("Invalid time format (HH:MM)".into()))?;
    if start >= 1440 {
        return Err(AppError::Validation("Invalid start time".into()));
    }
    let end = start + duration_minutes;
    if end > 1440 {
        return Err(AppError::Validation(
            "Booking must end within the same day".into(),
        ));
    }
    Ok((window_algebra::hhmm(start), window_algebra::hhmm(end)))
}
