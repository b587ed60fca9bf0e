use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::domain::models::booking::{Booking, BookingType, ConflictDetail, ConflictType};
use crate::domain::ports::{
    AvailabilityOverrideRepository, BookingRepository, TrainerAvailabilityRepository,
};
use crate::error::AppError;
use super::availability;

/// The slot a create/update wants to occupy.
#[derive(Debug, Clone)]
pub struct ConflictCheckRequest {
    pub trainer_id: String,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub booking_type: BookingType,
}

/// Overlap check against existing bookings, excluding the booking's own id
/// on updates. Two group sessions may share the slot (class attendance);
/// any other combination double-books the trainer.
///
/// Pure so the booking repositories can re-run it inside the write
/// transaction after taking the trainer lock.
pub fn double_booking_conflict(
    booking_type: BookingType,
    start_time: &str,
    end_time: &str,
    existing: &[Booking],
    exclude_booking_id: Option<&str>,
) -> Option<ConflictDetail> {
    for other in existing {
        if exclude_booking_id == Some(other.id.as_str()) {
            continue;
        }
        if !super::window_algebra::is_overlapping(
            start_time,
            end_time,
            &other.start_time,
            &other.end_time,
        ) {
            continue;
        }
        if booking_type == BookingType::GroupSession
            && other.booking_type == BookingType::GroupSession
        {
            continue;
        }

        let mut detail = ConflictDetail::new(
            ConflictType::TrainerDoubleBooked,
            "Trainer already has a booking in this time slot",
        );
        detail.conflicting_booking_id = Some(other.id.clone());
        detail.conflicting_start = Some(other.start_time.clone());
        detail.conflicting_end = Some(other.end_time.clone());
        return Some(detail);
    }
    None
}

pub struct ConflictResolver {
    templates: Arc<dyn TrainerAvailabilityRepository>,
    overrides: Arc<dyn AvailabilityOverrideRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl ConflictResolver {
    pub fn new(
        templates: Arc<dyn TrainerAvailabilityRepository>,
        overrides: Arc<dyn AvailabilityOverrideRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        Self {
            templates,
            overrides,
            bookings,
        }
    }

    /// Ordered, short-circuiting conflict check: blocked overrides, then
    /// availability containment, then overlapping bookings. Returns the
    /// first conflict found, or None when the slot is bookable.
    ///
    /// The overlap portion is advisory here; the booking repository repeats
    /// it under the per-trainer lock before inserting, so two concurrent
    /// requests for the same trainer cannot both pass.
    pub async fn check_for_conflicts(
        &self,
        tenant_id: &str,
        request: &ConflictCheckRequest,
        exclude_booking_id: Option<&str>,
    ) -> Result<Option<ConflictDetail>, AppError> {
        let overrides = self
            .overrides
            .list_for_date(tenant_id, &request.trainer_id, request.booking_date)
            .await?;

        // Day-of-week in UTC, 0=Sunday.
        let day_of_week = request.booking_date.weekday().num_days_from_sunday() as i32;
        let template = self
            .templates
            .list_active_for_day(tenant_id, &request.trainer_id, day_of_week)
            .await?;

        if let Some(detail) = availability::availability_conflict(
            &template,
            &overrides,
            &request.start_time,
            &request.end_time,
        ) {
            return Ok(Some(detail));
        }

        let existing = self
            .bookings
            .list_active_for_day(tenant_id, &request.trainer_id, request.booking_date)
            .await?;

        Ok(double_booking_conflict(
            request.booking_type,
            &request.start_time,
            &request.end_time,
            &existing,
            exclude_booking_id,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::booking::{Booking, NewBookingParams};

    fn booking(booking_type: BookingType, start: &str, end: &str) -> Booking {
        Booking::new(NewBookingParams {
            tenant_id: "t1".into(),
            booking_type,
            member_id: "m1".into(),
            trainer_id: "tr1".into(),
            entitlement_id: None,
            booking_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            start_time: start.into(),
            end_time: end.into(),
            duration_minutes: 60,
            notes: None,
        })
    }

    #[test]
    fn overlapping_pt_sessions_conflict() {
        let existing = vec![booking(BookingType::PtSession, "10:00", "11:00")];
        let detail =
            double_booking_conflict(BookingType::PtSession, "10:30", "11:30", &existing, None)
                .unwrap();
        assert_eq!(detail.conflict_type, ConflictType::TrainerDoubleBooked);
        assert_eq!(detail.conflicting_booking_id.as_deref(), Some(existing[0].id.as_str()));
    }

    #[test]
    fn group_sessions_may_share_a_slot() {
        let existing = vec![booking(BookingType::GroupSession, "10:00", "11:00")];
        assert!(double_booking_conflict(
            BookingType::GroupSession,
            "10:00",
            "11:00",
            &existing,
            None
        )
        .is_none());
        // but a PT session against a group session still conflicts
        assert!(double_booking_conflict(
            BookingType::PtSession,
            "10:00",
            "11:00",
            &existing,
            None
        )
        .is_some());
    }

    #[test]
    fn own_booking_is_excluded_on_update() {
        let existing = vec![booking(BookingType::PtSession, "10:00", "11:00")];
        let own_id = existing[0].id.clone();
        assert!(double_booking_conflict(
            BookingType::PtSession,
            "10:00",
            "11:00",
            &existing,
            Some(own_id.as_str())
        )
        .is_none());
    }

    #[test]
    fn adjacent_bookings_do_not_conflict() {
        let existing = vec![booking(BookingType::PtSession, "09:00", "10:00")];
        assert!(double_booking_conflict(
            BookingType::PtSession,
            "10:00",
            "11:00",
            &existing,
            None
        )
        .is_none());
    }
}
