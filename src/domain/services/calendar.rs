use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::models::booking::Booking;
use crate::domain::ports::{
    AvailabilityOverrideRepository, BookingRepository, TrainerAvailabilityRepository,
};
use crate::error::AppError;
use super::availability;
use super::window_algebra::TimeWindow;

/// trainer id -> date ("YYYY-MM-DD") -> policy windows.
pub type AvailabilityMap = BTreeMap<String, BTreeMap<String, Vec<TimeWindow>>>;

#[derive(Debug, Serialize)]
pub struct CalendarData {
    pub bookings: Vec<Booking>,
    pub availability: AvailabilityMap,
}

/// Read-only multi-trainer projection for calendar views. The availability
/// map reflects policy-eligible windows only; scheduled bookings are listed
/// alongside but never subtracted from the windows. Conflicts are enforced
/// at write time by the resolver, not here.
pub struct CalendarAggregator {
    bookings: Arc<dyn BookingRepository>,
    templates: Arc<dyn TrainerAvailabilityRepository>,
    overrides: Arc<dyn AvailabilityOverrideRepository>,
}

impl CalendarAggregator {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        templates: Arc<dyn TrainerAvailabilityRepository>,
        overrides: Arc<dyn AvailabilityOverrideRepository>,
    ) -> Self {
        Self {
            bookings,
            templates,
            overrides,
        }
    }

    pub async fn get_calendar_data(
        &self,
        tenant_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        trainer_ids: &[String],
    ) -> Result<CalendarData, AppError> {
        if date_from > date_to {
            return Err(AppError::Validation("date_from must not be after date_to".into()));
        }

        let mut bookings = self
            .bookings
            .list_calendar_range(tenant_id, date_from, date_to)
            .await?;
        let mut templates = self.templates.list_active(tenant_id).await?;
        let mut overrides = self
            .overrides
            .list_in_range(tenant_id, date_from, date_to)
            .await?;

        if !trainer_ids.is_empty() {
            bookings.retain(|b| trainer_ids.contains(&b.trainer_id));
            templates.retain(|t| trainer_ids.contains(&t.trainer_id));
            overrides.retain(|o| trainer_ids.contains(&o.trainer_id));
        }

        // Trainers with any template or booking in range, unless filtered.
        let involved: BTreeSet<String> = if trainer_ids.is_empty() {
            templates
                .iter()
                .map(|t| t.trainer_id.clone())
                .chain(bookings.iter().map(|b| b.trainer_id.clone()))
                .collect()
        } else {
            trainer_ids.iter().cloned().collect()
        };

        let mut availability: AvailabilityMap = BTreeMap::new();

        for trainer_id in involved {
            let mut per_date = BTreeMap::new();

            for date in date_from.iter_days().take_while(|d| *d <= date_to) {
                let day_of_week = date.weekday().num_days_from_sunday() as i32;

                let day_template: Vec<_> = templates
                    .iter()
                    .filter(|t| t.trainer_id == trainer_id && t.day_of_week == day_of_week)
                    .cloned()
                    .collect();
                let day_overrides: Vec<_> = overrides
                    .iter()
                    .filter(|o| o.trainer_id == trainer_id && o.date == date)
                    .cloned()
                    .collect();

                per_date.insert(
                    date.to_string(),
                    availability::day_windows(&day_template, &day_overrides),
                );
            }

            availability.insert(trainer_id, per_date);
        }

        Ok(CalendarData {
            bookings,
            availability,
        })
    }

    /// Single-trainer, single-day variant of the same computation.
    pub async fn get_available_slots(
        &self,
        tenant_id: &str,
        trainer_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<TimeWindow>, AppError> {
        let day_of_week = date.weekday().num_days_from_sunday() as i32;
        let template = self
            .templates
            .list_active_for_day(tenant_id, trainer_id, day_of_week)
            .await?;
        let overrides = self
            .overrides
            .list_for_date(tenant_id, trainer_id, date)
            .await?;
        Ok(availability::day_windows(&template, &overrides))
    }
}
