use std::sync::Arc;

use crate::config::Config;
use crate::domain::ports::{
    AvailabilityOverrideRepository, BookingRepository, EntitlementRepository,
    SchedulingSettingsRepository, TrainerAvailabilityRepository,
};
use crate::domain::services::booking_lifecycle::BookingService;
use crate::domain::services::calendar::CalendarAggregator;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub availability_repo: Arc<dyn TrainerAvailabilityRepository>,
    pub override_repo: Arc<dyn AvailabilityOverrideRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub entitlement_repo: Arc<dyn EntitlementRepository>,
    pub settings_repo: Arc<dyn SchedulingSettingsRepository>,
    pub booking_service: Arc<BookingService>,
    pub calendar: Arc<CalendarAggregator>,
}
