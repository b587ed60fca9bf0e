use crate::domain::models::{
    availability::{AvailabilityOverride, TemplateSlot},
    booking::{Booking, BookingFilter, BookingPage},
    entitlement::{Entitlement, EntitlementKind},
    settings::SchedulingSettings,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait TrainerAvailabilityRepository: Send + Sync {
    async fn list_template(&self, tenant_id: &str, trainer_id: &str) -> Result<Vec<TemplateSlot>, AppError>;
    /// Wholesale replace: delete all rows for the trainer, insert the new
    /// set, in one transaction.
    async fn replace_template(&self, tenant_id: &str, trainer_id: &str, slots: &[TemplateSlot]) -> Result<Vec<TemplateSlot>, AppError>;
    async fn list_active_for_day(&self, tenant_id: &str, trainer_id: &str, day_of_week: i32) -> Result<Vec<TemplateSlot>, AppError>;
    async fn list_active(&self, tenant_id: &str) -> Result<Vec<TemplateSlot>, AppError>;
}

#[async_trait]
pub trait AvailabilityOverrideRepository: Send + Sync {
    async fn create(&self, entity: &AvailabilityOverride) -> Result<AvailabilityOverride, AppError>;
    async fn delete(&self, tenant_id: &str, trainer_id: &str, id: &str) -> Result<(), AppError>;
    async fn list_for_date(&self, tenant_id: &str, trainer_id: &str, date: NaiveDate) -> Result<Vec<AvailabilityOverride>, AppError>;
    async fn list_by_range(&self, tenant_id: &str, trainer_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<AvailabilityOverride>, AppError>;
    async fn list_in_range(&self, tenant_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<AvailabilityOverride>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a SCHEDULED booking. Runs the whole write protocol in one
    /// transaction: per-(tenant, trainer) lock, overlap re-check,
    /// entitlement re-validation, insert.
    async fn create_scheduled(&self, booking: &Booking) -> Result<Booking, AppError>;
    /// Persist changed date/time for a SCHEDULED booking under the same
    /// lock + overlap re-check, excluding the booking's own id.
    async fn reschedule(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn update_notes(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list(&self, tenant_id: &str, filter: &BookingFilter) -> Result<BookingPage, AppError>;
    /// SCHEDULED/COMPLETED bookings for one trainer and date.
    async fn list_active_for_day(&self, tenant_id: &str, trainer_id: &str, date: NaiveDate) -> Result<Vec<Booking>, AppError>;
    /// SCHEDULED/COMPLETED bookings in a date range, all trainers.
    async fn list_calendar_range(&self, tenant_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<Booking>, AppError>;
    /// Status flip to COMPLETED plus entitlement deduction in one
    /// transaction, guarded on the current status being SCHEDULED.
    async fn complete(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn cancel(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn mark_no_show(&self, booking: &Booking) -> Result<Booking, AppError>;
}

#[async_trait]
pub trait EntitlementRepository: Send + Sync {
    async fn create(&self, entitlement: &Entitlement) -> Result<Entitlement, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Entitlement>, AppError>;
    /// Oldest ACTIVE entitlement of the kind with remaining_sessions >= 1,
    /// FIFO by creation time.
    async fn find_oldest_active(&self, tenant_id: &str, member_id: &str, kind: EntitlementKind) -> Result<Option<Entitlement>, AppError>;
    async fn list_by_member(&self, tenant_id: &str, member_id: &str) -> Result<Vec<Entitlement>, AppError>;
    /// Guarded decrement; refuses when not ACTIVE or already at zero.
    async fn deduct_session(&self, tenant_id: &str, id: &str) -> Result<Entitlement, AppError>;
    async fn find_expired_active(&self, today: NaiveDate) -> Result<Vec<Entitlement>, AppError>;
    async fn mark_expired(&self, tenant_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SchedulingSettingsRepository: Send + Sync {
    /// Returns stored settings or the tenant defaults when absent.
    async fn get(&self, tenant_id: &str) -> Result<SchedulingSettings, AppError>;
    async fn upsert(&self, settings: &SchedulingSettings) -> Result<SchedulingSettings, AppError>;
}
