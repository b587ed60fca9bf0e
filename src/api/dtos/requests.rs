use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::models::availability::OverrideType;
use crate::domain::models::booking::{BookingStatus, BookingType};
use crate::domain::models::entitlement::EntitlementKind;

#[derive(Deserialize)]
pub struct TemplateSlotRequest {
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
pub struct ReplaceTemplateRequest {
    pub slots: Vec<TemplateSlotRequest>,
}

#[derive(Deserialize)]
pub struct OverrideRequest {
    pub date: NaiveDate,
    pub override_type: OverrideType,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub booking_type: BookingType,
    pub member_id: String,
    pub trainer_id: String,
    pub entitlement_id: Option<String>,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdateBookingRequest {
    pub booking_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateEntitlementRequest {
    pub member_id: String,
    pub kind: EntitlementKind,
    pub total_sessions: i32,
    pub expiry_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct SchedulingSettingsRequest {
    pub slot_duration_minutes: i32,
    pub booking_lead_time_hours: i32,
    pub cancellation_window_hours: i32,
}

#[derive(Deserialize)]
pub struct BookingListQuery {
    pub trainer_id: Option<String>,
    pub member_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
    pub booking_type: Option<BookingType>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

#[derive(Deserialize)]
pub struct CalendarQuery {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    /// Comma-separated trainer ids; empty means all trainers.
    pub trainer_ids: Option<String>,
}

#[derive(Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

#[derive(Deserialize)]
pub struct DateRangeQuery {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

#[derive(Deserialize)]
pub struct MemberQuery {
    pub member_id: String,
}
