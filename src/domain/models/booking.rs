use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingType {
    PtSession,
    GroupSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub tenant_id: String,
    pub booking_type: BookingType,
    pub member_id: String,
    pub trainer_id: String,
    pub entitlement_id: Option<String>,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i32,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub tenant_id: String,
    pub booking_type: BookingType,
    pub member_id: String,
    pub trainer_id: String,
    pub entitlement_id: Option<String>,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: params.tenant_id,
            booking_type: params.booking_type,
            member_id: params.member_id,
            trainer_id: params.trainer_id,
            entitlement_id: params.entitlement_id,
            booking_date: params.booking_date,
            start_time: params.start_time,
            end_time: params.end_time,
            duration_minutes: params.duration_minutes,
            status: BookingStatus::Scheduled,
            notes: params.notes,
            completed_at: None,
            cancelled_at: None,
            cancelled_reason: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictType {
    TrainerDoubleBooked,
    OutsideAvailability,
    BlockedOverride,
}

/// Structured reason why a requested slot cannot be booked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictDetail {
    pub conflict_type: ConflictType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_booking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_end: Option<String>,
}

impl ConflictDetail {
    pub fn new(conflict_type: ConflictType, message: impl Into<String>) -> Self {
        Self {
            conflict_type,
            message: message.into(),
            conflicting_booking_id: None,
            conflicting_start: None,
            conflicting_end: None,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct BookingFilter {
    pub trainer_id: Option<String>,
    pub member_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
    pub booking_type: Option<BookingType>,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct BookingPage {
    pub items: Vec<Booking>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
