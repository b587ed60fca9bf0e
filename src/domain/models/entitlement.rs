use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::booking::BookingType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "entitlement_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntitlementKind {
    PtPackage,
    GroupPass,
}

impl EntitlementKind {
    /// Which entitlement kind a booking type consumes.
    pub fn required_for(booking_type: BookingType) -> Self {
        match booking_type {
            BookingType::PtSession => EntitlementKind::PtPackage,
            BookingType::GroupSession => EntitlementKind::GroupPass,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "entitlement_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntitlementStatus {
    Active,
    Exhausted,
    Expired,
    Cancelled,
}

/// A purchased, depletable allotment of sessions owned by a member.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Entitlement {
    pub id: String,
    pub tenant_id: String,
    pub member_id: String,
    pub kind: EntitlementKind,
    pub total_sessions: i32,
    pub used_sessions: i32,
    pub remaining_sessions: i32,
    pub status: EntitlementStatus,
    pub expiry_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entitlement {
    pub fn new(
        tenant_id: String,
        member_id: String,
        kind: EntitlementKind,
        total_sessions: i32,
        expiry_date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            member_id,
            kind,
            total_sessions,
            used_sessions: 0,
            remaining_sessions: total_sessions,
            status: EntitlementStatus::Active,
            expiry_date,
            notes,
            created_at: Utc::now(),
        }
    }

    pub fn is_consumable(&self) -> bool {
        self.status == EntitlementStatus::Active && self.remaining_sessions >= 1
    }
}
