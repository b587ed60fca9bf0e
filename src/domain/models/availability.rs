use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "override_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverrideType {
    Blocked,
    Modified,
}

/// One recurring weekly availability window for a trainer.
/// day_of_week: 0=Sunday .. 6=Saturday, times as "HH:MM".
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct TemplateSlot {
    pub id: String,
    pub tenant_id: String,
    pub trainer_id: String,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TemplateSlot {
    pub fn new(
        tenant_id: String,
        trainer_id: String,
        day_of_week: i32,
        start_time: String,
        end_time: String,
        is_active: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            trainer_id,
            day_of_week,
            start_time,
            end_time,
            is_active,
            created_at: Utc::now(),
        }
    }
}

/// Date-specific exception to the weekly template.
/// BLOCKED without times blocks the whole day; BLOCKED with times is a
/// partial block; MODIFIED always carries times and replaces the day's
/// windows outright.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AvailabilityOverride {
    pub id: String,
    pub tenant_id: String,
    pub trainer_id: String,
    pub date: NaiveDate,
    pub override_type: OverrideType,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AvailabilityOverride {
    pub fn new(
        tenant_id: String,
        trainer_id: String,
        date: NaiveDate,
        override_type: OverrideType,
        start_time: Option<String>,
        end_time: Option<String>,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            trainer_id,
            date,
            override_type,
            start_time,
            end_time,
            reason,
            created_at: Utc::now(),
        }
    }

    pub fn is_full_day_block(&self) -> bool {
        self.override_type == OverrideType::Blocked && self.start_time.is_none()
    }
}
