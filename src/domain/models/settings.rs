use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Per-tenant scheduling knobs. Only the slot duration is enforced at
/// booking time; lead time and cancellation window are stored for clients.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SchedulingSettings {
    pub tenant_id: String,
    pub slot_duration_minutes: i32,
    pub booking_lead_time_hours: i32,
    pub cancellation_window_hours: i32,
    pub updated_at: DateTime<Utc>,
}

impl SchedulingSettings {
    pub fn defaults(tenant_id: &str) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            slot_duration_minutes: 60,
            booking_lead_time_hours: 0,
            cancellation_window_hours: 24,
            updated_at: Utc::now(),
        }
    }
}
