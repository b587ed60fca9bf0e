use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::SchedulingSettingsRequest;
use crate::api::extractors::tenant::TenantId;
use crate::domain::models::settings::SchedulingSettings;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings_repo.get(&tenant_id).await?;
    Ok(Json(settings))
}

pub async fn put_settings(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Json(payload): Json<SchedulingSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.slot_duration_minutes <= 0 || payload.slot_duration_minutes > 1440 {
        return Err(AppError::Validation(
            "slot_duration_minutes must be between 1 and 1440".into(),
        ));
    }
    if payload.booking_lead_time_hours < 0 || payload.cancellation_window_hours < 0 {
        return Err(AppError::Validation(
            "lead time and cancellation window must not be negative".into(),
        ));
    }

    let settings = SchedulingSettings {
        tenant_id: tenant_id.clone(),
        slot_duration_minutes: payload.slot_duration_minutes,
        booking_lead_time_hours: payload.booking_lead_time_hours,
        cancellation_window_hours: payload.cancellation_window_hours,
        updated_at: Utc::now(),
    };
    let saved = state.settings_repo.upsert(&settings).await?;
    info!("Updated scheduling settings for tenant {}", tenant_id);
    Ok(Json(saved))
}
