use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{DateQuery, DateRangeQuery, OverrideRequest, ReplaceTemplateRequest};
use crate::api::extractors::tenant::TenantId;
use crate::domain::models::availability::{AvailabilityOverride, OverrideType, TemplateSlot};
use crate::domain::services::window_algebra;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_template(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, trainer_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let slots = state
        .availability_repo
        .list_template(&tenant_id, &trainer_id)
        .await?;
    Ok(Json(slots))
}

pub async fn put_template(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, trainer_id)): Path<(String, String)>,
    Json(payload): Json<ReplaceTemplateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut slots = Vec::with_capacity(payload.slots.len());
    for slot in &payload.slots {
        if !(0..=6).contains(&slot.day_of_week) {
            return Err(AppError::Validation(
                "day_of_week must be between 0 (Sunday) and 6 (Saturday)".into(),
            ));
        }
        validate_window(&slot.start_time, &slot.end_time)?;
        slots.push(TemplateSlot::new(
            tenant_id.clone(),
            trainer_id.clone(),
            slot.day_of_week,
            slot.start_time.clone(),
            slot.end_time.clone(),
            slot.is_active,
        ));
    }

    let saved = state
        .availability_repo
        .replace_template(&tenant_id, &trainer_id, &slots)
        .await?;
    info!(
        "Replaced availability template for trainer {} ({} slot(s))",
        trainer_id,
        saved.len()
    );
    Ok(Json(saved))
}

pub async fn list_overrides(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, trainer_id)): Path<(String, String)>,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    if range.date_from > range.date_to {
        return Err(AppError::Validation(
            "date_from must not be after date_to".into(),
        ));
    }
    let overrides = state
        .override_repo
        .list_by_range(&tenant_id, &trainer_id, range.date_from, range.date_to)
        .await?;
    Ok(Json(overrides))
}

pub async fn create_override(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, trainer_id)): Path<(String, String)>,
    Json(payload): Json<OverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    match payload.override_type {
        OverrideType::Modified => {
            let (start, end) = match (&payload.start_time, &payload.end_time) {
                (Some(s), Some(e)) => (s, e),
                _ => {
                    return Err(AppError::Validation(
                        "MODIFIED override requires start_time and end_time".into(),
                    ))
                }
            };
            validate_window(start, end)?;
        }
        OverrideType::Blocked => match (&payload.start_time, &payload.end_time) {
            (Some(s), Some(e)) => validate_window(s, e)?,
            (None, None) => {}
            _ => {
                return Err(AppError::Validation(
                    "BLOCKED override requires both times or neither".into(),
                ))
            }
        },
    }

    let entity = AvailabilityOverride::new(
        tenant_id,
        trainer_id.clone(),
        payload.date,
        payload.override_type,
        payload.start_time,
        payload.end_time,
        payload.reason,
    );
    let saved = state.override_repo.create(&entity).await?;
    info!(
        "Created {:?} override for trainer {} on {}",
        saved.override_type, trainer_id, saved.date
    );
    Ok(Json(saved))
}

pub async fn delete_override(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, trainer_id, override_id)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state
        .override_repo
        .delete(&tenant_id, &trainer_id, &override_id)
        .await?;
    info!("Deleted override {} for trainer {}", override_id, trainer_id);
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

pub async fn get_available_slots(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, trainer_id)): Path<(String, String)>,
    Query(query): Query<DateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let windows = state
        .calendar
        .get_available_slots(&tenant_id, &trainer_id, query.date)
        .await?;
    Ok(Json(windows))
}

fn validate_window(start_time: &str, end_time: &str) -> Result<(), AppError> {
    let start = window_algebra::minutes_of(start_time)
        .ok_or_else(|| AppError::Validation("Invalid time format (HH:MM)".into()))?;
    let end = window_algebra::minutes_of(end_time)
        .ok_or_else(|| AppError::Validation("Invalid time format (HH:MM)".into()))?;
    if start >= end {
        return Err(AppError::Validation(
            "start_time must be before end_time".into(),
        ));
    }
    Ok(())
}
