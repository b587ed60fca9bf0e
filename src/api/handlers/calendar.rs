use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::dtos::requests::CalendarQuery;
use crate::api::extractors::tenant::TenantId;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Query(query): Query<CalendarQuery>,
) -> Result<impl IntoResponse, AppError> {
    let trainer_ids: Vec<String> = query
        .trainer_ids
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
        .collect();

    let data = state
        .calendar
        .get_calendar_data(&tenant_id, query.date_from, query.date_to, &trainer_ids)
        .await?;
    Ok(Json(data))
}
