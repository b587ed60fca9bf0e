use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateEntitlementRequest, MemberQuery};
use crate::api::extractors::tenant::TenantId;
use crate::domain::models::entitlement::Entitlement;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_entitlement(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Json(payload): Json<CreateEntitlementRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.total_sessions <= 0 {
        return Err(AppError::Validation(
            "total_sessions must be positive".into(),
        ));
    }

    let entitlement = Entitlement::new(
        tenant_id,
        payload.member_id,
        payload.kind,
        payload.total_sessions,
        payload.expiry_date,
        payload.notes,
    );
    let saved = state.entitlement_repo.create(&entitlement).await?;
    info!(
        "Created {:?} entitlement {} for member {} ({} sessions)",
        saved.kind, saved.id, saved.member_id, saved.total_sessions
    );
    Ok(Json(saved))
}

pub async fn list_entitlements(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Query(query): Query<MemberQuery>,
) -> Result<impl IntoResponse, AppError> {
    let entitlements = state
        .entitlement_repo
        .list_by_member(&tenant_id, &query.member_id)
        .await?;
    Ok(Json(entitlements))
}
