use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::dtos::requests::{
    BookingListQuery, CancelBookingRequest, CreateBookingRequest, UpdateBookingRequest,
};
use crate::api::extractors::tenant::TenantId;
use crate::domain::models::booking::BookingFilter;
use crate::domain::services::booking_lifecycle::{CreateBookingParams, UpdateBookingParams};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_service
        .create(
            &tenant_id,
            CreateBookingParams {
                booking_type: payload.booking_type,
                member_id: payload.member_id,
                trainer_id: payload.trainer_id,
                entitlement_id: payload.entitlement_id,
                booking_date: payload.booking_date,
                start_time: payload.start_time,
                duration_minutes: payload.duration_minutes,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(Json(booking))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Query(query): Query<BookingListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = BookingFilter {
        trainer_id: query.trainer_id,
        member_id: query.member_id,
        date: query.date,
        date_from: query.date_from,
        date_to: query.date_to,
        status: query.status,
        booking_type: query.booking_type,
        page: query.page,
        limit: query.limit,
    };
    let page = state.booking_repo.list(&tenant_id, &filter).await?;
    Ok(Json(page))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, booking_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(&tenant_id, &booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;
    Ok(Json(booking))
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, booking_id)): Path<(String, String)>,
    Json(payload): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_service
        .update(
            &tenant_id,
            &booking_id,
            UpdateBookingParams {
                booking_date: payload.booking_date,
                start_time: payload.start_time,
                duration_minutes: payload.duration_minutes,
                notes: payload.notes,
            },
        )
        .await?;
    Ok(Json(booking))
}

pub async fn complete_booking(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, booking_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_service
        .complete(&tenant_id, &booking_id)
        .await?;
    Ok(Json(booking))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, booking_id)): Path<(String, String)>,
    payload: Option<Json<CancelBookingRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let reason = payload.and_then(|Json(p)| p.reason);
    let booking = state
        .booking_service
        .cancel(&tenant_id, &booking_id, reason)
        .await?;
    Ok(Json(booking))
}

pub async fn no_show_booking(
    State(state): State<Arc<AppState>>,
    TenantId(tenant_id): TenantId,
    Path((_, booking_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_service
        .no_show(&tenant_id, &booking_id)
        .await?;
    Ok(Json(booking))
}
