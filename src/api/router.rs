use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;

use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

use crate::api::handlers::{availability, booking, calendar, entitlement, health, settings};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Trainer availability
        .route(
            "/api/v1/{tenant_id}/trainers/{trainer_id}/availability",
            get(availability::get_template).put(availability::put_template),
        )
        .route(
            "/api/v1/{tenant_id}/trainers/{trainer_id}/availability/overrides",
            get(availability::list_overrides).post(availability::create_override),
        )
        .route(
            "/api/v1/{tenant_id}/trainers/{trainer_id}/availability/overrides/{override_id}",
            delete(availability::delete_override),
        )
        .route(
            "/api/v1/{tenant_id}/trainers/{trainer_id}/available-slots",
            get(availability::get_available_slots),
        )

        // Bookings
        .route(
            "/api/v1/{tenant_id}/bookings",
            post(booking::create_booking).get(booking::list_bookings),
        )
        .route(
            "/api/v1/{tenant_id}/bookings/{booking_id}",
            get(booking::get_booking).put(booking::update_booking),
        )
        .route(
            "/api/v1/{tenant_id}/bookings/{booking_id}/complete",
            post(booking::complete_booking),
        )
        .route(
            "/api/v1/{tenant_id}/bookings/{booking_id}/cancel",
            post(booking::cancel_booking),
        )
        .route(
            "/api/v1/{tenant_id}/bookings/{booking_id}/no-show",
            post(booking::no_show_booking),
        )

        // Calendar
        .route("/api/v1/{tenant_id}/calendar", get(calendar::get_calendar))

        // Entitlements
        .route(
            "/api/v1/{tenant_id}/entitlements",
            post(entitlement::create_entitlement).get(entitlement::list_entitlements),
        )

        // Settings
        .route(
            "/api/v1/{tenant_id}/settings/scheduling",
            get(settings::get_settings).put(settings::put_settings),
        )

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        tenant_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!(
                        "started processing request: {} {}",
                        request.method(),
                        request.uri().path()
                    );
                })
                .on_response(
                    |response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                        info!(
                            status = response.status().as_u16(),
                            latency_ms = latency.as_millis(),
                            "finished processing request"
                        );
                    },
                )
                .on_failure(
                    |error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                        error!("request failed: {:?}", error);
                    },
                ),
        )
        .with_state(state)
}
