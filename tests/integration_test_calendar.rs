mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

const TENANT: &str = "gym-a";
const TRAINER: &str = "trainer-1";
const MEMBER: &str = "member-1";
const DATE: &str = "2026-09-07";

#[tokio::test]
async fn calendar_lists_bookings_and_policy_windows() {
    let app = TestApp::new().await;
    app.seed_full_week(TENANT, TRAINER, "09:00", "17:00").await;
    app.seed_entitlement(TENANT, MEMBER, "PT_PACKAGE", 5).await;

    let (status, _) = app
        .post(
            &format!("/api/v1/{}/bookings", TENANT),
            json!({
                "booking_type": "PT_SESSION",
                "member_id": MEMBER,
                "trainer_id": TRAINER,
                "booking_date": DATE,
                "start_time": "10:00",
                "duration_minutes": 60
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get(&format!(
            "/api/v1/{}/calendar?date_from=2026-09-07&date_to=2026-09-08",
            TENANT
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["bookings"].as_array().unwrap().len(), 1);
    assert_eq!(body["bookings"][0]["trainer_id"], TRAINER);

    let windows = &body["availability"][TRAINER][DATE];
    assert_eq!(windows.as_array().unwrap().len(), 1);
    // Availability reflects policy only; the 10:00 booking is listed above
    // but not carved out of the window.
    assert_eq!(windows[0]["start_time"], "09:00");
    assert_eq!(windows[0]["end_time"], "17:00");

    // Both requested days are present.
    assert!(body["availability"][TRAINER]["2026-09-08"].is_array());
}

#[tokio::test]
async fn calendar_filters_by_trainer_ids() {
    let app = TestApp::new().await;
    app.seed_full_week(TENANT, "trainer-1", "09:00", "17:00")
        .await;
    app.seed_full_week(TENANT, "trainer-2", "08:00", "12:00")
        .await;

    let (status, body) = app
        .get(&format!(
            "/api/v1/{}/calendar?date_from=2026-09-07&date_to=2026-09-07&trainer_ids=trainer-2",
            TENANT
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let availability = body["availability"].as_object().unwrap();
    assert_eq!(availability.len(), 1);
    assert!(availability.contains_key("trainer-2"));
}

#[tokio::test]
async fn calendar_rejects_inverted_range() {
    let app = TestApp::new().await;
    let (status, _) = app
        .get(&format!(
            "/api/v1/{}/calendar?date_from=2026-09-08&date_to=2026-09-07",
            TENANT
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn settings_default_then_upsert() {
    let app = TestApp::new().await;
    let uri = format!("/api/v1/{}/settings/scheduling", TENANT);

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slot_duration_minutes"], 60);
    assert_eq!(body["booking_lead_time_hours"], 0);
    assert_eq!(body["cancellation_window_hours"], 24);

    let (status, body) = app
        .put(
            &uri,
            json!({
                "slot_duration_minutes": 30,
                "booking_lead_time_hours": 2,
                "cancellation_window_hours": 12
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slot_duration_minutes"], 30);

    let (_, body) = app.get(&uri).await;
    assert_eq!(body["slot_duration_minutes"], 30);

    let (status, _) = app
        .put(
            &uri,
            json!({
                "slot_duration_minutes": 0,
                "booking_lead_time_hours": 0,
                "cancellation_window_hours": 0
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn settings_drive_duration_validation() {
    let app = TestApp::new().await;
    app.seed_full_week(TENANT, TRAINER, "09:00", "17:00").await;
    app.seed_entitlement(TENANT, MEMBER, "PT_PACKAGE", 5).await;

    let (status, _) = app
        .put(
            &format!("/api/v1/{}/settings/scheduling", TENANT),
            json!({
                "slot_duration_minutes": 30,
                "booking_lead_time_hours": 0,
                "cancellation_window_hours": 24
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // 90 is a multiple of 30, allowed now.
    let (status, body) = app
        .post(
            &format!("/api/v1/{}/bookings", TENANT),
            json!({
                "booking_type": "PT_SESSION",
                "member_id": MEMBER,
                "trainer_id": TRAINER,
                "booking_date": DATE,
                "start_time": "10:00",
                "duration_minutes": 90
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["end_time"], "11:30");
}
