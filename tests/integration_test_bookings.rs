mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

const TENANT: &str = "gym-a";
const TRAINER: &str = "trainer-1";
const MEMBER: &str = "member-1";

// 2026-09-07 is a Monday.
const DATE: &str = "2026-09-07";

async fn booked_app() -> TestApp {
    let app = TestApp::new().await;
    app.seed_full_week(TENANT, TRAINER, "09:00", "17:00").await;
    app.seed_entitlement(TENANT, MEMBER, "PT_PACKAGE", 10).await;
    app
}

fn pt_booking(start: &str) -> serde_json::Value {
    json!({
        "booking_type": "PT_SESSION",
        "member_id": MEMBER,
        "trainer_id": TRAINER,
        "booking_date": DATE,
        "start_time": start,
        "duration_minutes": 60
    })
}

#[tokio::test]
async fn create_booking_happy_path() {
    let app = booked_app().await;

    let (status, body) = app
        .post(&format!("/api/v1/{}/bookings", TENANT), pt_booking("10:00"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SCHEDULED");
    assert_eq!(body["start_time"], "10:00");
    assert_eq!(body["end_time"], "11:00");
    assert!(body["entitlement_id"].is_string());

    // Creation reserves but does not deduct.
    let (_, entitlements) = app
        .get(&format!(
            "/api/v1/{}/entitlements?member_id={}",
            TENANT, MEMBER
        ))
        .await;
    assert_eq!(entitlements[0]["remaining_sessions"], 10);
}

#[tokio::test]
async fn create_booking_rejects_invalid_duration() {
    let app = booked_app().await;

    let (status, body) = app
        .post(
            &format!("/api/v1/{}/bookings", TENANT),
            json!({
                "booking_type": "PT_SESSION",
                "member_id": MEMBER,
                "trainer_id": TRAINER,
                "booking_date": DATE,
                "start_time": "10:00",
                "duration_minutes": 45
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("INVALID_DURATION"));
}

#[tokio::test]
async fn create_booking_rejects_outside_availability() {
    let app = booked_app().await;

    let (status, body) = app
        .post(&format!("/api/v1/{}/bookings", TENANT), pt_booking("18:00"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["conflict"]["conflict_type"], "OUTSIDE_AVAILABILITY");
}

#[tokio::test]
async fn create_booking_rejects_blocked_override() {
    let app = booked_app().await;
    let (status, _) = app
        .post(
            &format!(
                "/api/v1/{}/trainers/{}/availability/overrides",
                TENANT, TRAINER
            ),
            json!({ "date": DATE, "override_type": "BLOCKED" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(&format!("/api/v1/{}/bookings", TENANT), pt_booking("10:00"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["conflict"]["conflict_type"], "BLOCKED_OVERRIDE");
}

#[tokio::test]
async fn overlapping_pt_sessions_conflict() {
    let app = booked_app().await;

    let (status, _) = app
        .post(&format!("/api/v1/{}/bookings", TENANT), pt_booking("10:00"))
        .await;
    assert_eq!(status, StatusCode::OK);

    // Second member, same trainer, overlapping half hour.
    app.seed_entitlement(TENANT, "member-2", "PT_PACKAGE", 5)
        .await;
    let (status, body) = app
        .post(
            &format!("/api/v1/{}/bookings", TENANT),
            json!({
                "booking_type": "PT_SESSION",
                "member_id": "member-2",
                "trainer_id": TRAINER,
                "booking_date": DATE,
                "start_time": "10:00",
                "duration_minutes": 60
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["conflict"]["conflict_type"], "TRAINER_DOUBLE_BOOKED");
    assert_eq!(body["conflict"]["conflicting_start"], "10:00");

    // Back-to-back is fine, windows are half-open.
    let (status, _) = app
        .post(&format!("/api/v1/{}/bookings", TENANT), pt_booking("11:00"))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn group_sessions_share_the_same_slot() {
    let app = TestApp::new().await;
    app.seed_full_week(TENANT, TRAINER, "09:00", "17:00").await;
    app.seed_entitlement(TENANT, MEMBER, "GROUP_PASS", 5).await;
    app.seed_entitlement(TENANT, "member-2", "GROUP_PASS", 5)
        .await;

    for member in [MEMBER, "member-2"] {
        let (status, _) = app
            .post(
                &format!("/api/v1/{}/bookings", TENANT),
                json!({
                    "booking_type": "GROUP_SESSION",
                    "member_id": member,
                    "trainer_id": TRAINER,
                    "booking_date": DATE,
                    "start_time": "10:00",
                    "duration_minutes": 60
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    // A PT session still cannot overlap the group slot.
    app.seed_entitlement(TENANT, "member-3", "PT_PACKAGE", 5)
        .await;
    let (status, body) = app
        .post(
            &format!("/api/v1/{}/bookings", TENANT),
            json!({
                "booking_type": "PT_SESSION",
                "member_id": "member-3",
                "trainer_id": TRAINER,
                "booking_date": DATE,
                "start_time": "10:00",
                "duration_minutes": 60
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["conflict"]["conflict_type"], "TRAINER_DOUBLE_BOOKED");
}

#[tokio::test]
async fn no_entitlement_means_no_booking_and_no_row() {
    let app = TestApp::new().await;
    app.seed_full_week(TENANT, TRAINER, "09:00", "17:00").await;

    let (status, body) = app
        .post(&format!("/api/v1/{}/bookings", TENANT), pt_booking("10:00"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "INSUFFICIENT_SESSIONS");

    let (_, page) = app.get(&format!("/api/v1/{}/bookings", TENANT)).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn wrong_kind_entitlement_is_refused() {
    let app = TestApp::new().await;
    app.seed_full_week(TENANT, TRAINER, "09:00", "17:00").await;
    // Member holds only a group pass but books a PT session.
    let group_pass = app.seed_entitlement(TENANT, MEMBER, "GROUP_PASS", 5).await;

    let mut payload = pt_booking("10:00");
    payload["entitlement_id"] = json!(group_pass);
    let (status, body) = app
        .post(&format!("/api/v1/{}/bookings", TENANT), payload)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "INSUFFICIENT_SESSIONS");
}

#[tokio::test]
async fn fifo_selection_uses_oldest_entitlement() {
    let app = TestApp::new().await;
    app.seed_full_week(TENANT, TRAINER, "09:00", "17:00").await;
    let older = app.seed_entitlement(TENANT, MEMBER, "PT_PACKAGE", 1).await;
    let _newer = app.seed_entitlement(TENANT, MEMBER, "PT_PACKAGE", 10).await;

    let (status, body) = app
        .post(&format!("/api/v1/{}/bookings", TENANT), pt_booking("10:00"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entitlement_id"], json!(older));
}

#[tokio::test]
async fn list_bookings_filters_and_paginates() {
    let app = booked_app().await;

    for start in ["09:00", "10:00", "11:00"] {
        let (status, _) = app
            .post(&format!("/api/v1/{}/bookings", TENANT), pt_booking(start))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, page) = app
        .get(&format!("/api/v1/{}/bookings?page=1&limit=2", TENANT))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);

    let (_, page) = app
        .get(&format!(
            "/api/v1/{}/bookings?trainer_id=nobody",
            TENANT
        ))
        .await;
    assert_eq!(page["total"], 0);

    let (_, page) = app
        .get(&format!(
            "/api/v1/{}/bookings?member_id={}&status=SCHEDULED",
            TENANT, MEMBER
        ))
        .await;
    assert_eq!(page["total"], 3);

    // Tenant isolation: another tenant sees nothing.
    let (_, page) = app.get("/api/v1/gym-b/bookings").await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn get_booking_by_id() {
    let app = booked_app().await;
    let (_, created) = app
        .post(&format!("/api/v1/{}/bookings", TENANT), pt_booking("10:00"))
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = app
        .get(&format!("/api/v1/{}/bookings/{}", TENANT, id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(id));

    let (status, _) = app
        .get(&format!("/api/v1/{}/bookings/{}", TENANT, "missing"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Not visible from another tenant.
    let (status, _) = app.get(&format!("/api/v1/gym-b/bookings/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
