mod common;

use axum::http::StatusCode;
use chrono::{Datelike, NaiveDate};
use common::TestApp;
use serde_json::json;

const TENANT: &str = "gym-a";
const TRAINER: &str = "trainer-1";

fn day_of(date: &str) -> (NaiveDate, i32) {
    let d = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    (d, d.weekday().num_days_from_sunday() as i32)
}

#[tokio::test]
async fn replace_and_read_template() {
    let app = TestApp::new().await;

    let (status, body) = app
        .put(
            &format!("/api/v1/{}/trainers/{}/availability", TENANT, TRAINER),
            json!({
                "slots": [
                    { "day_of_week": 1, "start_time": "09:00", "end_time": "12:00" },
                    { "day_of_week": 1, "start_time": "14:00", "end_time": "18:00" },
                    { "day_of_week": 3, "start_time": "10:00", "end_time": "16:00" }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    // A second PUT replaces wholesale rather than appending.
    let (status, body) = app
        .put(
            &format!("/api/v1/{}/trainers/{}/availability", TENANT, TRAINER),
            json!({
                "slots": [
                    { "day_of_week": 1, "start_time": "08:00", "end_time": "13:00" }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let slots = body.as_array().unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0]["start_time"], "08:00");

    let (status, body) = app
        .get(&format!(
            "/api/v1/{}/trainers/{}/availability",
            TENANT, TRAINER
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn template_validation_rejects_bad_input() {
    let app = TestApp::new().await;
    let uri = format!("/api/v1/{}/trainers/{}/availability", TENANT, TRAINER);

    let (status, _) = app
        .put(
            &uri,
            json!({ "slots": [ { "day_of_week": 7, "start_time": "09:00", "end_time": "17:00" } ] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            &uri,
            json!({ "slots": [ { "day_of_week": 1, "start_time": "17:00", "end_time": "09:00" } ] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            &uri,
            json!({ "slots": [ { "day_of_week": 1, "start_time": "9am", "end_time": "17:00" } ] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn partial_block_splits_the_day() {
    let app = TestApp::new().await;
    let (date, dow) = day_of("2026-09-07");
    app.seed_template(TENANT, TRAINER, dow, "09:00", "17:00")
        .await;

    let (status, _) = app
        .post(
            &format!(
                "/api/v1/{}/trainers/{}/availability/overrides",
                TENANT, TRAINER
            ),
            json!({
                "date": date.to_string(),
                "override_type": "BLOCKED",
                "start_time": "12:00",
                "end_time": "13:00",
                "reason": "lunch"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get(&format!(
            "/api/v1/{}/trainers/{}/available-slots?date={}",
            TENANT, TRAINER, date
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let windows = body.as_array().unwrap();
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0]["start_time"], "09:00");
    assert_eq!(windows[0]["end_time"], "12:00");
    assert_eq!(windows[1]["start_time"], "13:00");
    assert_eq!(windows[1]["end_time"], "17:00");
}

#[tokio::test]
async fn modified_override_replaces_template_windows() {
    let app = TestApp::new().await;
    let (date, dow) = day_of("2026-09-08");
    app.seed_template(TENANT, TRAINER, dow, "09:00", "17:00")
        .await;

    let (status, _) = app
        .post(
            &format!(
                "/api/v1/{}/trainers/{}/availability/overrides",
                TENANT, TRAINER
            ),
            json!({
                "date": date.to_string(),
                "override_type": "MODIFIED",
                "start_time": "10:00",
                "end_time": "14:00"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get(&format!(
            "/api/v1/{}/trainers/{}/available-slots?date={}",
            TENANT, TRAINER, date
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let windows = body.as_array().unwrap();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0]["start_time"], "10:00");
    assert_eq!(windows[0]["end_time"], "14:00");
}

#[tokio::test]
async fn full_day_block_empties_the_day() {
    let app = TestApp::new().await;
    let (date, dow) = day_of("2026-09-09");
    app.seed_template(TENANT, TRAINER, dow, "09:00", "17:00")
        .await;

    let (status, created) = app
        .post(
            &format!(
                "/api/v1/{}/trainers/{}/availability/overrides",
                TENANT, TRAINER
            ),
            json!({
                "date": date.to_string(),
                "override_type": "BLOCKED",
                "reason": "holiday"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let slots_uri = format!(
        "/api/v1/{}/trainers/{}/available-slots?date={}",
        TENANT, TRAINER, date
    );
    let (status, body) = app.get(&slots_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    // Deleting the override restores the template.
    let override_id = created["id"].as_str().unwrap();
    let (status, _) = app
        .delete(&format!(
            "/api/v1/{}/trainers/{}/availability/overrides/{}",
            TENANT, TRAINER, override_id
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&slots_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn override_validation_and_range_listing() {
    let app = TestApp::new().await;
    let uri = format!(
        "/api/v1/{}/trainers/{}/availability/overrides",
        TENANT, TRAINER
    );

    // MODIFIED without times is invalid.
    let (status, _) = app
        .post(
            &uri,
            json!({ "date": "2026-09-10", "override_type": "MODIFIED" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // BLOCKED with only one bound is invalid.
    let (status, _) = app
        .post(
            &uri,
            json!({ "date": "2026-09-10", "override_type": "BLOCKED", "start_time": "12:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for date in ["2026-09-10", "2026-09-14", "2026-09-20"] {
        let (status, _) = app
            .post(
                &uri,
                json!({ "date": date, "override_type": "BLOCKED" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = app
        .get(&format!(
            "{}?date_from=2026-09-10&date_to=2026-09-15",
            uri
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = app
        .get(&format!(
            "{}?date_from=2026-09-15&date_to=2026-09-10",
            uri
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
