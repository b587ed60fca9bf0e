use gym_scheduling_backend::{
    api::router::create_router,
    config::Config,
    infra::repositories::{
        sqlite_availability_repo::SqliteAvailabilityRepo, sqlite_booking_repo::SqliteBookingRepo,
        sqlite_entitlement_repo::SqliteEntitlementRepo, sqlite_override_repo::SqliteOverrideRepo,
        sqlite_settings_repo::SqliteSettingsRepo,
    },
    domain::services::booking_lifecycle::BookingService,
    domain::services::calendar::CalendarAggregator,
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
        };

        let availability_repo = Arc::new(SqliteAvailabilityRepo::new(pool.clone()));
        let override_repo = Arc::new(SqliteOverrideRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let entitlement_repo = Arc::new(SqliteEntitlementRepo::new(pool.clone()));
        let settings_repo = Arc::new(SqliteSettingsRepo::new(pool.clone()));

        let booking_service = Arc::new(BookingService::new(
            booking_repo.clone(),
            availability_repo.clone(),
            override_repo.clone(),
            entitlement_repo.clone(),
            settings_repo.clone(),
        ));
        let calendar = Arc::new(CalendarAggregator::new(
            booking_repo.clone(),
            availability_repo.clone(),
            override_repo.clone(),
        ));

        let state = Arc::new(AppState {
            config,
            availability_repo,
            override_repo,
            booking_repo,
            entitlement_repo,
            settings_repo,
            booking_service,
            calendar,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, None).await
    }

    /// Weekly template slot for a trainer, all seven days by default left to
    /// the caller; this inserts a single day window.
    #[allow(dead_code)]
    pub async fn seed_template(
        &self,
        tenant: &str,
        trainer: &str,
        day_of_week: i32,
        start: &str,
        end: &str,
    ) {
        let (status, _) = self
            .put(
                &format!("/api/v1/{}/trainers/{}/availability", tenant, trainer),
                serde_json::json!({
                    "slots": [
                        { "day_of_week": day_of_week, "start_time": start, "end_time": end }
                    ]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    /// Availability template covering every day of the week.
    #[allow(dead_code)]
    pub async fn seed_full_week(&self, tenant: &str, trainer: &str, start: &str, end: &str) {
        let slots: Vec<Value> = (0..7)
            .map(|d| {
                serde_json::json!({ "day_of_week": d, "start_time": start, "end_time": end })
            })
            .collect();
        let (status, _) = self
            .put(
                &format!("/api/v1/{}/trainers/{}/availability", tenant, trainer),
                serde_json::json!({ "slots": slots }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    /// Creates an entitlement and returns its id.
    #[allow(dead_code)]
    pub async fn seed_entitlement(
        &self,
        tenant: &str,
        member: &str,
        kind: &str,
        total_sessions: i32,
    ) -> String {
        let (status, body) = self
            .post(
                &format!("/api/v1/{}/entitlements", tenant),
                serde_json::json!({
                    "member_id": member,
                    "kind": kind,
                    "total_sessions": total_sessions
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["id"].as_str().unwrap().to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
