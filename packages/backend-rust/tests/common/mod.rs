#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use lexis_algo::DecayModel;
use lexis_backend::db::DatabaseProxy;
use lexis_backend::state::AppState;

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseProxy,
    pub now: DateTime<Utc>,
    _dir: TempDir,
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
}

pub async fn create_test_db() -> (DatabaseProxy, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let url = format!("sqlite:{}", dir.path().join("lexis-test.db").display());
    let db = DatabaseProxy::connect(&url, 2)
        .await
        .expect("failed to open test database");
    (db, dir)
}

pub async fn create_test_app_at(now: DateTime<Utc>) -> TestApp {
    let (db, dir) = create_test_db().await;
    let state = AppState::new(db.clone(), DecayModel::default()).with_fixed_now(now);
    TestApp {
        app: lexis_backend::create_app(state),
        db,
        now,
        _dir: dir,
    }
}

pub async fn create_test_app() -> TestApp {
    create_test_app_at(fixed_now()).await
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("X-User-Id", user);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
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

    pub async fn get(&self, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, user, None).await
    }

    pub async fn post(&self, uri: &str, user: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, user, Some(body)).await
    }

    pub async fn put(&self, uri: &str, user: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, user, Some(body)).await
    }
}
