//! 集成测试公共工具
//!
//! 构建完整的 Router (含认证、路径规范化中间件)，以 root 身份登录。

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use epos_server::auth::JwtConfig;
use epos_server::core::{Config, PricingPolicy, build_app};
use epos_server::db::{DbService, seed};
use epos_server::ServerState;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ROOT_PASSWORD: &str = "root-pass-123";

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    pub token: String,
    // 磁盘数据库的临时目录，随 TestApp 一起释放
    _dir: Option<TempDir>,
}

fn test_config(work_dir: &str, policy: PricingPolicy) -> Config {
    Config {
        work_dir: work_dir.to_string(),
        database_path: None,
        http_port: 0,
        jwt: JwtConfig {
            secret: "integration-test-secret-at-least-32-chars".to_string(),
            expiration_minutes: 60,
            issuer: "epos-server".to_string(),
            audience: "epos-console".to_string(),
        },
        environment: "test".to_string(),
        request_timeout_ms: 30_000,
        root_password: Some(ROOT_PASSWORD.to_string()),
        pricing_policy: policy,
    }
}

async fn finish(config: Config, db: DbService, dir: Option<TempDir>) -> TestApp {
    seed::ensure_system_roles(&db.pool).await.unwrap();
    seed::ensure_root_user(&db.pool, ROOT_PASSWORD).await.unwrap();

    let state = ServerState::new(config, db);
    let app = build_app(state.clone());
    let mut test_app = TestApp {
        app,
        state,
        token: String::new(),
        _dir: dir,
    };
    test_app.token = test_app.login("root", ROOT_PASSWORD).await;
    test_app
}

/// In-memory database, catalog pricing
pub async fn spawn_app() -> TestApp {
    spawn_app_with_policy(PricingPolicy::Catalog).await
}

pub async fn spawn_app_with_policy(policy: PricingPolicy) -> TestApp {
    let db = DbService::in_memory().await.unwrap();
    finish(test_config("./data", policy), db, None).await
}

/// On-disk database (WAL, several pooled connections) for concurrency tests
pub async fn spawn_app_on_disk() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let work_dir = dir.path().to_string_lossy().to_string();
    let config = test_config(&work_dir, PricingPolicy::Catalog);
    let db = DbService::new(&config.database_file().to_string_lossy())
        .await
        .unwrap();
    finish(config, db, Some(dir)).await
}

impl TestApp {
    /// Send a request; returns status, headers and parsed JSON body (Null when empty)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, http::HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, headers, value)
    }

    /// Authenticated as root
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = self.send("GET", uri, Some(&self.token), None).await;
        (status, body)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let (status, _, body) = self.send("POST", uri, Some(&self.token), Some(body)).await;
        (status, body)
    }

    pub async fn delete(&self, uri: &str) -> StatusCode {
        self.send("DELETE", uri, Some(&self.token), None).await.0
    }

    pub async fn login(&self, user_name: &str, password: &str) -> String {
        let (status, _, body) = self
            .send(
                "POST",
                "/api/account/login",
                None,
                Some(json!({ "userName": user_name, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Create a product through the API, returns its id
    pub async fn create_product(&self, name: &str, price: f64) -> i64 {
        let (status, body) = self
            .post("/api/products", json!({ "name": name, "price": price }))
            .await;
        assert_eq!(status, StatusCode::OK, "create product failed: {body}");
        body["id"].as_i64().unwrap()
    }
}

/// Money fields are JSON numbers; compare at cent precision
pub fn assert_money(value: &Value, expected: f64) {
    let actual = value
        .as_f64()
        .unwrap_or_else(|| panic!("expected a number, got {value}"));
    assert!(
        (actual - expected).abs() < 0.005,
        "expected {expected}, got {actual}"
    );
}
