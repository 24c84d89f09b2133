//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::time::Duration;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use axum::{Router, middleware};
use http::StatusCode;
use http::uri::{PathAndQuery, Uri};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::{Config, Result, ServerError, ServerState};
use crate::utils::{AppError, ErrorCode};

/// HTTP 请求日志中间件
async fn log_request(request: Request, next: middleware::Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// 超时的空 408 换成统一错误体
async fn timeout_body(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return AppError::new(ErrorCode::TimeoutError).into_response();
    }
    response
}

/// `/api` 路径大小写不敏感: `/api/Orders` 与 `/api/orders` 等价
///
/// 在路由匹配之前改写 URI，查询字符串保持不变。
async fn normalize_api_path(mut request: Request) -> Request {
    let path = request.uri().path();
    if !path.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("/api")) {
        return request;
    }
    if !path.bytes().any(|b| b.is_ascii_uppercase()) {
        return request;
    }

    let lowered = match request.uri().query() {
        Some(q) => format!("{}?{}", path.to_ascii_lowercase(), q),
        None => path.to_ascii_lowercase(),
    };
    let mut parts = request.uri().clone().into_parts();
    if let Ok(pq) = PathAndQuery::try_from(lowered) {
        parts.path_and_query = Some(pq);
        if let Ok(uri) = Uri::from_parts(parts) {
            *request.uri_mut() = uri;
        }
    }
    request
}

/// Build the Axum router (without state)
pub fn api_routes() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(crate::api::health::router())
        .merge(crate::api::account::router())
        .merge(crate::api::users::router())
        // Catalog
        .merge(crate::api::categories::router())
        .merge(crate::api::products::router())
        // Orders & ledger
        .merge(crate::api::orders::router())
        .merge(crate::api::transactions::router())
}

/// Build the complete application with state and middleware
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    let api = api_routes()
        // JWT 认证中间件 - 在 Router 级别应用，require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    // 外层 Router 只包一层 fallback，使路径改写发生在路由匹配之前
    Router::new()
        .fallback_service(api)
        .layer(middleware::map_request(normalize_api_path))
        // Tower HTTP 中间件
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(middleware::map_response(timeout_body))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with initialized state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> Result<()> {
        let app = build_app(self.state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("EPOS server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.into()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[tokio::test]
    async fn test_timeout_gets_error_body() {
        let timed_out = StatusCode::REQUEST_TIMEOUT.into_response();
        let response = timeout_body(timed_out).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], 9004);

        let ok = timeout_body(StatusCode::NO_CONTENT.into_response()).await;
        assert_eq!(ok.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_normalize_api_path() {
        let req = Request::builder()
            .uri("/api/Orders/12/Process?Verbose=1")
            .body(Body::empty())
            .unwrap();
        let req = normalize_api_path(req).await;
        assert_eq!(req.uri().path(), "/api/orders/12/process");
        assert_eq!(req.uri().query(), Some("Verbose=1"));

        let req = Request::builder().uri("/Health").body(Body::empty()).unwrap();
        let req = normalize_api_path(req).await;
        assert_eq!(req.uri().path(), "/Health");

        let req = Request::builder().uri("/API/User").body(Body::empty()).unwrap();
        let req = normalize_api_path(req).await;
        assert_eq!(req.uri().path(), "/api/user");
    }
}
