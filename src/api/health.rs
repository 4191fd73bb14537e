//! Liveness and health endpoints
//!
//! - `/ping` returns the literal `"pong"`
//! - `/health` reports version and history store reachability

use axum::extract::Extension;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use homeline_core::Dispatcher;
use serde::Serialize;
use std::sync::Arc;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store: ComponentHealth,
}

/// Individual component health status
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    fn healthy(latency_ms: u64) -> Self {
        Self {
            status: "healthy",
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy",
            latency_ms: None,
            error: Some(error),
        }
    }
}

async fn ping() -> Json<&'static str> {
    Json("pong")
}

async fn health_check(Extension(dispatcher): Extension<Arc<Dispatcher>>) -> Json<HealthResponse> {
    let start = std::time::Instant::now();
    let store = match dispatcher.store().health_check().await {
        Ok(()) => ComponentHealth::healthy(start.elapsed().as_millis() as u64),
        Err(e) => ComponentHealth::unhealthy(e.to_string()),
    };

    Json(HealthResponse {
        status: if store.status == "healthy" {
            "healthy"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        store,
    })
}

/// Create health routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{body_json, dispatcher_with};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use homeline_core::MemoryStore;
    use homeline_llm::MockProvider;
    use tower::ServiceExt;

    fn app() -> Router {
        let dispatcher = dispatcher_with(&MockProvider::new(), &MemoryStore::new());
        health_routes().layer(Extension(dispatcher))
    }

    #[tokio::test]
    async fn test_ping_returns_pong() {
        let response = app()
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!("pong"));
    }

    #[tokio::test]
    async fn test_health_reports_store() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"]["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
