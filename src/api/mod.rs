//! HTTP API
//!
//! - `health`: `/ping` and `/health`
//! - `webhooks`: `/incoming-sms-hook`

mod health;
mod webhooks;

pub use health::health_routes;
pub use webhooks::webhooks_routes;

use axum::extract::Extension;
use axum::Router;
use homeline_core::Dispatcher;
use std::sync::Arc;

/// Build the application router
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(webhooks_routes())
        .layer(Extension(dispatcher))
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::response::Response;
    use homeline_core::{Dispatcher, ExecutorSet, LlmPlanner, MemoryStore, PlannerConfig};
    use homeline_llm::MockProvider;
    use http_body_util::BodyExt;
    use std::sync::Arc;

    pub fn dispatcher_with(mock: &MockProvider, store: &MemoryStore) -> Arc<Dispatcher> {
        let planner = LlmPlanner::new(Arc::new(mock.clone()), PlannerConfig::default());
        Arc::new(Dispatcher::new(
            Arc::new(store.clone()),
            Arc::new(planner),
            ExecutorSet::default(),
        ))
    }

    pub async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}
