//! Inbound SMS webhook
//!
//! Twilio posts every inbound message as a form. The handler logs the
//! fields as received, starts the dispatch loop in the background and
//! acknowledges immediately. The response never reflects the outcome;
//! replies reach the client by SMS.

use axum::body::Bytes;
use axum::extract::Extension;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use homeline_channels::{parse_form, InboundSms};
use homeline_core::utils::mask_phone;
use homeline_core::Dispatcher;
use std::sync::Arc;
use tracing::{debug, error, info, warn, Instrument};

/// Body of every webhook response
pub const ACK: &str = "Ok";

async fn incoming_sms_hook(
    Extension(dispatcher): Extension<Arc<Dispatcher>>,
    body: Bytes,
) -> Json<&'static str> {
    let fields = match parse_form(&body) {
        Ok(fields) => fields,
        Err(e) => {
            warn!(error = %e, "Undecodable SMS webhook body");
            return Json(ACK);
        }
    };

    info!(fields = ?fields, "Incoming SMS webhook");

    match InboundSms::from_fields(&fields) {
        Some(sms) => spawn_dispatch(dispatcher, sms),
        None => debug!("Webhook carried no message to dispatch"),
    }

    Json(ACK)
}

fn spawn_dispatch(dispatcher: Arc<Dispatcher>, sms: InboundSms) {
    let span = tracing::info_span!("sms", from = %mask_phone(&sms.from), sid = ?sms.message_sid);
    tokio::spawn(
        async move {
            match dispatcher.execute(&sms.from, &sms.body).await {
                Ok(results) => info!(results = results.len(), "Message dispatched"),
                Err(e) => error!(error = %e, "Dispatch failed"),
            }
        }
        .instrument(span),
    );
}

/// Create webhook routes
pub fn webhooks_routes() -> Router {
    Router::new().route("/incoming-sms-hook", post(incoming_sms_hook))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{body_json, dispatcher_with};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use homeline_core::{HistoryStore, MemoryStore, Turn};
    use homeline_llm::MockProvider;
    use std::time::Duration;
    use tower::ServiceExt;

    fn form_request(body: &str) -> Request<Body> {
        Request::post("/incoming-sms-hook")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn wait_for_turns(store: &MemoryStore, key: &str, count: usize) -> Vec<Turn> {
        for _ in 0..200 {
            let turns = store.read_all(key).await.unwrap();
            if turns.len() >= count {
                return turns;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        store.read_all(key).await.unwrap()
    }

    #[tokio::test]
    async fn test_message_is_acknowledged_and_dispatched() {
        let mock = MockProvider::new();
        mock.add_response("```json\n[{\"Client\":\"Hello!\"}]\n```");
        let store = MemoryStore::new();
        let app = webhooks_routes().layer(Extension(dispatcher_with(&mock, &store)));

        let fields: &[(&str, &str)] = &[
            ("MessageSid", "SM1"),
            ("From", "+15550001111"),
            ("To", "+15550009999"),
            ("Body", "Is 12 Elm St available?"),
        ];
        let body = serde_urlencoded::to_string(fields).unwrap();
        let response = app.oneshot(form_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!("Ok"));

        let turns = wait_for_turns(&store, "+15550001111", 2).await;
        assert_eq!(
            turns,
            vec![Turn::user("Is 12 Elm St available?"), Turn::assistant("Hello!")]
        );
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_status_callback_is_acknowledged_only() {
        let mock = MockProvider::new();
        let store = MemoryStore::new();
        let app = webhooks_routes().layer(Extension(dispatcher_with(&mock, &store)));

        let response = app
            .oneshot(form_request("MessageSid=SM1&MessageStatus=delivered"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!("Ok"));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(mock.call_count(), 0);
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_restart_clears_session() {
        let mock = MockProvider::new();
        let store = MemoryStore::new();
        store
            .append("+15550001111", homeline_core::Role::User, "Hi")
            .await
            .unwrap();
        let app = webhooks_routes().layer(Extension(dispatcher_with(&mock, &store)));

        let response = app
            .oneshot(form_request("From=%2B15550001111&Body=Restart"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        for _ in 0..200 {
            if store.session_count().await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(store.session_count().await, 0);
        assert_eq!(mock.call_count(), 0);
    }
}
