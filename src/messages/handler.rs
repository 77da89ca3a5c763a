//! HTTP handler for message ingestion
//!
//! - POST /api/v1/messages - validate and store one inbound message

use crate::error::ApiError;
use crate::messages::{ingest_message, IngestRequest};
use crate::storage::MessageStore;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use std::sync::Arc;

/// Shared state for the ingestion handler
#[derive(Clone)]
pub struct MessagesState {
    pub store: Arc<dyn MessageStore>,
}

/// Create the ingestion router
pub fn messages_router(state: MessagesState) -> Router {
    Router::new()
        .route("/api/v1/messages", post(create_message))
        .with_state(state)
}

/// POST /api/v1/messages
async fn create_message(
    State(state): State<MessagesState>,
    Json(request): Json<IngestRequest>,
) -> impl IntoResponse {
    match ingest_message(state.store.as_ref(), request).await {
        Ok(message) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": "Message ingested successfully",
                "data": message,
            })),
        ),
        Err(e) => {
            if e.status_code().is_server_error() {
                tracing::error!(error = %e, "Failed to ingest message");
            }
            (
                e.status_code(),
                Json(serde_json::json!(ApiError::from(&e))),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::messages::Message;
    use crate::storage::{MemoryStore, ScanPage};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct BrokenStore;

    #[async_trait]
    impl MessageStore for BrokenStore {
        async fn scan(&self, _cursor: Option<&str>) -> Result<ScanPage<Message>> {
            Err(Error::StorageRead("offline".into()))
        }

        async fn put(&self, _message: Message) -> Result<()> {
            Err(Error::StorageWrite("offline".into()))
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_json(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/messages")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_ingest_stores_message() {
        let store = Arc::new(MemoryStore::new(10));
        let app = messages_router(MessagesState {
            store: store.clone(),
        });

        let resp = app
            .oneshot(post_json(serde_json::json!({
                "id": "SM1",
                "sender": "+15550001111",
                "body": "book a flight"
            })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["id"], "SM1");
        assert!(json["data"]["receivedAt"].is_string());
        assert_eq!(store.message_count().await, 1);
    }

    #[tokio::test]
    async fn test_ingest_twilio_payload() {
        let store = Arc::new(MemoryStore::new(10));
        let app = messages_router(MessagesState {
            store: store.clone(),
        });

        let resp = app
            .oneshot(post_json(serde_json::json!({
                "MessageSid": "SM2",
                "From": "+15550002222",
                "Body": "late checkout"
            })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let page = store.scan(None).await.unwrap();
        assert_eq!(page.items[0].body, "late checkout");
    }

    #[tokio::test]
    async fn test_ingest_missing_field_is_bad_request() {
        let store = Arc::new(MemoryStore::new(10));
        let app = messages_router(MessagesState {
            store: store.clone(),
        });

        let resp = app
            .oneshot(post_json(serde_json::json!({ "id": "SM3", "body": "hi" })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("sender"));
        assert_eq!(store.message_count().await, 0);
    }

    #[tokio::test]
    async fn test_ingest_storage_failure_is_server_error() {
        let app = messages_router(MessagesState {
            store: Arc::new(BrokenStore),
        });

        let resp = app
            .oneshot(post_json(serde_json::json!({
                "id": "SM4",
                "sender": "+1",
                "body": "x"
            })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
