//! Axum router for the two data node endpoints.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use blobmesh_core::ChunkId;
use blobmesh_storage::ChunkStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

pub fn router(store: Arc<dyn ChunkStore>) -> Router {
    Router::new()
        .route("/store_chunk", post(store_chunk))
        .route("/get_chunk", get(get_chunk))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

#[derive(Debug, Deserialize)]
pub struct ChunkQuery {
    pub chunk_id: String,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
}

async fn store_chunk(
    State(store): State<Arc<dyn ChunkStore>>,
    Query(query): Query<ChunkQuery>,
    body: Bytes,
) -> Response {
    let id = ChunkId::from(query.chunk_id.as_str());
    match store.put(&id, body).await {
        Ok(()) => (StatusCode::OK, Json(StatusResponse { status: "ok" })).into_response(),
        Err(e) => {
            error!(chunk = %id, error = %e, "store_chunk failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_chunk(
    State(store): State<Arc<dyn ChunkStore>>,
    Query(query): Query<ChunkQuery>,
) -> Response {
    let id = ChunkId::from(query.chunk_id.as_str());
    match store.get(&id).await {
        Ok(Some(bytes)) => bytes.into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!(chunk = %id, error = %e, "get_chunk failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use blobmesh_storage::MemoryStore;
    use tower::ServiceExt;

    fn test_store() -> Arc<dyn ChunkStore> {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_store_then_get() {
        let app = router(test_store());

        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/store_chunk?chunk_id=f.txt_chunk_0")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/get_chunk?chunk_id=f.txt_chunk_0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn test_get_missing_is_404() {
        let app = router(test_store());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/get_chunk?chunk_id=missing_chunk_0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
