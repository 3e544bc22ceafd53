//! Axum router and handlers for the five metadata endpoints.

use crate::error::Result;
use crate::models::{
    DownloadMetadataQuery, HeartbeatRequest, ListFilesResponse, RegisterDataNodeRequest,
    StatusResponse, UploadRequest,
};
use crate::store::MetadataStore;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(store: Arc<MetadataStore>) -> Router {
    Router::new()
        .route("/register_datanode", post(register_datanode))
        .route("/heartbeat", post(heartbeat))
        .route("/upload_request", post(upload_request))
        .route("/download_metadata", get(download_metadata))
        .route("/list_files", get(list_files))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

async fn register_datanode(
    State(store): State<Arc<MetadataStore>>,
    Json(req): Json<RegisterDataNodeRequest>,
) -> Json<StatusResponse> {
    store.register_node(req.node_id, req.host, req.port);
    Json(StatusResponse::ok())
}

async fn heartbeat(
    State(store): State<Arc<MetadataStore>>,
    Json(req): Json<HeartbeatRequest>,
) -> Json<StatusResponse> {
    store.heartbeat(req.node_id, req.host, req.port, req.chunks);
    Json(StatusResponse::ok())
}

async fn upload_request(
    State(store): State<Arc<MetadataStore>>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<crate::models::UploadResponse>> {
    let resp = store.upload_request(req.filename, req.num_chunks)?;
    Ok(Json(resp))
}

async fn download_metadata(
    State(store): State<Arc<MetadataStore>>,
    Query(query): Query<DownloadMetadataQuery>,
) -> Result<Json<crate::models::DownloadMetadataResponse>> {
    let resp = store.download_metadata(&query.filename)?;
    Ok(Json(resp))
}

async fn list_files(State(store): State<Arc<MetadataStore>>) -> Json<ListFilesResponse> {
    Json(ListFilesResponse {
        files: store.list_files(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetadataConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_store() -> Arc<MetadataStore> {
        Arc::new(MetadataStore::new(MetadataConfig::default()))
    }

    #[tokio::test]
    async fn test_list_files_empty() {
        let app = router(test_store());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/list_files")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_upload_without_nodes_returns_500() {
        let app = router(test_store());
        let body = serde_json::json!({"filename": "x", "num_chunks": 1}).to_string();
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload_request")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_download_missing_file_returns_404() {
        let app = router(test_store());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/download_metadata?filename=nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
