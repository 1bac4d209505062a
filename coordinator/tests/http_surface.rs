//! Exercises the coordinator's HTTP routing layer directly, without binding a socket
//! or any real worker.

use hyper::{Body, Method, Request, StatusCode};
use serde_json::{json, Value};

use coordinator::config::Config;
use coordinator::handlers;
use coordinator::service::CoordinatorService;

fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        ring_replicas: 10,
        worker_rpc_timeout: std::time::Duration::from_millis(100),
        status_rpc_timeout: std::time::Duration::from_millis(100),
    }
}

async fn body_json(resp: hyper::Response<Body>) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = hyper::body::to_bytes(resp.into_body()).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn health_reports_coordinator() {
    let service = CoordinatorService::new(&test_config());
    let req = Request::builder().method(Method::GET).uri("/health").body(Body::empty()).unwrap();
    let resp = handlers::route(req, service).await.unwrap();
    let (status, json) = body_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["service"], "coordinator");
}

#[tokio::test]
async fn status_with_no_workers_reports_zero() {
    let service = CoordinatorService::new(&test_config());
    let req = Request::builder().method(Method::GET).uri("/status").body(Body::empty()).unwrap();
    let resp = handlers::route(req, service).await.unwrap();
    let (status, json) = body_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["active_workers_count"], 0);
    assert_eq!(json["worker_details"], json!([]));
}

#[tokio::test]
async fn register_then_deregister_worker() {
    let service = CoordinatorService::new(&test_config());
    let body = json!({"node_id": "worker-1", "node_url": "http://127.0.0.1:4000"});
    let req = Request::builder()
        .method(Method::POST)
        .uri("/register_worker")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = handlers::route(req, service.clone()).await.unwrap();
    let (status, _) = body_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(service.registry().len(), 1);

    let body = json!({"node_id": "worker-1"});
    let req = Request::builder()
        .method(Method::POST)
        .uri("/deregister_worker")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = handlers::route(req, service.clone()).await.unwrap();
    let (status, _) = body_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(service.registry().len(), 0);
}

#[tokio::test]
async fn deregistering_unknown_worker_is_not_found() {
    let service = CoordinatorService::new(&test_config());
    let body = json!({"node_id": "ghost"});
    let req = Request::builder()
        .method(Method::POST)
        .uri("/deregister_worker")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = handlers::route(req, service).await.unwrap();
    let (status, _) = body_json(resp).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn insert_with_no_workers_is_service_unavailable() {
    let service = CoordinatorService::new(&test_config());
    let body = json!({"id": "v1", "vector": [1.0, 2.0], "metadata": {}});
    let req = Request::builder()
        .method(Method::POST)
        .uri("/insert_vector")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = handlers::route(req, service).await.unwrap();
    let (status, _) = body_json(resp).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn knn_search_with_no_workers_is_service_unavailable() {
    let service = CoordinatorService::new(&test_config());
    let body = json!({"query_vector": {"id": "q", "vector": [0.0, 0.0], "metadata": {}}, "k": 3});
    let req = Request::builder()
        .method(Method::POST)
        .uri("/search/knn")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = handlers::route(req, service).await.unwrap();
    let (status, _) = body_json(resp).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn malformed_register_body_is_bad_request() {
    let service = CoordinatorService::new(&test_config());
    let req = Request::builder()
        .method(Method::POST)
        .uri("/register_worker")
        .body(Body::from("not json"))
        .unwrap();
    let resp = handlers::route(req, service).await.unwrap();
    let (status, _) = body_json(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let service = CoordinatorService::new(&test_config());
    let req = Request::builder().method(Method::GET).uri("/nope").body(Body::empty()).unwrap();
    let resp = handlers::route(req, service).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
