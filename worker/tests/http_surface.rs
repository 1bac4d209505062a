//! Exercises the worker's HTTP routing layer directly, without binding a socket.

use std::time::Duration;

use hyper::{Body, Method, Request, StatusCode};
use serde_json::{json, Value};

use worker::config::Config;
use worker::handlers;
use worker::service::WorkerService;

fn test_config() -> Config {
    Config {
        node_id: "worker-http-test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        advertise_url: "http://127.0.0.1:0".to_string(),
        orchestrator_url: None,
        rpc_timeout: Duration::from_millis(100),
        distance_metric: mtree::DistanceMetric::Euclidean,
        max_children: 8,
        min_children: 3,
    }
}

async fn body_json(resp: hyper::Response<Body>) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = hyper::body::to_bytes(resp.into_body()).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn health_reports_node_id() {
    let service = WorkerService::new(&test_config());
    let req = Request::builder().method(Method::GET).uri("/health").body(Body::empty()).unwrap();
    let resp = handlers::route(req, service).await.unwrap();
    let (status, json) = body_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["node_id"], "worker-http-test");
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn insert_then_status_reflects_size() {
    let service = WorkerService::new(&test_config());
    let body = json!({"id": "v1", "vector": [1.0, 2.0], "metadata": {}});
    let req = Request::builder()
        .method(Method::POST)
        .uri("/insert")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = handlers::route(req, service.clone()).await.unwrap();
    let (status, _) = body_json(resp).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = Request::builder().method(Method::GET).uri("/status").body(Body::empty()).unwrap();
    let resp = handlers::route(req, service).await.unwrap();
    let (status, json) = body_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["m_tree_size"], 1);
}

#[tokio::test]
async fn malformed_insert_body_is_bad_request() {
    let service = WorkerService::new(&test_config());
    let req = Request::builder()
        .method(Method::POST)
        .uri("/insert")
        .body(Body::from("not json"))
        .unwrap();
    let resp = handlers::route(req, service).await.unwrap();
    let (status, _) = body_json(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn knn_with_zero_k_is_bad_request() {
    let service = WorkerService::new(&test_config());
    let body = json!({"query_vector": {"id": "q", "vector": [0.0, 0.0], "metadata": {}}, "k": 0});
    let req = Request::builder()
        .method(Method::POST)
        .uri("/search/knn")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = handlers::route(req, service).await.unwrap();
    let (status, _) = body_json(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let service = WorkerService::new(&test_config());
    let req = Request::builder().method(Method::GET).uri("/nope").body(Body::empty()).unwrap();
    let resp = handlers::route(req, service).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
