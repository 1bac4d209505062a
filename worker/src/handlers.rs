//! HTTP routing for a worker: `GET /health`, `GET /status`, `POST /insert`,
//! `POST /search/knn`, `POST /search/range`. Mirrors the plain method/path match used
//! to route cover-tree queries, just over this service's own request and response
//! shapes instead of JSON-encoded points.

use hyper::{Body, Method, Request, Response, StatusCode};
use log::error;
use mtree::vector::SearchResultWire;
use rpc::{Ack, ErrorBody, KnnRequest, RangeRequest, SearchResponse, WorkerHealthResponse, WorkerStatusResponse};

use crate::errors::ServiceError;
use crate::service::WorkerService;

pub async fn route(req: Request<Body>, service: WorkerService) -> Result<Response<Body>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = match (method, path.as_str()) {
        (Method::GET, "/health") => health(&service),
        (Method::GET, "/status") => status(&service).await,
        (Method::POST, "/insert") => insert(req, &service).await,
        (Method::POST, "/search/knn") => search_knn(req, &service).await,
        (Method::POST, "/search/range") => search_range(req, &service).await,
        _ => not_found(),
    };
    Ok(response)
}

fn health(service: &WorkerService) -> Response<Body> {
    json_response(
        StatusCode::OK,
        &WorkerHealthResponse {
            status: "healthy".to_string(),
            node_id: service.node_id.clone(),
        },
    )
}

async fn status(service: &WorkerService) -> Response<Body> {
    let status = service.status().await;
    json_response(
        StatusCode::OK,
        &WorkerStatusResponse {
            node_id: status.node_id,
            status: "READY".to_string(),
            m_tree_size: status.size,
            m_tree_metrics: status.metrics,
        },
    )
}

async fn insert(req: Request<Body>, service: &WorkerService) -> Response<Body> {
    let vector = match read_body::<mtree::Vector>(req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = vector.id.clone();
    match service.insert(vector).await {
        Ok(()) => json_response(StatusCode::CREATED, &Ack::success(format!("vector {} inserted", id))),
        Err(e) => service_error_response(e.into()),
    }
}

async fn search_knn(req: Request<Body>, service: &WorkerService) -> Response<Body> {
    let body = match read_body::<KnnRequest>(req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match service.knn(&body.query_vector.data, body.k).await {
        Ok(results) => {
            let wire: Vec<SearchResultWire> = results.iter().map(SearchResultWire::from).collect();
            json_response(StatusCode::OK, &SearchResponse::ok(wire))
        }
        Err(e) => service_error_response(e.into()),
    }
}

async fn search_range(req: Request<Body>, service: &WorkerService) -> Response<Body> {
    let body = match read_body::<RangeRequest>(req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match service.range(&body.query_vector.data, body.radius).await {
        Ok(results) => {
            let wire: Vec<SearchResultWire> = results.iter().map(SearchResultWire::from).collect();
            json_response(StatusCode::OK, &SearchResponse::ok(wire))
        }
        Err(e) => service_error_response(e.into()),
    }
}

fn not_found() -> Response<Body> {
    json_response(StatusCode::NOT_FOUND, &ErrorBody::new("no such route"))
}

fn service_error_response(err: ServiceError) -> Response<Body> {
    json_response(err.status_code(), &ErrorBody::new(err.message()))
}

async fn read_body<T: serde::de::DeserializeOwned>(req: Request<Body>) -> Result<T, Response<Body>> {
    let bytes = match hyper::body::to_bytes(req.into_body()).await {
        Ok(b) => b,
        Err(e) => {
            error!("failed to read request body: {}", e);
            return Err(json_response(
                StatusCode::BAD_REQUEST,
                &ErrorBody::new("failed to read request body"),
            ));
        }
    };
    serde_json::from_slice(&bytes).map_err(|e| {
        json_response(
            StatusCode::BAD_REQUEST,
            &ErrorBody::new(format!("invalid request body: {}", e)),
        )
    })
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> Response<Body> {
    let json = serde_json::to_vec(body).expect("response types always serialize");
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(json))
        .expect("static response parts are always valid")
}
