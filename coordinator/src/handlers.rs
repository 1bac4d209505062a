//! HTTP routing for the coordinator: `GET /health`, `GET /status`,
//! `POST /register_worker`, `POST /deregister_worker`, `POST /insert_vector`,
//! `POST /search/knn`, `POST /search/range`.

use hyper::{Body, Method, Request, Response, StatusCode};
use log::error;
use mtree::Vector;
use rpc::{Ack, CoordinatorHealthResponse, DeregisterWorkerRequest, ErrorBody, KnnRequest, RangeRequest,
    RegisterWorkerRequest, SearchResponse};

use crate::errors::ServiceError;
use crate::service::CoordinatorService;

pub async fn route(req: Request<Body>, service: CoordinatorService) -> Result<Response<Body>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = match (method, path.as_str()) {
        (Method::GET, "/health") => health(),
        (Method::GET, "/status") => status(&service).await,
        (Method::POST, "/register_worker") => register_worker(req, &service).await,
        (Method::POST, "/deregister_worker") => deregister_worker(req, &service).await,
        (Method::POST, "/insert_vector") => insert_vector(req, &service).await,
        (Method::POST, "/search/knn") => search_knn(req, &service).await,
        (Method::POST, "/search/range") => search_range(req, &service).await,
        _ => not_found(),
    };
    Ok(response)
}

fn health() -> Response<Body> {
    json_response(StatusCode::OK, &CoordinatorHealthResponse::default())
}

async fn status(service: &CoordinatorService) -> Response<Body> {
    json_response(StatusCode::OK, &service.system_status().await)
}

async fn register_worker(req: Request<Body>, service: &CoordinatorService) -> Response<Body> {
    let body = match read_body::<RegisterWorkerRequest>(req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    service.registry().register(&body.node_id, &body.node_url);
    json_response(
        StatusCode::OK,
        &Ack::success(format!("worker {} registered", body.node_id)),
    )
}

async fn deregister_worker(req: Request<Body>, service: &CoordinatorService) -> Response<Body> {
    let body = match read_body::<DeregisterWorkerRequest>(req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if service.registry().deregister(&body.node_id) {
        json_response(
            StatusCode::OK,
            &Ack::success(format!("worker {} deregistered", body.node_id)),
        )
    } else {
        json_response(
            StatusCode::NOT_FOUND,
            &Ack::error(format!("worker {} was not registered", body.node_id)),
        )
    }
}

async fn insert_vector(req: Request<Body>, service: &CoordinatorService) -> Response<Body> {
    let vector = match read_body::<Vector>(req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let id = vector.id.clone();
    match service.insert_vector(vector).await {
        Ok(()) => json_response(
            StatusCode::ACCEPTED,
            &Ack::success(format!("vector {} routed for insertion", id)),
        ),
        Err(e) => service_error_response(e),
    }
}

async fn search_knn(req: Request<Body>, service: &CoordinatorService) -> Response<Body> {
    let body = match read_body::<KnnRequest>(req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match service.knn_search(body.query_vector, body.k).await {
        Ok(results) => json_response(StatusCode::OK, &SearchResponse::ok(results)),
        Err(e) => service_error_response(e),
    }
}

async fn search_range(req: Request<Body>, service: &CoordinatorService) -> Response<Body> {
    let body = match read_body::<RangeRequest>(req).await {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match service.range_search(body.query_vector, body.radius).await {
        Ok(results) => json_response(StatusCode::OK, &SearchResponse::ok(results)),
        Err(e) => service_error_response(e),
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
