//! A thin JSON-over-HTTP client, shared by the coordinator (fanning out to workers)
//! and by a worker's best-effort self-registration call to the coordinator.

use std::time::Duration;

use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{RpcError, RpcResult};

/// Issues a `POST` with a JSON body to `url` and decodes the JSON response body as
/// `Resp`. Returns [`RpcError::Status`] if the peer responded with anything outside
/// 2xx, without attempting to decode the body in that case.
pub async fn post_json<Req, Resp>(
    client: &Client<HttpConnector>,
    url: &str,
    body: &Req,
    timeout: Duration,
) -> RpcResult<Resp>
where
    Req: Serialize,
    Resp: DeserializeOwned,
{
    let payload = serde_json::to_vec(body)?;
    let request = Request::builder()
        .method(Method::POST)
        .uri(url)
        .header("content-type", "application/json")
        .body(Body::from(payload))?;

    let response = tokio::time::timeout(timeout, client.request(request))
        .await
        .map_err(|_| RpcError::Status(StatusCode::REQUEST_TIMEOUT))??;

    if !response.status().is_success() {
        return Err(RpcError::Status(response.status()));
    }

    let bytes = hyper::body::to_bytes(response.into_body()).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Issues a `GET` and decodes the JSON response body as `Resp`.
pub async fn get_json<Resp>(
    client: &Client<HttpConnector>,
    url: &str,
    timeout: Duration,
) -> RpcResult<Resp>
where
    Resp: DeserializeOwned,
{
    let request = Request::builder().method(Method::GET).uri(url).body(Body::empty())?;

    let response = tokio::time::timeout(timeout, client.request(request))
        .await
        .map_err(|_| RpcError::Status(StatusCode::REQUEST_TIMEOUT))??;

    if !response.status().is_success() {
        return Err(RpcError::Status(response.status()));
    }

    let bytes = hyper::body::to_bytes(response.into_body()).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
