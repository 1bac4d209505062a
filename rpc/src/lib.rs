#![allow(dead_code)]
#![deny(warnings)]

//! Wire types and a thin JSON-over-HTTP client shared between the worker and
//! coordinator binaries, so the two never drift on field names or status-code
//! handling.

pub mod errors;
pub use errors::{RpcError, RpcResult};

pub mod wire;
pub use wire::*;

pub mod client;
pub use client::{get_json, post_json};
