//! Worker node entry point: binds an HTTP server over one M-Tree shard.

use std::convert::Infallible;
use std::net::SocketAddr;

use hyper::service::{make_service_fn, service_fn};
use hyper::Server;
use log::info;

use worker::config::Config;
use worker::service::{self, WorkerService};
use worker::handlers;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));
    }
    pretty_env_logger::init();

    let config = Config::from_env();
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let worker = WorkerService::new(&config);
    info!(
        "worker '{}' starting on {} (advertising {})",
        worker.node_id, addr, config.advertise_url
    );

    service::self_register(&config).await;

    let make_svc = make_service_fn(move |_conn| {
        let worker = worker.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let worker = worker.clone();
                async move { handlers::route(req, worker).await }
            }))
        }
    });

    let server = Server::bind(&addr).serve(make_svc);
    info!("worker listening on http://{}", addr);
    server.await?;
    Ok(())
}
