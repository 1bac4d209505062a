//! Coordinator entry point: binds an HTTP server that routes vectors across a fleet
//! of worker nodes registered at runtime.

use std::convert::Infallible;
use std::net::SocketAddr;

use hyper::service::{make_service_fn, service_fn};
use hyper::Server;
use log::info;

use coordinator::config::Config;
use coordinator::handlers;
use coordinator::service::CoordinatorService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));
    }
    pretty_env_logger::init();

    let config = Config::from_env();
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let service = CoordinatorService::new(&config);
    info!("coordinator starting on {}", addr);

    let make_svc = make_service_fn(move |_conn| {
        let service = service.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let service = service.clone();
                async move { handlers::route(req, service).await }
            }))
        }
    });

    let server = Server::bind(&addr).serve(make_svc);
    info!("coordinator listening on http://{}", addr);
    server.await?;
    Ok(())
}
