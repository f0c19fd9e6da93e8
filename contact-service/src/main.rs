use std::env;

use log::info;

mod config;
mod error;
mod handlers;
mod identity;
mod models;
mod routes;
mod state;
mod sync;
mod validation;


use crate::config::ServiceConfig;

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting contact service");

    let service = ServiceConfig::from_env()?;
    let app = routes::create_router(&service).await?;

    if env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        info!("Running under AWS Lambda");
        lambda_http::run(app).await
    } else {
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", service.port)).await?;
        info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, app).await?;
        Ok(())
    }
}
