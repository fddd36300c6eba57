#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod metric_routes;

use aide::{
    axum::{ApiRouter, routing::get},
    openapi::OpenApi,
};
use axum::{Extension, Json};
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;
use sts_core::ports::CacheRepository;
use sts_engine::dispatch::Dispatcher;
use tower_http::cors::CorsLayer;
use tracing::{Level, event};

mod openapi;
use openapi::{api_docs, docs_routes};

pub mod config;
use config::AxumConfig;

/// Response for the health check endpoint
#[derive(Serialize, JsonSchema)]
#[schemars(inline)]
struct HealthResponse {
    status: String,
}

/// Simple health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Construct the full API router around a running dispatcher.
pub fn router<C: ApiCache>(dispatcher: Dispatcher<C>, config: AxumConfig) -> axum::Router {
    let mut api = OpenApi::default();
    ApiRouter::new()
        .api_route("/health", get(health_check))
        .nest("/metrics", metric_routes::router())
        .nest_api_service("/docs", docs_routes())
        .finish_api_with(&mut api, api_docs)
        .layer(Extension(Arc::new(api)))
        .layer(Extension(Arc::new(config)))
        .layer(CorsLayer::permissive())
        .with_state(dispatcher)
}

/// Starts the HTTP server with the provided configuration.
pub async fn start_server<C: ApiCache>(
    config: AxumConfig,
    dispatcher: Dispatcher<C>,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    event!(
        Level::INFO,
        address = listener.local_addr()?.to_string(),
        "listening for requests"
    );

    let service = router(dispatcher, config);
    axum::serve(listener, service).await
}

/// Everything the router needs from the cache behind the dispatcher, in one
/// place. Any `'static` cache repository qualifies.
pub trait ApiCache: CacheRepository + 'static {}

impl<T: CacheRepository + 'static> ApiCache for T {}
