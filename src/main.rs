mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;
mod error;

use std::net::SocketAddr;
use axum::{Router, routing::get, response::Html};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::config::Configuration;
use crate::routes::soiling_routes::api_routes;
use crate::shared_state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 1. Load configuration. A missing or unreadable file is not fatal: the
    //    API then answers 503 until a simulation update supplies one.
    let config_path =
        std::env::var("SOILWATCH_CONFIG").unwrap_or_else(|_| "config.json".to_string());
    let config = match Configuration::load(&config_path) {
        Ok(c) => {
            info!(
                "Configuration loaded: {} strings over {} days, cleaning every {} days",
                c.simulation.total_strings,
                c.simulation.total_days,
                c.cleaning.interval_days
            );
            Some(c)
        }
        Err(e) => {
            warn!("Failed to load {}: {}", config_path, e);
            None
        }
    };

    let server_port = config
        .as_ref()
        .map(|c| c.server.port)
        .unwrap_or_else(|| Configuration::default().server.port);

    // 2. Initialize shared state and warm the model cache once
    let state = AppState::new(config);
    match state.model() {
        Ok(data) => info!(
            "Soiling model ready: {} days, {} strings",
            data.daily_data.len(),
            data.strings.len()
        ),
        Err(e) => warn!("Model not generated yet: {}", e),
    }

    // 3. Start Axum HTTP server: API, OpenAPI docs, static dashboard assets
    let app = Router::new()
        .nest("/api", api_routes(state))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    info!("API Server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    if let Err(e) = axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
    {
        error!("Server error: {}", e);
    }
}
