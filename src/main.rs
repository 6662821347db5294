mod boundary;
mod config;
mod engine;
mod error;
mod middleware;
mod models;
mod routes;
mod service;

use std::sync::Arc;

use crate::{
    boundary::InMemoryBoundary,
    config::Config,
    engine::slots::SlotGrid,
    engine::status::AppointmentStatus,
    models::AppState,
    service::{AppointmentService, seed_view},
};

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use axum::http::header;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;
    let grid = SlotGrid::new(cfg.clinic_open_hour, cfg.clinic_close_hour, cfg.slot_minutes);

    // Demo backend; a deployment would wire a remote BoundaryApi here.
    let boundary = Arc::new(InMemoryBoundary::new(grid.clone()));
    seed_demo_data(&boundary);

    let state = AppState {
        service: Arc::new(AppointmentService::new(boundary, grid)),
    };

    // Allow browser/WebView front ends to call the API directly.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-actor-role"),
            header::HeaderName::from_static("x-actor-id"),
        ]);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn seed_demo_data(boundary: &InMemoryBoundary) {
    let doctor = Uuid::new_v4();
    let patient = Uuid::new_v4();
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();

    boundary.insert(seed_view(doctor, patient, &today, "09:00", AppointmentStatus::Booked));
    boundary.insert(seed_view(doctor, patient, &today, "10:30", AppointmentStatus::Scheduled));
    boundary.insert(seed_view(doctor, patient, &today, "14:00", AppointmentStatus::Confirmed));
}
