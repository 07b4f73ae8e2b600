//! # Slotbook API
//!
//! The API crate provides the web server for the slotbook appointment
//! service. It defines RESTful endpoints for publishing availability
//! windows, listing bookable slots, and booking appointments.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Provide cross-cutting concerns like caller identity and error handling
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.
//! Slot generation happens synchronously inside the create-availability
//! handler; booking integrity is enforced by the database transaction in the
//! db crate.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for caller identity and error handling
pub mod middleware;
/// Best-effort reminder dispatch after a successful booking
pub mod notifications;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use eyre::{Result, WrapErr};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use notifications::{LogReminderSink, ReminderSink};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    /// Sink for fire-and-forget booking reminders
    pub reminders: Arc<dyn ReminderSink>,
}

/// Parses configured CORS origins into header values.
///
/// Fails fast at startup if any configured origin is not a valid header
/// value, rather than panicking on the first request.
pub fn parse_cors_origins(origins: &[String]) -> Result<Vec<HeaderValue>> {
    origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect()
}

/// Starts the API server with the provided configuration and database connection
///
/// Initializes logging, wires up routes and shared state, applies CORS and
/// timeout layers, and serves until shutdown.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let state = Arc::new(ApiState {
        db_pool,
        reminders: Arc::new(LogReminderSink),
    });

    // Build the application router with all routes
    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Availability publishing endpoints
        .merge(routes::availability::routes())
        // Slot listing endpoints
        .merge(routes::slot::routes())
        // Booking and appointment endpoints
        .merge(routes::appointment::routes())
        // Attach shared state to all routes
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(parse_cors_origins(origins)?)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(tower_http::timeout::TimeoutLayer::new(
        std::time::Duration::from_secs(config.request_timeout),
    ));

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
