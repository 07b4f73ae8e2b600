use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/slots/:id/book",
            post(handlers::appointment::book_slot),
        )
        .route(
            "/api/appointments",
            get(handlers::appointment::list_appointments),
        )
}
