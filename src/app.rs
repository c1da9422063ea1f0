use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let require_bearer = middleware::from_fn_with_state(state.clone(), auth::require_bearer);

    Router::new()
        .route("/", get(handlers::health::health))
        .route("/jwt", post(handlers::auth::sign_in))
        .route("/services", get(handlers::services::list_services))
        .route("/services/:id", get(handlers::services::get_service))
        .route(
            "/bookings",
            get(handlers::bookings::list_bookings)
                .route_layer(require_bearer.clone())
                .post(handlers::bookings::create_booking),
        )
        .route(
            "/bookings/:id",
            get(handlers::bookings::get_booking)
                .route_layer(require_bearer)
                .patch(handlers::bookings::update_booking)
                .delete(handlers::bookings::delete_booking),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
