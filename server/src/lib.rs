pub mod cors;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::{middleware, Router};

pub use error::{ApiError, ApiResult};
pub use state::{AppState, SharedState};

use routes::{ai, code, elements, quick_fix};

/// Builds the `/api` router over the shared state.
pub fn build_router(state: SharedState) -> Router {
    let api = Router::new()
        .route(
            "/elements/process",
            post(elements::process_element).options(cors::preflight),
        )
        .route(
            "/elements/queue",
            get(elements::list_queue)
                .delete(elements::clear_queue)
                .options(cors::preflight),
        )
        .route(
            "/elements/{id}/status",
            get(elements::element_status)
                .patch(elements::update_element)
                .delete(elements::delete_element)
                .options(cors::preflight),
        )
        .route(
            "/elements/{id}/details",
            get(elements::element_details).options(cors::preflight),
        )
        .route(
            "/generate-code",
            post(code::generate_element_code).options(cors::preflight),
        )
        .route(
            "/ai/generate-code",
            post(ai::generate_code).options(cors::preflight),
        )
        .route(
            "/ai/generate-prompt",
            post(ai::generate_prompt).options(cors::preflight),
        )
        .route(
            "/ai/generate-variations",
            post(ai::generate_variations).options(cors::preflight),
        )
        .route(
            "/ai/analyze-element",
            post(ai::analyze_element).options(cors::preflight),
        )
        .route("/ai/providers", get(ai::providers).options(cors::preflight))
        .route(
            "/quick-fix",
            post(quick_fix::quick_fix).options(cors::preflight),
        );

    Router::new()
        .nest("/api", api)
        .layer(middleware::map_response(cors::add_cors_headers))
        .with_state(state)
}
