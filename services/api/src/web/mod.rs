pub mod auth;
pub mod images;
pub mod middleware;
pub mod response;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

pub use middleware::require_admin;
pub use rest::ApiDoc;
pub use state::AppState;

/// Upper bound on request bodies, sized for profile photos.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Builds the API router: public reads, admin-guarded writes, auth and image upload.
pub fn router(app_state: Arc<AppState>) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);
    match app_state.config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(_) => warn!(
            "CORS_ORIGIN '{}' is not a valid header value; cross-origin requests will be refused",
            app_state.config.cors_origin
        ),
    }

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(rest::health_handler))
        .route("/professors", get(rest::list_professors_handler))
        .route("/professors/departments", get(rest::list_departments_handler))
        .route(
            "/professors/department/{department}",
            get(rest::list_by_department_handler),
        )
        .route("/professors/{id}", get(rest::get_professor_handler))
        .route("/admin/login", post(auth::login_handler))
        .route("/admin/verify-token", post(auth::verify_token_handler))
        .route("/images/upload", post(images::upload_image_handler));

    // Protected routes (admin token required)
    let protected_routes = Router::new()
        .route("/professors", post(rest::create_professor_handler))
        .route(
            "/professors/{id}",
            axum::routing::put(rest::update_professor_handler)
                .delete(rest::delete_professor_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_admin,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(app_state)
}
