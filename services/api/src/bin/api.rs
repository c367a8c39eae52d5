//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{CloudinaryAdapter, DbAdapter},
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState},
};
use axum::Router;
use professor_directory_core::ports::ImageHostService;
use professor_directory_core::{AuthService, DirectoryService};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    if config.admin_is_default {
        warn!("ADMIN_USERNAME/ADMIN_PASSWORD not set; using the default admin identity");
    }
    if config.jwt_secret_is_fallback {
        warn!("JWT_SECRET not set; tokens are signed with the built-in fallback key");
    }

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Services and Adapters ---
    let directory = DirectoryService::new(db_adapter);
    let auth = AuthService::new(config.admin.clone(), config.jwt_secret.as_bytes());

    let image_host: Option<Arc<dyn ImageHostService>> = match &config.image_host {
        Some(image_config) => {
            let client = reqwest::Client::builder()
                .build()
                .map_err(|e| ApiError::Internal(format!("HTTP client: {}", e)))?;
            Some(Arc::new(CloudinaryAdapter::new(client, image_config.clone())) as Arc<dyn ImageHostService>)
        }
        None => {
            warn!("Image host credentials not set; /images/upload is disabled");
            None
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        directory,
        auth,
        image_host,
        config: config.clone(),
    });

    // --- 5. Create the Web Router ---
    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(web::router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
