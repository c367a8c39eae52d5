//! services/api/src/web/state.rs
//!
//! Defines the application state shared by every request handler.

use crate::config::Config;
use professor_directory_core::ports::ImageHostService;
use professor_directory_core::{AuthService, DirectoryService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub directory: DirectoryService,
    pub auth: AuthService,
    /// `None` when no image host credentials are configured.
    pub image_host: Option<Arc<dyn ImageHostService>>,
    pub config: Arc<Config>,
}
