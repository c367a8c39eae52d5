//! crates/professor_directory_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the directory's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete database and image host.

use async_trait::async_trait;

use crate::domain::{ImageUpload, NewProfessor, Professor, ProfessorChanges, ProfessorId};
use crate::query::ProfessorFilter;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("No fields to update")]
    NoFieldsProvided,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable CRUD over the professor table. Every call goes to the store; nothing is cached.
#[async_trait]
pub trait ProfessorRepository: Send + Sync {
    /// Fails with `DuplicateKey` when the email is already taken.
    async fn insert(&self, professor: &NewProfessor) -> PortResult<ProfessorId>;

    /// A missing row is `Ok(None)`, not an error.
    async fn fetch_by_id(&self, id: ProfessorId) -> PortResult<Option<Professor>>;

    /// Rows ordered by full_name ascending, windowed by the filter's page.
    async fn fetch_all(&self, filter: &ProfessorFilter) -> PortResult<Vec<Professor>>;

    /// Every row of one department, ordered by full_name ascending.
    async fn fetch_by_department(&self, department: &str) -> PortResult<Vec<Professor>>;

    /// Fails with `NoFieldsProvided` on an empty change set. Returns whether a row matched.
    async fn update(&self, id: ProfessorId, changes: &ProfessorChanges) -> PortResult<bool>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: ProfessorId) -> PortResult<bool>;

    /// The sorted set of departments currently present.
    async fn distinct_departments(&self) -> PortResult<Vec<String>>;

    /// Cheap round-trip used by the health probe.
    async fn ping(&self) -> PortResult<()>;
}

#[async_trait]
pub trait ImageHostService: Send + Sync {
    /// Uploads an image and returns its public HTTPS URL.
    async fn upload_image(&self, image: ImageUpload) -> PortResult<String>;
}
