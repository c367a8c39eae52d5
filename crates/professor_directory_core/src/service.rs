//! crates/professor_directory_core/src/service.rs
//!
//! The directory service: business rules on top of a `ProfessorRepository`.
//! Every failure leaves here as a `DirectoryError`; nothing else escapes.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{info, warn};

use crate::domain::{NewProfessor, Professor, ProfessorChanges, ProfessorDraft, ProfessorId};
use crate::ports::{PortError, ProfessorRepository};
use crate::query::ProfessorFilter;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "A professor with this email already exists.";

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    DuplicateKey(String),
    #[error("Upstream failure: {0}")]
    Upstream(String),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl From<PortError> for DirectoryError {
    fn from(e: PortError) -> Self {
        match e {
            PortError::NotFound(_) => DirectoryError::NotFound(not_found_message()),
            PortError::DuplicateKey(_) => {
                DirectoryError::DuplicateKey(DUPLICATE_EMAIL_MESSAGE.to_string())
            }
            PortError::NoFieldsProvided => {
                DirectoryError::Validation("No fields to update".to_string())
            }
            PortError::Unexpected(msg) => DirectoryError::Upstream(msg),
        }
    }
}

/// A page of professors and its size.
#[derive(Debug, Clone)]
pub struct Listing {
    pub professors: Vec<Professor>,
    pub count: usize,
}

impl From<Vec<Professor>> for Listing {
    fn from(professors: Vec<Professor>) -> Self {
        let count = professors.len();
        Self { professors, count }
    }
}

#[derive(Clone)]
pub struct DirectoryService {
    store: Arc<dyn ProfessorRepository>,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn ProfessorRepository>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &ProfessorFilter) -> DirectoryResult<Listing> {
        Ok(self.store.fetch_all(filter).await?.into())
    }

    pub async fn list_by_department(&self, department: &str) -> DirectoryResult<Listing> {
        let department = department.trim();
        if department.is_empty() {
            return Err(DirectoryError::InvalidArgument(
                "Department is required".to_string(),
            ));
        }
        Ok(self.store.fetch_by_department(department).await?.into())
    }

    pub async fn get_by_id(&self, raw_id: &str) -> DirectoryResult<Professor> {
        let id = parse_id(raw_id)?;
        self.existing(id).await
    }

    pub async fn create(&self, draft: ProfessorDraft) -> DirectoryResult<ProfessorId> {
        let professor = validate_draft(draft)?;
        let id = self.store.insert(&professor).await?;
        info!(professor_id = id, "professor created");
        Ok(id)
    }

    /// Applies a partial update; the result says whether the row changed.
    pub async fn update(&self, raw_id: &str, changes: ProfessorChanges) -> DirectoryResult<bool> {
        let id = parse_id(raw_id)?;
        self.existing(id).await?;
        let changes = validate_changes(changes)?;

        let updated = self.store.update(id, &changes).await?;
        if updated {
            info!(professor_id = id, "professor updated");
        } else {
            warn!(professor_id = id, "professor vanished before update");
        }
        Ok(updated)
    }

    pub async fn delete(&self, raw_id: &str) -> DirectoryResult<()> {
        let id = parse_id(raw_id)?;
        self.existing(id).await?;

        if !self.store.delete(id).await? {
            return Err(DirectoryError::NotFound(not_found_message()));
        }
        info!(professor_id = id, "professor deleted");
        Ok(())
    }

    pub async fn departments(&self) -> DirectoryResult<Vec<String>> {
        Ok(self.store.distinct_departments().await?)
    }

    /// Whether the backing store answers at all.
    pub async fn store_reachable(&self) -> bool {
        self.store.ping().await.is_ok()
    }

    async fn existing(&self, id: ProfessorId) -> DirectoryResult<Professor> {
        self.store
            .fetch_by_id(id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(not_found_message()))
    }
}

//=========================================================================================
// Validation
//=========================================================================================

fn not_found_message() -> String {
    "Professor not found".to_string()
}

fn parse_id(raw: &str) -> DirectoryResult<ProfessorId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DirectoryError::InvalidArgument(
            "Professor ID is required".to_string(),
        ));
    }
    raw.parse::<ProfessorId>()
        .map_err(|_| DirectoryError::InvalidArgument(format!("Invalid professor ID: {raw}")))
}

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"))
        .is_match(email)
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_draft(draft: ProfessorDraft) -> DirectoryResult<NewProfessor> {
    let full_name = required(draft.full_name);
    let department = required(draft.department);
    let email = required(draft.email);

    let missing: Vec<&str> = [
        ("full_name", full_name.is_none()),
        ("department", department.is_none()),
        ("email", email.is_none()),
    ]
    .iter()
    .filter(|(_, absent)| *absent)
    .map(|(name, _)| *name)
    .collect();

    let (Some(full_name), Some(department), Some(email)) = (full_name, department, email) else {
        return Err(DirectoryError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    };

    if !is_valid_email(&email) {
        return Err(DirectoryError::Validation("Invalid email format".to_string()));
    }

    Ok(NewProfessor {
        full_name,
        department,
        email,
        office_location: draft.office_location,
        profile_image_url: draft.profile_image_url,
        schedule: draft.schedule,
        notes: draft.notes,
    })
}

fn validate_changes(mut changes: ProfessorChanges) -> DirectoryResult<ProfessorChanges> {
    for (name, value) in [
        ("full_name", &mut changes.full_name),
        ("department", &mut changes.department),
        ("email", &mut changes.email),
    ] {
        if let Some(v) = value.as_mut() {
            *v = v.trim().to_string();
            if v.is_empty() {
                return Err(DirectoryError::Validation(format!("{name} cannot be empty")));
            }
        }
    }

    if let Some(email) = &changes.email {
        if !is_valid_email(email) {
            return Err(DirectoryError::Validation("Invalid email format".to_string()));
        }
    }
    Ok(changes)
}
