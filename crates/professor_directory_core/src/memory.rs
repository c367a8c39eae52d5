//! crates/professor_directory_core/src/memory.rs
//!
//! A process-local `ProfessorRepository`, used by tests and local demos.
//! It honours the same contract as the PostgreSQL adapter: case-insensitively
//! unique emails, store-assigned ids and timestamps, and full_name ordering.
//! Names sort case-insensitively to approximate the database collation;
//! equal names keep insertion order here, which callers must not rely on.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{NewProfessor, Professor, ProfessorChanges, ProfessorId};
use crate::ports::{PortError, PortResult, ProfessorRepository};
use crate::query::ProfessorFilter;

#[derive(Default)]
struct MemoryState {
    last_id: ProfessorId,
    rows: Vec<Professor>,
}

#[derive(Default)]
pub struct InMemoryProfessorStore {
    state: Mutex<MemoryState>,
}

impl InMemoryProfessorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.state().map(|s| s.rows.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn state(&self) -> PortResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| PortError::Unexpected("in-memory store lock poisoned".to_string()))
    }
}

fn sorted_by_name(mut rows: Vec<Professor>) -> Vec<Professor> {
    rows.sort_by_cached_key(|p| p.full_name.to_lowercase());
    rows
}

fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl ProfessorRepository for InMemoryProfessorStore {
    async fn insert(&self, professor: &NewProfessor) -> PortResult<ProfessorId> {
        let mut state = self.state()?;
        if state.rows.iter().any(|p| same_email(&p.email, &professor.email)) {
            return Err(PortError::DuplicateKey(professor.email.clone()));
        }

        state.last_id += 1;
        let now = Utc::now();
        let row = Professor {
            id: state.last_id,
            full_name: professor.full_name.clone(),
            department: professor.department.clone(),
            email: professor.email.clone(),
            office_location: professor.office_location.clone(),
            profile_image_url: professor.profile_image_url.clone(),
            schedule: professor.schedule.clone(),
            notes: professor.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        state.rows.push(row);
        Ok(state.last_id)
    }

    async fn fetch_by_id(&self, id: ProfessorId) -> PortResult<Option<Professor>> {
        Ok(self.state()?.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn fetch_all(&self, filter: &ProfessorFilter) -> PortResult<Vec<Professor>> {
        let matching = self
            .state()?
            .rows
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        let page = filter.page();
        Ok(sorted_by_name(matching)
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn fetch_by_department(&self, department: &str) -> PortResult<Vec<Professor>> {
        let matching = self
            .state()?
            .rows
            .iter()
            .filter(|p| p.department == department)
            .cloned()
            .collect();
        Ok(sorted_by_name(matching))
    }

    async fn update(&self, id: ProfessorId, changes: &ProfessorChanges) -> PortResult<bool> {
        if changes.is_empty() {
            return Err(PortError::NoFieldsProvided);
        }

        let mut state = self.state()?;
        if let Some(email) = &changes.email {
            if state.rows.iter().any(|p| p.id != id && same_email(&p.email, email)) {
                return Err(PortError::DuplicateKey(email.clone()));
            }
        }

        let Some(row) = state.rows.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };
        row.apply(changes);
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete(&self, id: ProfessorId) -> PortResult<bool> {
        let mut state = self.state()?;
        let before = state.rows.len();
        state.rows.retain(|p| p.id != id);
        Ok(state.rows.len() < before)
    }

    async fn distinct_departments(&self) -> PortResult<Vec<String>> {
        let mut departments: Vec<String> = self
            .state()?
            .rows
            .iter()
            .map(|p| p.department.clone())
            .collect();
        departments.sort();
        departments.dedup();
        Ok(departments)
    }

    async fn ping(&self) -> PortResult<()> {
        self.state().map(|_| ())
    }
}
