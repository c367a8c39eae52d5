pub mod auth;
pub mod domain;
pub mod memory;
pub mod ports;
pub mod query;
pub mod service;

pub use auth::{AdminClaims, AdminIdentity, AuthError, AuthService, IssuedToken};
pub use domain::{
    ImageUpload, NewProfessor, Professor, ProfessorChanges, ProfessorDraft, ProfessorField,
    ProfessorId, Weekday, WeeklySchedule,
};
pub use memory::InMemoryProfessorStore;
pub use ports::{ImageHostService, PortError, PortResult, ProfessorRepository};
pub use query::{Page, ProfessorFilter};
pub use service::{DirectoryError, DirectoryResult, DirectoryService, Listing};
