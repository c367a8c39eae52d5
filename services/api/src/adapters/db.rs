//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ProfessorRepository` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use professor_directory_core::domain::{
    NewProfessor, Professor, ProfessorChanges, ProfessorId, Weekday, WeeklySchedule,
};
use professor_directory_core::ports::{PortError, PortResult, ProfessorRepository};
use professor_directory_core::query::{
    self, BuiltQuery, ProfessorFilter, SqlParam, PROFESSOR_COLUMNS,
};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::{Query, QueryAs};
use sqlx::{FromRow, PgPool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ProfessorRepository` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ProfessorRecord {
    id: i64,
    full_name: String,
    department: String,
    email: String,
    office_location: Option<String>,
    profile_image_url: Option<String>,
    schedule_monday: Option<String>,
    schedule_tuesday: Option<String>,
    schedule_wednesday: Option<String>,
    schedule_thursday: Option<String>,
    schedule_friday: Option<String>,
    schedule_saturday: Option<String>,
    schedule_sunday: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl ProfessorRecord {
    fn to_domain(self) -> Professor {
        let mut schedule = WeeklySchedule::default();
        for (day, value) in [
            (Weekday::Monday, self.schedule_monday),
            (Weekday::Tuesday, self.schedule_tuesday),
            (Weekday::Wednesday, self.schedule_wednesday),
            (Weekday::Thursday, self.schedule_thursday),
            (Weekday::Friday, self.schedule_friday),
            (Weekday::Saturday, self.schedule_saturday),
            (Weekday::Sunday, self.schedule_sunday),
        ] {
            schedule.set(day, value);
        }

        Professor {
            id: self.id,
            full_name: self.full_name,
            department: self.department,
            email: self.email,
            office_location: self.office_location,
            profile_image_url: self.profile_image_url,
            schedule,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

//=========================================================================================
// Parameter Binding and Error Mapping
//=========================================================================================

fn bind_as<'q>(
    built: &'q BuiltQuery,
) -> QueryAs<'q, Postgres, ProfessorRecord, PgArguments> {
    built
        .params
        .iter()
        .fold(sqlx::query_as::<_, ProfessorRecord>(&built.sql), |q, param| match param {
            SqlParam::Text(v) => q.bind(v.clone()),
            SqlParam::NullableText(v) => q.bind(v.clone()),
            SqlParam::Int(v) => q.bind(*v),
        })
}

fn bind<'q>(built: &'q BuiltQuery) -> Query<'q, Postgres, PgArguments> {
    built
        .params
        .iter()
        .fold(sqlx::query(&built.sql), |q, param| match param {
            SqlParam::Text(v) => q.bind(v.clone()),
            SqlParam::NullableText(v) => q.bind(v.clone()),
            SqlParam::Int(v) => q.bind(*v),
        })
}

/// Unique-constraint violations become `DuplicateKey`; everything else is unexpected.
fn map_write_error(e: sqlx::Error) -> PortError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            PortError::DuplicateKey(db.constraint().unwrap_or("professors_email_key").to_string())
        }
        _ => PortError::Unexpected(e.to_string()),
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `ProfessorRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProfessorRepository for DbAdapter {
    async fn insert(&self, professor: &NewProfessor) -> PortResult<ProfessorId> {
        let schedule = &professor.schedule;
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO professors (
                full_name, department, email, office_location, profile_image_url,
                schedule_monday, schedule_tuesday, schedule_wednesday, schedule_thursday,
                schedule_friday, schedule_saturday, schedule_sunday, notes
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id",
        )
        .bind(&professor.full_name)
        .bind(&professor.department)
        .bind(&professor.email)
        .bind(&professor.office_location)
        .bind(&professor.profile_image_url)
        .bind(schedule.get(Weekday::Monday))
        .bind(schedule.get(Weekday::Tuesday))
        .bind(schedule.get(Weekday::Wednesday))
        .bind(schedule.get(Weekday::Thursday))
        .bind(schedule.get(Weekday::Friday))
        .bind(schedule.get(Weekday::Saturday))
        .bind(schedule.get(Weekday::Sunday))
        .bind(&professor.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn fetch_by_id(&self, id: ProfessorId) -> PortResult<Option<Professor>> {
        let sql = format!("SELECT {PROFESSOR_COLUMNS} FROM professors WHERE id = $1");
        let record = sqlx::query_as::<_, ProfessorRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(record.map(ProfessorRecord::to_domain))
    }

    async fn fetch_all(&self, filter: &ProfessorFilter) -> PortResult<Vec<Professor>> {
        let built = query::select_professors(filter);
        let records = bind_as(&built)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(ProfessorRecord::to_domain).collect())
    }

    async fn fetch_by_department(&self, department: &str) -> PortResult<Vec<Professor>> {
        let sql = format!(
            "SELECT {PROFESSOR_COLUMNS} FROM professors WHERE department = $1 ORDER BY full_name ASC"
        );
        let records = sqlx::query_as::<_, ProfessorRecord>(&sql)
            .bind(department)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(ProfessorRecord::to_domain).collect())
    }

    async fn update(&self, id: ProfessorId, changes: &ProfessorChanges) -> PortResult<bool> {
        let built = query::update_professor(id, changes).ok_or(PortError::NoFieldsProvided)?;
        let result = bind(&built)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: ProfessorId) -> PortResult<bool> {
        let result = sqlx::query("DELETE FROM professors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(result.rows_affected() > 0)
    }

    async fn distinct_departments(&self) -> PortResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT department FROM professors ORDER BY department",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)
    }

    async fn ping(&self) -> PortResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}
