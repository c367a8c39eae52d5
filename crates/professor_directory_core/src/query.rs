//! crates/professor_directory_core/src/query.rs
//!
//! Builds the parameterized PostgreSQL statements for the professor table.
//! Every caller-supplied value, pagination included, travels as a bound
//! parameter; only fixed column names are ever written into the SQL text.

use crate::domain::{Professor, ProfessorChanges, ProfessorId};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;
pub const MAX_OFFSET: i64 = 1_000_000;

/// Column list shared by every SELECT so rows always map the same way.
pub const PROFESSOR_COLUMNS: &str = "id, full_name, department, email, office_location, \
     profile_image_url, schedule_monday, schedule_tuesday, schedule_wednesday, \
     schedule_thursday, schedule_friday, schedule_saturday, schedule_sunday, notes, \
     created_at, updated_at";

//=========================================================================================
// Pagination
//=========================================================================================

/// A clamped limit/offset window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).clamp(0, MAX_OFFSET),
        }
    }

    /// Parses raw query-string values. Absent or non-numeric input falls back to the defaults.
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Self {
        let number = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok());
        Self::new(number(limit), number(offset))
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

//=========================================================================================
// Filter
//=========================================================================================

/// Search term, department filter and page window for a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfessorFilter {
    search: Option<String>,
    department: Option<String>,
    page: Page,
}

impl ProfessorFilter {
    /// Blank search terms and departments are treated as absent.
    pub fn new(search: Option<&str>, department: Option<&str>, page: Page) -> Self {
        let present = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            search: present(search),
            department: present(department),
            page,
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// The predicate the SQL expresses, for stores that filter in memory.
    pub fn matches(&self, professor: &Professor) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |term| {
            let term = term.to_lowercase();
            [&professor.full_name, &professor.email, &professor.department]
                .iter()
                .any(|v| v.to_lowercase().contains(&term))
        });
        let department_ok = self
            .department
            .as_deref()
            .map_or(true, |d| professor.department == d);
        search_ok && department_ok
    }
}

//=========================================================================================
// Statements
//=========================================================================================

/// A value bound to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    NullableText(Option<String>),
    Int(i64),
}

/// SQL text plus its parameters in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl BuiltQuery {
    fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Records a parameter and returns its placeholder.
    fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }
}

/// Escapes `ILIKE` wildcards so the term matches as a literal substring.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// The listing query. Ties on full_name have no defined order.
pub fn select_professors(filter: &ProfessorFilter) -> BuiltQuery {
    let mut query = BuiltQuery::new(format!(
        "SELECT {PROFESSOR_COLUMNS} FROM professors WHERE 1=1"
    ));

    if let Some(term) = filter.search() {
        let p = query.bind(SqlParam::Text(like_pattern(term)));
        query.sql.push_str(&format!(
            " AND (full_name ILIKE {p} OR email ILIKE {p} OR department ILIKE {p})"
        ));
    }

    if let Some(department) = filter.department() {
        let p = query.bind(SqlParam::Text(department.to_string()));
        query.sql.push_str(&format!(" AND department = {p}"));
    }

    let limit = query.bind(SqlParam::Int(filter.page().limit()));
    let offset = query.bind(SqlParam::Int(filter.page().offset()));
    query
        .sql
        .push_str(&format!(" ORDER BY full_name ASC LIMIT {limit} OFFSET {offset}"));
    query
}

/// The partial update. `None` when no field was supplied.
pub fn update_professor(id: ProfessorId, changes: &ProfessorChanges) -> Option<BuiltQuery> {
    let assignments = changes.assignments();
    if assignments.is_empty() {
        return None;
    }

    let mut query = BuiltQuery::new("UPDATE professors SET ");
    for (field, value) in assignments {
        let p = query.bind(SqlParam::NullableText(value.map(str::to_string)));
        query.sql.push_str(&format!("{} = {p}, ", field.column()));
    }
    let p = query.bind(SqlParam::Int(id));
    query
        .sql
        .push_str(&format!("updated_at = now() WHERE id = {p}"));
    Some(query)
}
