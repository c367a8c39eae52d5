//! crates/professor_directory_core/src/domain.rs
//!
//! Defines the pure, core data structures for the directory.
//! These structs are independent of any database or serialization format.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Store-assigned identifier of a professor record.
pub type ProfessorId = i64;

/// The placeholder the admin panel writes for a day without office hours.
pub const NOT_AVAILABLE: &str = "Not Available";

//=========================================================================================
// Weekly Schedule
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The seven free-text office-hour slots, stored exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Option<String>; 7],
}

impl WeeklySchedule {
    /// The raw stored value for a day.
    pub fn get(&self, day: Weekday) -> Option<&str> {
        self.days[day.index()].as_deref()
    }

    pub fn set(&mut self, day: Weekday, value: Option<String>) {
        self.days[day.index()] = value;
    }

    pub fn with(mut self, day: Weekday, value: impl Into<String>) -> Self {
        self.set(day, Some(value.into()));
        self
    }

    /// Display-layer view of a day: an absent value, a blank value, and the
    /// literal "Not Available" all mean there are no office hours.
    pub fn office_hours(&self, day: Weekday) -> Option<&str> {
        self.get(day)
            .map(str::trim)
            .filter(|hours| !hours.is_empty() && !hours.eq_ignore_ascii_case(NOT_AVAILABLE))
    }

    /// Every day that has office hours, in calendar order.
    pub fn available_days(&self) -> Vec<(Weekday, &str)> {
        Weekday::ALL
            .iter()
            .filter_map(|&day| self.office_hours(day).map(|hours| (day, hours)))
            .collect()
    }
}

//=========================================================================================
// Professor Records
//=========================================================================================

/// A professor as held by the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Professor {
    pub id: ProfessorId,
    pub full_name: String,
    pub department: String,
    pub email: String,
    pub office_location: Option<String>,
    pub profile_image_url: Option<String>,
    pub schedule: WeeklySchedule,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated input for a new record, as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfessorDraft {
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub office_location: Option<String>,
    pub profile_image_url: Option<String>,
    pub schedule: WeeklySchedule,
    pub notes: Option<String>,
}

/// A validated record ready for insertion. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfessor {
    pub full_name: String,
    pub department: String,
    pub email: String,
    pub office_location: Option<String>,
    pub profile_image_url: Option<String>,
    pub schedule: WeeklySchedule,
    pub notes: Option<String>,
}

/// A column that may be named in a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfessorField {
    FullName,
    Department,
    Email,
    OfficeLocation,
    ProfileImageUrl,
    Schedule(Weekday),
    Notes,
}

impl ProfessorField {
    pub fn column(self) -> &'static str {
        match self {
            ProfessorField::FullName => "full_name",
            ProfessorField::Department => "department",
            ProfessorField::Email => "email",
            ProfessorField::OfficeLocation => "office_location",
            ProfessorField::ProfileImageUrl => "profile_image_url",
            ProfessorField::Schedule(Weekday::Monday) => "schedule_monday",
            ProfessorField::Schedule(Weekday::Tuesday) => "schedule_tuesday",
            ProfessorField::Schedule(Weekday::Wednesday) => "schedule_wednesday",
            ProfessorField::Schedule(Weekday::Thursday) => "schedule_thursday",
            ProfessorField::Schedule(Weekday::Friday) => "schedule_friday",
            ProfessorField::Schedule(Weekday::Saturday) => "schedule_saturday",
            ProfessorField::Schedule(Weekday::Sunday) => "schedule_sunday",
            ProfessorField::Notes => "notes",
        }
    }
}

/// A partial update. `None` leaves a field untouched; for nullable fields
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfessorChanges {
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub office_location: Option<Option<String>>,
    pub profile_image_url: Option<Option<String>>,
    pub schedule: [Option<Option<String>>; 7],
    pub notes: Option<Option<String>>,
}

impl ProfessorChanges {
    pub fn set_schedule(&mut self, day: Weekday, value: Option<String>) {
        self.schedule[day.index()] = Some(value);
    }

    /// The supplied fields paired with their new values, in column order.
    pub fn assignments(&self) -> Vec<(ProfessorField, Option<&str>)> {
        let mut fields = Vec::new();
        if let Some(v) = &self.full_name {
            fields.push((ProfessorField::FullName, Some(v.as_str())));
        }
        if let Some(v) = &self.department {
            fields.push((ProfessorField::Department, Some(v.as_str())));
        }
        if let Some(v) = &self.email {
            fields.push((ProfessorField::Email, Some(v.as_str())));
        }
        if let Some(v) = &self.office_location {
            fields.push((ProfessorField::OfficeLocation, v.as_deref()));
        }
        if let Some(v) = &self.profile_image_url {
            fields.push((ProfessorField::ProfileImageUrl, v.as_deref()));
        }
        for day in Weekday::ALL {
            if let Some(v) = &self.schedule[day.index()] {
                fields.push((ProfessorField::Schedule(day), v.as_deref()));
            }
        }
        if let Some(v) = &self.notes {
            fields.push((ProfessorField::Notes, v.as_deref()));
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }
}

impl Professor {
    /// Applies the supplied fields in place. Timestamps are the store's concern.
    pub fn apply(&mut self, changes: &ProfessorChanges) {
        for (field, value) in changes.assignments() {
            let value = value.map(str::to_string);
            match field {
                ProfessorField::FullName => self.full_name = value.unwrap_or_default(),
                ProfessorField::Department => self.department = value.unwrap_or_default(),
                ProfessorField::Email => self.email = value.unwrap_or_default(),
                ProfessorField::OfficeLocation => self.office_location = value,
                ProfessorField::ProfileImageUrl => self.profile_image_url = value,
                ProfessorField::Schedule(day) => self.schedule.set(day, value),
                ProfessorField::Notes => self.notes = value,
            }
        }
    }
}

//=========================================================================================
// Image Uploads
//=========================================================================================

/// An image received from the admin panel, on its way to the external host.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_available_and_absent_days_are_equivalent_for_display() {
        let schedule = WeeklySchedule::default()
            .with(Weekday::Monday, "10:00 - 12:00")
            .with(Weekday::Tuesday, NOT_AVAILABLE)
            .with(Weekday::Wednesday, "   ");

        assert_eq!(schedule.office_hours(Weekday::Monday), Some("10:00 - 12:00"));
        assert_eq!(schedule.office_hours(Weekday::Tuesday), None);
        assert_eq!(schedule.office_hours(Weekday::Wednesday), None);
        assert_eq!(schedule.office_hours(Weekday::Thursday), None);
        assert_eq!(
            schedule.available_days(),
            vec![(Weekday::Monday, "10:00 - 12:00")]
        );
        // Storage keeps the literal.
        assert_eq!(schedule.get(Weekday::Tuesday), Some(NOT_AVAILABLE));
    }

    #[test]
    fn assignments_list_only_supplied_fields() {
        let mut changes = ProfessorChanges {
            department: Some("Physics".into()),
            notes: Some(None),
            ..Default::default()
        };
        changes.set_schedule(Weekday::Friday, Some("9-11".into()));

        assert_eq!(
            changes.assignments(),
            vec![
                (ProfessorField::Department, Some("Physics")),
                (ProfessorField::Schedule(Weekday::Friday), Some("9-11")),
                (ProfessorField::Notes, None),
            ]
        );
        assert!(!changes.is_empty());
        assert!(ProfessorChanges::default().is_empty());
    }
}
