//! "Schedule New Task" form: two text inputs plus validation.

use chrono::{NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::types::NewTaskRequest;

/// Accepted schedule formats, most specific first. The first one is what a
/// browser datetime-local input produces.
const SCHEDULE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please add a description before scheduling a new task!")]
    MissingDescription,
    #[error("Time format is required!")]
    MissingSchedule,
    #[error("Unrecognised schedule time '{0}', expected YYYY-MM-DDTHH:MM")]
    InvalidSchedule(String),
    #[error("Schedule time '{0}' does not exist in the local time zone")]
    NonexistentLocalTime(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Description,
    Schedule,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskForm {
    pub description: String,
    pub schedule: String,
    pub field: FormField,
}

impl TaskForm {
    pub fn active_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Description => &mut self.description,
            FormField::Schedule => &mut self.schedule,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.active_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.active_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            FormField::Description => FormField::Schedule,
            FormField::Schedule => FormField::Description,
        };
    }

    pub fn clear(&mut self) {
        self.description.clear();
        self.schedule.clear();
        self.field = FormField::Description;
    }

    /// Build the request body, interpreting the schedule in `tz`.
    pub fn validate<Tz: TimeZone>(&self, tz: &Tz) -> Result<NewTaskRequest, FormError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(FormError::MissingDescription);
        }
        let schedule = self.schedule.trim();
        if schedule.is_empty() {
            return Err(FormError::MissingSchedule);
        }
        let naive = SCHEDULE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(schedule, fmt).ok())
            .ok_or_else(|| FormError::InvalidSchedule(schedule.to_string()))?;
        let local = tz
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| FormError::NonexistentLocalTime(schedule.to_string()))?;
        Ok(NewTaskRequest {
            description: description.to_string(),
            run_time: local.with_timezone(&Utc),
        })
    }
}
