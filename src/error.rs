//! Error types.
//!
//! Schedule operations fail with [`ScheduleError`], classified by
//! [`ErrorKind`]. Ingestion ([`LoadError`]) and configuration
//! ([`ConfigError`]) failures are kept separate: they are always fatal to
//! the load that raised them and never partially applied.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{PersonKind, Timeslot};

/// Broad category of a [`ScheduleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced timeslot or workshop does not exist.
    NotFound,
    /// The person already occupies a workshop in the timeslot.
    Conflict,
    /// The workshop is full for that kind of person.
    Capacity,
    /// The workshop catalog itself is malformed.
    InvalidInput,
}

/// Rejection of a schedule query or mutation.
///
/// A failed mutation never changes the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Timeslot not found: {0}")]
    TimeslotNotFound(Timeslot),

    #[error("Workshop '{workshop_id}' not found in timeslot {timeslot}")]
    WorkshopNotFound {
        timeslot: Timeslot,
        workshop_id: String,
    },

    #[error("The {kind} with id '{person_id}' is already assigned in timeslot {timeslot} (workshop '{workshop_id}')")]
    Conflict {
        kind: PersonKind,
        person_id: String,
        timeslot: Timeslot,
        workshop_id: String,
    },

    #[error("Workshop '{workshop}' has reached its limit of {} ({limit})", .kind.plural())]
    Capacity {
        kind: PersonKind,
        workshop: String,
        limit: u32,
    },

    #[error("Duplicate workshop ID: {0}")]
    DuplicateWorkshop(String),

    #[error("Workshop '{workshop_id}' uses unknown timeslot '{timeslot}'")]
    UnknownTimeslot {
        workshop_id: String,
        timeslot: Timeslot,
    },
}

impl ScheduleError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TimeslotNotFound(_) | Self::WorkshopNotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Capacity { .. } => ErrorKind::Capacity,
            Self::DuplicateWorkshop(_) | Self::UnknownTimeslot { .. } => ErrorKind::InvalidInput,
        }
    }
}

/// Failure while reading students, adults or workshops from CSV.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File '{file}' is missing required columns: {}", .columns.join(", "))]
    MissingColumns { file: String, columns: Vec<String> },

    #[error("Workshop '{workshop}' has an invalid timeslot: '{timeslot}'")]
    InvalidTimeslot { workshop: String, timeslot: String },

    #[error("The {column} of workshop '{workshop}' must be a non-negative integer, got '{value}'")]
    InvalidCapacity {
        workshop: String,
        column: &'static str,
        value: String,
    },

    #[error("Cannot open '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while reading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("At least one timeslot must be configured")]
    NoTimeslots,

    #[error("Timeslot labels must not be blank")]
    BlankTimeslot,

    #[error("Timeslot '{0}' is configured more than once")]
    DuplicateTimeslot(String),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for schedule operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;
