//! Input validation for workshop catalogs.
//!
//! Checks structural integrity of the workshops before a schedule is
//! built. Detects:
//! - Duplicate IDs
//! - Timeslots missing from the configured catalog
//! - Blank names or spaces
//! - Two workshops booked into the same space in the same timeslot
//! - Capacities of zero (a workshop nobody can join)
//!
//! Unlike [`Schedule::with_catalog`](crate::models::Schedule::with_catalog),
//! which stops at the first hard error, this reports every problem at once.
//! [`Session::new`](crate::session::Session::new) runs it on the raw
//! workshop list before building the schedule.

use crate::models::{PersonKind, TimeslotCatalog, Workshop};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two workshops share the same ID.
    DuplicateId,
    /// A workshop uses a timeslot that is not configured.
    UnknownTimeslot,
    /// A workshop has an empty name or space.
    BlankField,
    /// Two workshops occupy the same space in the same timeslot.
    SpaceDoubleBooked,
    /// A capacity of zero.
    ZeroCapacity,
}

impl ValidationErrorKind {
    /// Whether a schedule cannot be built with this problem present.
    ///
    /// Duplicate ids and unknown timeslots are fatal; the rest are warnings.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DuplicateId | Self::UnknownTimeslot)
    }
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a workshop catalog against the configured timeslots.
///
/// Checks:
/// 1. No duplicate workshop IDs
/// 2. Every timeslot is configured
/// 3. Name and space are not blank
/// 4. No space hosts two workshops in one timeslot
/// 5. No capacity is zero
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_workshops(workshops: &[Workshop], catalog: &TimeslotCatalog) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    let mut spaces: HashMap<(&str, &str), &str> = HashMap::new();

    for w in workshops {
        if !ids.insert(w.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate workshop ID: {}", w.id),
            ));
        }

        if !catalog.contains(&w.timeslot) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownTimeslot,
                format!("Workshop '{}' uses unknown timeslot '{}'", w.id, w.timeslot),
            ));
        }

        if w.name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::BlankField,
                format!("Workshop '{}' has no name", w.id),
            ));
        }
        if w.space.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::BlankField,
                format!("Workshop '{}' has no space", w.id),
            ));
        } else if let Some(other) = spaces.insert((w.timeslot.label(), w.space.as_str()), &w.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::SpaceDoubleBooked,
                format!(
                    "Space '{}' hosts both '{}' and '{}' in timeslot {}",
                    w.space, other, w.id, w.timeslot
                ),
            ));
        }

        for kind in [PersonKind::Student, PersonKind::Adult] {
            if w.capacity_for(kind) == Some(0) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ZeroCapacity,
                    format!("Workshop '{}' accepts no {}", w.id, kind.plural()),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
