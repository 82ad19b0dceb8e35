//! Workshop model.
//!
//! A workshop is an activity held in one space during one timeslot, with
//! separate occupancy limits for students and adults.

use serde::{Deserialize, Serialize};

use super::{PersonKind, Timeslot};

/// Adult capacity used when none is given.
pub const DEFAULT_ADULT_CAPACITY: u32 = 1;

/// An activity bound to one space and one timeslot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workshop {
    /// Unique workshop identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Physical location.
    pub space: String,
    /// Timeslot the workshop runs in.
    pub timeslot: Timeslot,
    /// Maximum number of students. `None` = unbounded.
    pub capacity_students: Option<u32>,
    /// Maximum number of adults (default: 1).
    pub capacity_adults: u32,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl Workshop {
    /// Creates a workshop with unbounded students and a single adult.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        space: impl Into<String>,
        timeslot: impl Into<Timeslot>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            space: space.into(),
            timeslot: timeslot.into(),
            capacity_students: None,
            capacity_adults: DEFAULT_ADULT_CAPACITY,
            notes: None,
        }
    }

    /// Sets the student capacity.
    pub fn with_student_capacity(mut self, capacity: u32) -> Self {
        self.capacity_students = Some(capacity);
        self
    }

    /// Sets the adult capacity.
    pub fn with_adult_capacity(mut self, capacity: u32) -> Self {
        self.capacity_adults = capacity;
        self
    }

    /// Sets the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Occupancy limit for a kind of person. `None` = unbounded.
    pub fn capacity_for(&self, kind: PersonKind) -> Option<u32> {
        match kind {
            PersonKind::Student => self.capacity_students,
            PersonKind::Adult => Some(self.capacity_adults),
        }
    }

    /// Notes, or the empty string.
    pub fn notes_or_empty(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workshop_builder() {
        let w = Workshop::new("W1", "Clay", "Room 1", "8:45-9:30")
            .with_student_capacity(12)
            .with_adult_capacity(2)
            .with_notes("Bring aprons");

        assert_eq!(w.id, "W1");
        assert_eq!(w.timeslot.label(), "8:45-9:30");
        assert_eq!(w.capacity_for(PersonKind::Student), Some(12));
        assert_eq!(w.capacity_for(PersonKind::Adult), Some(2));
        assert_eq!(w.notes_or_empty(), "Bring aprons");
    }

    #[test]
    fn test_workshop_defaults() {
        let w = Workshop::new("W1", "Clay", "Room 1", "8:45-9:30");
        assert_eq!(w.capacity_for(PersonKind::Student), None);
        assert_eq!(w.capacity_for(PersonKind::Adult), Some(DEFAULT_ADULT_CAPACITY));
        assert_eq!(w.notes_or_empty(), "");
    }

    #[test]
    fn test_workshop_serde_roundtrip() {
        let w = Workshop::new("W1", "Clay", "Room 1", "8:45-9:30").with_student_capacity(3);
        let json = serde_json::to_string(&w).unwrap();
        assert!(json.contains("\"timeslot\":\"8:45-9:30\""));
        let back: Workshop = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w);
    }
}
