//! Assignment model.
//!
//! An assignment records who currently occupies one workshop. There is
//! exactly one per workshop for the lifetime of a schedule; only its
//! membership sets change.

use serde::Serialize;
use std::collections::BTreeSet;

use super::{PersonKind, Workshop};

/// Occupants of one workshop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    workshop: Workshop,
    students: BTreeSet<String>,
    adults: BTreeSet<String>,
}

impl Assignment {
    /// Creates an empty assignment bound to `workshop`.
    pub(crate) fn new(workshop: Workshop) -> Self {
        Self {
            workshop,
            students: BTreeSet::new(),
            adults: BTreeSet::new(),
        }
    }

    /// The workshop this assignment is bound to.
    pub fn workshop(&self) -> &Workshop {
        &self.workshop
    }

    /// Assigned student identifiers, sorted.
    pub fn students(&self) -> &BTreeSet<String> {
        &self.students
    }

    /// Assigned adult identifiers, sorted.
    pub fn adults(&self) -> &BTreeSet<String> {
        &self.adults
    }

    /// Membership set for a kind of person.
    pub fn members(&self, kind: PersonKind) -> &BTreeSet<String> {
        match kind {
            PersonKind::Student => &self.students,
            PersonKind::Adult => &self.adults,
        }
    }

    /// Whether the person is in this workshop.
    pub fn contains(&self, kind: PersonKind, person_id: &str) -> bool {
        self.members(kind).contains(person_id)
    }

    /// Places still available for a kind of person. `None` = unbounded.
    pub fn remaining(&self, kind: PersonKind) -> Option<u32> {
        let taken = u32::try_from(self.members(kind).len()).unwrap_or(u32::MAX);
        self.workshop
            .capacity_for(kind)
            .map(|limit| limit.saturating_sub(taken))
    }

    /// Whether one more person of this kind would exceed the capacity.
    pub fn is_full(&self, kind: PersonKind) -> bool {
        self.remaining(kind) == Some(0)
    }

    pub(crate) fn insert(&mut self, kind: PersonKind, person_id: &str) -> bool {
        self.members_mut(kind).insert(person_id.to_string())
    }

    pub(crate) fn remove(&mut self, kind: PersonKind, person_id: &str) -> bool {
        self.members_mut(kind).remove(person_id)
    }

    fn members_mut(&mut self, kind: PersonKind) -> &mut BTreeSet<String> {
        match kind {
            PersonKind::Student => &mut self.students,
            PersonKind::Adult => &mut self.adults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_capacity_tracking() {
        let w = Workshop::new("W1", "Clay", "Room 1", "8:45-9:30").with_student_capacity(2);
        let mut a = Assignment::new(w);

        assert_eq!(a.remaining(PersonKind::Student), Some(2));
        assert_eq!(a.remaining(PersonKind::Adult), Some(1));
        assert!(a.insert(PersonKind::Student, "S1"));
        assert!(!a.insert(PersonKind::Student, "S1"));
        assert!(a.insert(PersonKind::Student, "S2"));
        assert!(a.is_full(PersonKind::Student));
        assert!(!a.is_full(PersonKind::Adult));
    }

    #[test]
    fn test_assignment_unbounded_students() {
        let a = Assignment::new(Workshop::new("W1", "Clay", "Room 1", "8:45-9:30"));
        assert_eq!(a.remaining(PersonKind::Student), None);
        assert!(!a.is_full(PersonKind::Student));
    }

    #[test]
    fn test_assignment_remove() {
        let mut a = Assignment::new(Workshop::new("W1", "Clay", "Room 1", "8:45-9:30"));
        a.insert(PersonKind::Adult, "A1");
        assert!(a.contains(PersonKind::Adult, "A1"));
        assert!(!a.contains(PersonKind::Student, "A1"));
        assert!(a.remove(PersonKind::Adult, "A1"));
        assert!(!a.remove(PersonKind::Adult, "A1"));
        assert!(a.adults().is_empty());
    }
}
