//! Schedule (the engine).
//!
//! Owns the workshop catalog and one [`Assignment`] per workshop, grouped
//! by timeslot. All invariants are enforced here:
//!
//! - a person occupies at most one workshop per timeslot (any number
//!   across different timeslots);
//! - a workshop never holds more students or adults than its capacity;
//! - assignments are created once, at construction, and never removed.
//!
//! # Check order
//! `assign` resolves the workshop first (`NotFound`), then checks the
//! timeslot for an existing placement (`Conflict`, even when it is the same
//! workshop), then the capacity (`Capacity`). Only after every check passes
//! is the membership set written, so a rejected call leaves the schedule
//! untouched.
//!
//! # Concurrency
//! The check-then-write sequence is not atomic with respect to other
//! callers. A schedule shared between clients must sit behind a single
//! lock (or a single writer).

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::{Adult, Assignment, Person, PersonKind, Student, Timeslot, TimeslotCatalog, Workshop};
use crate::error::{Result, ScheduleError};

/// Workshop catalog plus the current assignments.
#[derive(Debug, Clone)]
pub struct Schedule {
    workshops: BTreeMap<String, Workshop>,
    assignments: BTreeMap<Timeslot, BTreeMap<String, Assignment>>,
}

impl Schedule {
    /// Builds a schedule with one empty assignment per workshop.
    ///
    /// Only the timeslots used by `workshops` are known afterwards.
    /// Fails on a repeated workshop identifier.
    pub fn new(workshops: impl IntoIterator<Item = Workshop>) -> Result<Self> {
        Self::build(None, workshops)
    }

    /// Builds a schedule that knows every timeslot of `catalog`, even those
    /// without workshops.
    ///
    /// Fails on a repeated workshop identifier or a workshop whose timeslot
    /// is not in the catalog.
    pub fn with_catalog(
        catalog: &TimeslotCatalog,
        workshops: impl IntoIterator<Item = Workshop>,
    ) -> Result<Self> {
        Self::build(Some(catalog), workshops)
    }

    fn build(
        catalog: Option<&TimeslotCatalog>,
        workshops: impl IntoIterator<Item = Workshop>,
    ) -> Result<Self> {
        let mut by_id = BTreeMap::new();
        let mut assignments: BTreeMap<Timeslot, BTreeMap<String, Assignment>> = BTreeMap::new();

        if let Some(catalog) = catalog {
            for slot in catalog.iter() {
                assignments.entry(slot.clone()).or_default();
            }
        }

        for workshop in workshops {
            if by_id.contains_key(&workshop.id) {
                return Err(ScheduleError::DuplicateWorkshop(workshop.id));
            }
            if let Some(catalog) = catalog {
                if !catalog.contains(&workshop.timeslot) {
                    return Err(ScheduleError::UnknownTimeslot {
                        workshop_id: workshop.id,
                        timeslot: workshop.timeslot,
                    });
                }
            }
            assignments
                .entry(workshop.timeslot.clone())
                .or_default()
                .insert(workshop.id.clone(), Assignment::new(workshop.clone()));
            by_id.insert(workshop.id.clone(), workshop);
        }

        info!(
            workshops = by_id.len(),
            timeslots = assignments.len(),
            "schedule created"
        );

        Ok(Self {
            workshops: by_id,
            assignments,
        })
    }

    /// The full workshop catalog, keyed by identifier.
    pub fn workshops(&self) -> &BTreeMap<String, Workshop> {
        &self.workshops
    }

    /// Known timeslots, in label order.
    pub fn timeslots(&self) -> impl Iterator<Item = &Timeslot> {
        self.assignments.keys()
    }

    /// Number of assignments (always equal to the number of workshops).
    pub fn assignment_count(&self) -> usize {
        self.assignments.values().map(BTreeMap::len).sum()
    }

    /// Every assignment, grouped by timeslot label then workshop identifier.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.values().flat_map(BTreeMap::values)
    }

    /// Assignments of one timeslot, keyed by workshop identifier.
    pub fn assignments_for_timeslot(
        &self,
        timeslot: &Timeslot,
    ) -> Result<&BTreeMap<String, Assignment>> {
        self.assignments
            .get(timeslot)
            .ok_or_else(|| ScheduleError::TimeslotNotFound(timeslot.clone()))
    }

    /// The assignment of one workshop in one timeslot.
    pub fn get_assignment(&self, timeslot: &Timeslot, workshop_id: &str) -> Result<&Assignment> {
        self.assignments
            .get(timeslot)
            .and_then(|slot| slot.get(workshop_id))
            .ok_or_else(|| ScheduleError::WorkshopNotFound {
                timeslot: timeslot.clone(),
                workshop_id: workshop_id.to_string(),
            })
    }

    /// The assignment holding the person in `timeslot`, if any.
    pub fn placement(
        &self,
        kind: PersonKind,
        person_id: &str,
        timeslot: &Timeslot,
    ) -> Option<&Assignment> {
        self.assignments
            .get(timeslot)?
            .values()
            .find(|a| a.contains(kind, person_id))
    }

    /// Whether the person occupies any workshop in `timeslot`.
    pub fn is_assigned(&self, kind: PersonKind, person_id: &str, timeslot: &Timeslot) -> bool {
        self.placement(kind, person_id, timeslot).is_some()
    }

    /// Whether the student occupies any workshop in `timeslot`.
    pub fn is_student_assigned(&self, student_id: &str, timeslot: &Timeslot) -> bool {
        self.is_assigned(PersonKind::Student, student_id, timeslot)
    }

    /// Whether the adult occupies any workshop in `timeslot`.
    pub fn is_adult_assigned(&self, adult_id: &str, timeslot: &Timeslot) -> bool {
        self.is_assigned(PersonKind::Adult, adult_id, timeslot)
    }

    /// Places a person into a workshop.
    ///
    /// # Errors
    /// - `WorkshopNotFound` if the workshop is not in `timeslot`.
    /// - `Conflict` if the person already occupies a workshop in `timeslot`
    ///   (including this one).
    /// - `Capacity` if the workshop is full for this kind of person.
    pub fn assign<P: Person>(
        &mut self,
        person: &P,
        timeslot: &Timeslot,
        workshop_id: &str,
    ) -> Result<()> {
        self.assign_id(P::KIND, person.id(), timeslot, workshop_id)
    }

    /// Places a student into a workshop. See [`Schedule::assign`].
    pub fn assign_student(
        &mut self,
        student: &Student,
        timeslot: &Timeslot,
        workshop_id: &str,
    ) -> Result<()> {
        self.assign(student, timeslot, workshop_id)
    }

    /// Places an adult into a workshop. See [`Schedule::assign`].
    pub fn assign_adult(
        &mut self,
        adult: &Adult,
        timeslot: &Timeslot,
        workshop_id: &str,
    ) -> Result<()> {
        self.assign(adult, timeslot, workshop_id)
    }

    /// Removes a person from a workshop.
    ///
    /// Absent people and unknown workshops are ignored. Returns `true` when
    /// the person was a member and has been removed.
    pub fn unassign<P: Person>(
        &mut self,
        person: &P,
        timeslot: &Timeslot,
        workshop_id: &str,
    ) -> bool {
        self.unassign_id(P::KIND, person.id(), timeslot, workshop_id)
    }

    /// Removes a student from a workshop. See [`Schedule::unassign`].
    pub fn unassign_student(
        &mut self,
        student: &Student,
        timeslot: &Timeslot,
        workshop_id: &str,
    ) -> bool {
        self.unassign(student, timeslot, workshop_id)
    }

    /// Removes an adult from a workshop. See [`Schedule::unassign`].
    pub fn unassign_adult(&mut self, adult: &Adult, timeslot: &Timeslot, workshop_id: &str) -> bool {
        self.unassign(adult, timeslot, workshop_id)
    }

    fn assign_id(
        &mut self,
        kind: PersonKind,
        person_id: &str,
        timeslot: &Timeslot,
        workshop_id: &str,
    ) -> Result<()> {
        let target = self.get_assignment(timeslot, workshop_id)?;

        if let Some(existing) = self.placement(kind, person_id, timeslot) {
            return Err(ScheduleError::Conflict {
                kind,
                person_id: person_id.to_string(),
                timeslot: timeslot.clone(),
                workshop_id: existing.workshop().id.clone(),
            });
        }

        if target.is_full(kind) {
            let workshop = target.workshop();
            return Err(ScheduleError::Capacity {
                kind,
                workshop: workshop.name.clone(),
                limit: workshop.capacity_for(kind).unwrap_or_default(),
            });
        }

        if let Some(assignment) = self
            .assignments
            .get_mut(timeslot)
            .and_then(|slot| slot.get_mut(workshop_id))
        {
            assignment.insert(kind, person_id);
            debug!(%kind, person = person_id, %timeslot, workshop = workshop_id, "assigned");
        }
        Ok(())
    }

    fn unassign_id(
        &mut self,
        kind: PersonKind,
        person_id: &str,
        timeslot: &Timeslot,
        workshop_id: &str,
    ) -> bool {
        let removed = self
            .assignments
            .get_mut(timeslot)
            .and_then(|slot| slot.get_mut(workshop_id))
            .is_some_and(|a| a.remove(kind, person_id));
        if removed {
            debug!(%kind, person = person_id, %timeslot, workshop = workshop_id, "unassigned");
        }
        removed
    }
}
