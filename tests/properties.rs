use std::collections::HashMap;

use proptest::prelude::*;
use workshop_schedule::models::{
    Adult, Assignment, PersonKind, Schedule, Student, Timeslot, Workshop,
};

const SLOTS: [&str; 2] = ["8:45-9:30", "9:30-10:15"];

fn workshops() -> Vec<Workshop> {
    vec![
        Workshop::new("W0", "Clay", "Room 1", SLOTS[0]).with_student_capacity(2),
        Workshop::new("W1", "Music", "Hall", SLOTS[0]).with_student_capacity(3),
        Workshop::new("W2", "Chess", "Library", SLOTS[0]),
        Workshop::new("W3", "Dance", "Gym", SLOTS[1])
            .with_student_capacity(1)
            .with_adult_capacity(2),
        Workshop::new("W4", "Drawing", "Room 1", SLOTS[1]).with_student_capacity(4),
    ]
}

#[derive(Debug, Clone)]
struct Op {
    assign: bool,
    kind: PersonKind,
    person: usize,
    workshop: usize,
    // Sometimes aim at the wrong timeslot to exercise NotFound.
    swap_slot: bool,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    (
        any::<bool>(),
        prop_oneof![Just(PersonKind::Student), Just(PersonKind::Adult)],
        0..6usize,
        0..5usize,
        proptest::bool::weighted(0.1),
    )
        .prop_map(|(assign, kind, person, workshop, swap_slot)| Op {
            assign,
            kind,
            person,
            workshop,
            swap_slot,
        })
}

fn apply(schedule: &mut Schedule, op: &Op) -> bool {
    let all = workshops();
    let w = &all[op.workshop];
    let slot = if op.swap_slot {
        if w.timeslot.label() == SLOTS[0] {
            Timeslot::new(SLOTS[1])
        } else {
            Timeslot::new(SLOTS[0])
        }
    } else {
        w.timeslot.clone()
    };
    let id = format!("P{}", op.person);
    match (op.assign, op.kind) {
        (true, PersonKind::Student) => schedule
            .assign_student(&Student::new(id, "s"), &slot, &w.id)
            .is_ok(),
        (true, PersonKind::Adult) => schedule
            .assign_adult(&Adult::new(id, "a"), &slot, &w.id)
            .is_ok(),
        (false, PersonKind::Student) => {
            schedule.unassign_student(&Student::new(id, "s"), &slot, &w.id);
            true
        }
        (false, PersonKind::Adult) => {
            schedule.unassign_adult(&Adult::new(id, "a"), &slot, &w.id);
            true
        }
    }
}

fn snapshot(schedule: &Schedule) -> Vec<Assignment> {
    schedule.assignments().cloned().collect()
}

fn check_invariants(schedule: &Schedule) -> Result<(), TestCaseError> {
    prop_assert_eq!(schedule.assignment_count(), schedule.workshops().len());

    for slot in schedule.timeslots() {
        for kind in [PersonKind::Student, PersonKind::Adult] {
            let mut seen: HashMap<&str, usize> = HashMap::new();
            for a in schedule.assignments_for_timeslot(slot).unwrap().values() {
                prop_assert_eq!(&a.workshop().timeslot, slot);
                for id in a.members(kind) {
                    *seen.entry(id.as_str()).or_default() += 1;
                }
                if let Some(limit) = a.workshop().capacity_for(kind) {
                    prop_assert!(a.members(kind).len() <= limit as usize);
                }
            }
            prop_assert!(seen.values().all(|&n| n == 1));
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_invariants_hold_after_every_operation(
        ops in proptest::collection::vec(op_strategy(), 1..60)
    ) {
        let mut schedule = Schedule::new(workshops()).unwrap();
        for op in &ops {
            let before = snapshot(&schedule);
            let ok = apply(&mut schedule, op);
            if !ok {
                // Rejected mutations never change anything.
                prop_assert_eq!(snapshot(&schedule), before);
            }
            check_invariants(&schedule)?;
        }
    }

    #[test]
    fn test_assign_then_unassign_restores_state(
        setup in proptest::collection::vec(op_strategy(), 0..30),
        person in 10..20usize,
        workshop in 0..5usize,
    ) {
        let mut schedule = Schedule::new(workshops()).unwrap();
        for op in &setup {
            apply(&mut schedule, op);
        }

        let w = &workshops()[workshop];
        let student = Student::new(format!("P{person}"), "fresh");
        let before = snapshot(&schedule);
        if schedule.assign_student(&student, &w.timeslot, &w.id).is_ok() {
            prop_assert!(schedule.is_student_assigned(&student.id, &w.timeslot));
            schedule.unassign_student(&student, &w.timeslot, &w.id);
        }
        prop_assert_eq!(snapshot(&schedule), before);
    }

    #[test]
    fn test_unassign_absent_person_is_noop(
        setup in proptest::collection::vec(op_strategy(), 0..30),
        workshop in 0..5usize,
    ) {
        let mut schedule = Schedule::new(workshops()).unwrap();
        for op in &setup {
            apply(&mut schedule, op);
        }
        let w = &workshops()[workshop];
        let before = snapshot(&schedule);
        schedule.unassign_student(&Student::new("nobody", "n"), &w.timeslot, &w.id);
        schedule.unassign_adult(&Adult::new("nobody", "n"), &w.timeslot, &w.id);
        prop_assert_eq!(snapshot(&schedule), before);
    }
}
