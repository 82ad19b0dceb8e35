//! Timetable domain models.
//!
//! Provides the core data types: the people being placed, the workshops
//! they are placed into, the timeslots those workshops run in, and the
//! [`Schedule`] that ties them together.
//!
//! # Ownership
//!
//! | Type | Owned by | Mutable |
//! |------|----------|---------|
//! | Student / Adult | caller (via [`Directory`]) | no |
//! | Workshop | Schedule | no |
//! | Assignment | Schedule | membership sets only |

mod assignment;
mod person;
mod schedule;
mod timeslot;
mod workshop;

pub use assignment::Assignment;
pub use person::{Adult, Directory, Person, PersonKind, Student};
pub use schedule::Schedule;
pub use timeslot::{Timeslot, TimeslotCatalog, DEFAULT_TIMESLOTS};
pub use workshop::{Workshop, DEFAULT_ADULT_CAPACITY};
