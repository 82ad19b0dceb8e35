//! In-memory timetable engine for workshop days.
//!
//! Students and adults are placed into workshops, each held in one space
//! during one timeslot. The engine enforces per-workshop capacities and
//! "one workshop per person per timeslot", and projects the result into
//! row-shaped views for rendering and export.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Timeslot`, `TimeslotCatalog`, `Student`,
//!   `Adult`, `Workshop`, `Assignment`, `Schedule`, `Directory`
//! - **`views`**: Typed projections — timeslot summary, week listing,
//!   space × timeslot grid, personal timetables, availability, CSV export
//! - **`validation`**: Workshop catalog checks (duplicate IDs, unknown
//!   timeslots, double-booked spaces), run when a session is built
//! - **`loader`**: CSV ingestion of students, adults and workshops
//! - **`config`**: TOML configuration (timeslots, week order)
//! - **`session`**: One editing session driven by text commands
//!
//! # Example
//!
//! ```
//! use workshop_schedule::models::{Schedule, Student, Timeslot, Workshop};
//!
//! let mut schedule = Schedule::new(vec![
//!     Workshop::new("W1", "Clay", "Room 1", "8:45-9:30").with_student_capacity(12),
//! ])
//! .unwrap();
//!
//! let slot = Timeslot::new("8:45-9:30");
//! schedule.assign_student(&Student::new("S1", "Anna"), &slot, "W1").unwrap();
//! assert!(schedule.is_student_assigned("S1", &slot));
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod session;
pub mod validation;
pub mod views;

pub use error::{ErrorKind, LoadError, ScheduleError};
