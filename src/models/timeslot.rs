//! Timeslot model.
//!
//! A timeslot is one of a small, externally configured set of time ranges
//! within a single day (e.g. `"8:45-9:30"`). Every workshop happens in
//! exactly one timeslot.
//!
//! # Ordering
//! `Timeslot` itself orders by its label (plain string comparison), so
//! `"10:15-11:00"` sorts before `"8:45-9:30"`. The chronological order is
//! the order of the [`TimeslotCatalog`] the labels were configured in.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// Default timeslots of a school day.
pub const DEFAULT_TIMESLOTS: [&str; 5] = [
    "8:45-9:30",
    "9:30-10:15",
    "10:15-11:00",
    "11:30-12:15",
    "12:15-13:00",
];

/// A named time range, identified by its label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Timeslot(String);

impl Timeslot {
    /// Creates a timeslot from its label (trimmed).
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self(label.trim().to_string())
    }

    /// The timeslot label.
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timeslot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timeslot {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Timeslot {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

impl From<Timeslot> for String {
    fn from(slot: Timeslot) -> Self {
        slot.0
    }
}

/// The configured, chronologically ordered enumeration of valid timeslots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeslotCatalog {
    slots: Vec<Timeslot>,
}

impl TimeslotCatalog {
    /// Builds a catalog from labels given in chronological order.
    ///
    /// Rejects an empty list, blank labels and repeated labels.
    pub fn new<I, S>(labels: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slots: Vec<Timeslot> = Vec::new();
        for label in labels {
            let slot = Timeslot::new(label);
            if slot.label().is_empty() {
                return Err(ConfigError::BlankTimeslot);
            }
            if slots.contains(&slot) {
                return Err(ConfigError::DuplicateTimeslot(slot.label().to_string()));
            }
            slots.push(slot);
        }
        if slots.is_empty() {
            return Err(ConfigError::NoTimeslots);
        }
        Ok(Self { slots })
    }

    /// Looks up a configured timeslot by label (surrounding whitespace ignored).
    pub fn parse(&self, label: &str) -> Option<&Timeslot> {
        let label = label.trim();
        self.slots.iter().find(|s| s.label() == label)
    }

    /// Whether the timeslot is configured.
    pub fn contains(&self, timeslot: &Timeslot) -> bool {
        self.slots.contains(timeslot)
    }

    /// Chronological position of a timeslot, if configured.
    pub fn position(&self, timeslot: &Timeslot) -> Option<usize> {
        self.slots.iter().position(|s| s == timeslot)
    }

    /// Timeslots in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &Timeslot> {
        self.slots.iter()
    }

    /// Number of configured timeslots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`: construction rejects empty catalogs.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Sort key placing configured timeslots first, in chronological order,
    /// and anything unknown afterwards by label.
    pub(crate) fn sort_key<'a>(&self, timeslot: &'a Timeslot) -> (usize, &'a str) {
        (
            self.position(timeslot).unwrap_or(usize::MAX),
            timeslot.label(),
        )
    }
}

impl Default for TimeslotCatalog {
    fn default() -> Self {
        Self {
            slots: DEFAULT_TIMESLOTS.iter().map(|l| Timeslot::new(*l)).collect(),
        }
    }
}
