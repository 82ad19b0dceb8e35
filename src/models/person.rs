//! People who can be placed into workshops.
//!
//! Students and adults are loaded once and never mutated. The schedule
//! only stores their identifiers; names are resolved through a
//! [`Directory`] when building views.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which membership set of an assignment a person belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    Student,
    Adult,
}

impl PersonKind {
    /// Parses `"student"` / `"adult"` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "student" | "students" => Some(Self::Student),
            "adult" | "adults" => Some(Self::Adult),
            _ => None,
        }
    }

    /// Plural noun used in messages.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Student => "students",
            Self::Adult => "adults",
        }
    }
}

impl fmt::Display for PersonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => f.write_str("student"),
            Self::Adult => f.write_str("adult"),
        }
    }
}

/// Anything the schedule can place into a workshop.
pub trait Person {
    /// Membership set this kind of person goes into.
    const KIND: PersonKind;

    /// Unique identifier.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    /// Name as shown in the space-by-timeslot grid.
    fn grid_label(&self) -> String {
        self.name().to_string()
    }
}

/// A student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Stage / age band (e.g. "infantil", "primaria").
    pub stage: Option<String>,
    /// Class group label.
    pub group: Option<String>,
}

impl Student {
    /// Creates a student with no stage or group.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stage: None,
            group: None,
        }
    }

    /// Sets the stage label.
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Sets the group label.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

impl Person for Student {
    const KIND: PersonKind = PersonKind::Student;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn grid_label(&self) -> String {
        match &self.stage {
            Some(stage) => format!("{} ({stage})", self.name),
            None => self.name.clone(),
        }
    }
}

/// An adult (teacher, monitor, volunteer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adult {
    /// Unique adult identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Role label.
    pub role: Option<String>,
}

impl Adult {
    /// Creates an adult with no role.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: None,
        }
    }

    /// Sets the role label.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

impl Person for Adult {
    const KIND: PersonKind = PersonKind::Adult;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Identifier → person lookup.
///
/// Later entries replace earlier ones sharing an identifier.
#[derive(Debug, Clone)]
pub struct Directory<P> {
    by_id: BTreeMap<String, P>,
}

impl<P: Person> Directory<P> {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            by_id: BTreeMap::new(),
        }
    }

    /// Inserts a person, returning the one it replaced.
    pub fn insert(&mut self, person: P) -> Option<P> {
        let previous = self.by_id.insert(person.id().to_string(), person);
        if let Some(prev) = &previous {
            let kind = P::KIND;
            tracing::warn!(%kind, id = prev.id(), "duplicate identifier, keeping later entry");
        }
        previous
    }

    /// Looks a person up by identifier.
    pub fn get(&self, id: &str) -> Option<&P> {
        self.by_id.get(id)
    }

    /// Display name for an identifier.
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(Person::name)
    }

    /// People ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.by_id.values()
    }

    /// Number of people.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Joins the names of `ids` in identifier order, skipping unknown ids.
    pub fn join_names<'a, I>(&self, ids: I) -> String
    where
        I: IntoIterator<Item = &'a String>,
    {
        self.labels(ids, |p| p.name().to_string()).join(", ")
    }

    /// Resolves `ids` through `label`, sorted by identifier, skipping unknown ids.
    pub(crate) fn labels<'a, I, F>(&self, ids: I, label: F) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
        F: Fn(&P) -> String,
    {
        let mut ids: Vec<&String> = ids.into_iter().collect();
        ids.sort();
        ids.into_iter()
            .filter_map(|id| self.get(id))
            .map(label)
            .collect()
    }
}

impl<P: Person> Default for Directory<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Person> FromIterator<P> for Directory<P> {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        let mut dir = Self::new();
        for person in iter {
            dir.insert(person);
        }
        dir
    }
}
