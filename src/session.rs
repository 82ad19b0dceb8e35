//! One interactive editing session.
//!
//! A [`Session`] owns exactly one [`Schedule`] together with the people
//! directories and the timeslot catalog it was loaded with, and executes
//! line-oriented [`Command`]s against it. State lives only as long as the
//! session.
//!
//! ```text
//! assign student S1 8:45-9:30 W1
//! assign student S2,S3 8:45-9:30 W1
//! unassign adult A2 9:30-10:15 W4
//! available student 8:45-9:30 W1
//! summary 8:45-9:30
//! week
//! grid
//! timetable student S1
//! export week.csv
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::ScheduleConfig;
use crate::error::{ConfigError, LoadError, ScheduleError};
use crate::loader;
use crate::validation::{self, ValidationError};
use crate::models::{
    Adult, Directory, Person, PersonKind, Schedule, Student, Timeslot, TimeslotCatalog, Workshop,
};
use crate::views::{self, WeekOrder};

/// Usage text printed by `help`.
pub const HELP: &str = "\
Commands:
  assign <student|adult> <id>[,<id>...] <timeslot> <workshop>
  unassign <student|adult> <id> <timeslot> <workshop>
  available <student|adult> <timeslot> [workshop]
  summary <timeslot>
  week
  grid
  timetable <student|adult> <id>
  export <path.csv>
  help
  quit";

/// Failure of a single session command.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}\n(type `help` for the list of commands)")]
    Parse(String),

    #[error("Unknown {kind} id: {id}")]
    UnknownPerson { kind: PersonKind, id: String },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// A multi-person assign failed after placing `assigned`.
    #[error("{source} (already assigned: {})", .assigned.join(", "))]
    AssignStopped {
        assigned: Vec<String>,
        source: ScheduleError,
    },

    #[error("Invalid workshops:\n{}", list_problems(.0))]
    Invalid(Vec<ValidationError>),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Assign {
        kind: PersonKind,
        person_ids: Vec<String>,
        timeslot: Timeslot,
        workshop_id: String,
    },
    Unassign {
        kind: PersonKind,
        person_id: String,
        timeslot: Timeslot,
        workshop_id: String,
    },
    Available {
        kind: PersonKind,
        timeslot: Timeslot,
        workshop_id: Option<String>,
    },
    Summary {
        timeslot: Timeslot,
    },
    Week,
    Grid,
    Timetable {
        kind: PersonKind,
        person_id: String,
    },
    Export {
        path: PathBuf,
    },
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, SessionError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let command = match words.as_slice() {
            ["assign", kind, ids, timeslot, workshop] => Self::Assign {
                kind: parse_kind(kind)?,
                person_ids: parse_ids(ids)?,
                timeslot: Timeslot::new(*timeslot),
                workshop_id: workshop.to_string(),
            },
            ["unassign", kind, id, timeslot, workshop] => Self::Unassign {
                kind: parse_kind(kind)?,
                person_id: id.to_string(),
                timeslot: Timeslot::new(*timeslot),
                workshop_id: workshop.to_string(),
            },
            ["available", kind, timeslot] => Self::Available {
                kind: parse_kind(kind)?,
                timeslot: Timeslot::new(*timeslot),
                workshop_id: None,
            },
            ["available", kind, timeslot, workshop] => Self::Available {
                kind: parse_kind(kind)?,
                timeslot: Timeslot::new(*timeslot),
                workshop_id: Some(workshop.to_string()),
            },
            ["summary", timeslot] => Self::Summary {
                timeslot: Timeslot::new(*timeslot),
            },
            ["week"] => Self::Week,
            ["grid"] => Self::Grid,
            ["timetable", kind, id] => Self::Timetable {
                kind: parse_kind(kind)?,
                person_id: id.to_string(),
            },
            ["export", _, ..] => Self::Export {
                path: PathBuf::from(line["export".len()..].trim()),
            },
            ["help"] => Self::Help,
            ["quit"] | ["exit"] => Self::Quit,
            _ => return Err(SessionError::Parse(format!("Cannot understand: {line}"))),
        };
        Ok(Some(command))
    }
}

fn parse_kind(word: &str) -> Result<PersonKind, SessionError> {
    PersonKind::parse(word)
        .ok_or_else(|| SessionError::Parse(format!("Expected `student` or `adult`, got `{word}`")))
}

/// Comma-separated identifiers, at least one.
fn parse_ids(word: &str) -> Result<Vec<String>, SessionError> {
    let ids: Vec<String> = word
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();
    if ids.is_empty() {
        return Err(SessionError::Parse(format!("Expected at least one id, got `{word}`")));
    }
    Ok(ids)
}

fn list_problems(problems: &[ValidationError]) -> String {
    problems
        .iter()
        .map(|p| format!("  - {p}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A schedule plus everything needed to edit and display it.
#[derive(Debug)]
pub struct Session {
    schedule: Schedule,
    students: Directory<Student>,
    adults: Directory<Adult>,
    catalog: TimeslotCatalog,
    week_order: WeekOrder,
}

impl Session {
    /// Builds a session from already loaded records.
    ///
    /// The workshops are validated first. Fatal problems are all returned
    /// together as [`SessionError::Invalid`]; the others are logged as
    /// warnings.
    pub fn new(
        catalog: TimeslotCatalog,
        week_order: WeekOrder,
        workshops: Vec<Workshop>,
        students: Vec<Student>,
        adults: Vec<Adult>,
    ) -> Result<Self, SessionError> {
        if let Err(problems) = validation::validate_workshops(&workshops, &catalog) {
            let (fatal, soft): (Vec<_>, Vec<_>) =
                problems.into_iter().partition(|p| p.kind.is_fatal());
            for problem in &soft {
                warn!(kind = ?problem.kind, "{problem}");
            }
            if !fatal.is_empty() {
                return Err(SessionError::Invalid(fatal));
            }
        }

        let schedule = Schedule::with_catalog(&catalog, workshops)?;
        Ok(Self {
            schedule,
            students: students.into_iter().collect(),
            adults: adults.into_iter().collect(),
            catalog,
            week_order,
        })
    }

    /// Loads `students.csv`, `adults.csv` and `workshops.csv` from `data_dir`.
    pub fn load(data_dir: &Path, config: &ScheduleConfig) -> Result<Self, SessionError> {
        let catalog = config.catalog()?;
        let students = loader::load_students(data_dir.join("students.csv"))?;
        let adults = loader::load_adults(data_dir.join("adults.csv"))?;
        let workshops = loader::load_workshops(data_dir.join("workshops.csv"), &catalog)?;
        info!(
            students = students.len(),
            adults = adults.len(),
            workshops = workshops.len(),
            "data loaded"
        );
        Self::new(catalog, config.week_order, workshops, students, adults)
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn students(&self) -> &Directory<Student> {
        &self.students
    }

    pub fn adults(&self) -> &Directory<Adult> {
        &self.adults
    }

    pub fn catalog(&self) -> &TimeslotCatalog {
        &self.catalog
    }

    /// Executes a command and returns the text to show.
    ///
    /// A failed command leaves the schedule unchanged, except that a
    /// multi-person `assign` keeps the people placed before the failure.
    pub fn execute(&mut self, command: &Command) -> Result<String, SessionError> {
        match command {
            Command::Assign {
                kind,
                person_ids,
                timeslot,
                workshop_id,
            } => {
                let names = match kind {
                    PersonKind::Student => {
                        assign_all(&mut self.schedule, &self.students, person_ids, timeslot, workshop_id)?
                    }
                    PersonKind::Adult => {
                        assign_all(&mut self.schedule, &self.adults, person_ids, timeslot, workshop_id)?
                    }
                };
                let workshop = &self.schedule.get_assignment(timeslot, workshop_id)?.workshop().name;
                Ok(format!("Assigned {} to {workshop} ({timeslot})", names.join(", ")))
            }
            Command::Unassign {
                kind,
                person_id,
                timeslot,
                workshop_id,
            } => {
                let (name, removed) = match kind {
                    PersonKind::Student => {
                        unassign_from(&mut self.schedule, &self.students, person_id, timeslot, workshop_id)?
                    }
                    PersonKind::Adult => {
                        unassign_from(&mut self.schedule, &self.adults, person_id, timeslot, workshop_id)?
                    }
                };
                if removed {
                    let workshop = &self.schedule.get_assignment(timeslot, workshop_id)?.workshop().name;
                    Ok(format!("Removed {name} from {workshop} ({timeslot})"))
                } else {
                    Ok(format!("{name} was not in {workshop_id} ({timeslot}); nothing removed"))
                }
            }
            Command::Available {
                kind,
                timeslot,
                workshop_id,
            } => {
                let workshop_id = workshop_id.as_deref();
                let rows: Vec<Vec<String>> = match kind {
                    PersonKind::Student => self
                        .schedule
                        .available_students(timeslot, workshop_id, &self.students)?
                        .into_iter()
                        .map(|p| vec![p.id.clone(), p.name.clone()])
                        .collect(),
                    PersonKind::Adult => self
                        .schedule
                        .available_adults(timeslot, workshop_id, &self.adults)?
                        .into_iter()
                        .map(|p| vec![p.id.clone(), p.name.clone()])
                        .collect(),
                };
                if rows.is_empty() {
                    return Ok(format!("No {} available in {timeslot}", kind.plural()));
                }
                Ok(render_table(&["Id", "Name"], rows))
            }
            Command::Summary { timeslot } => {
                let rows = self
                    .schedule
                    .timeslot_summary(timeslot, &self.students, &self.adults)?;
                Ok(render_table(
                    &["Space", "Workshop", "Students", "Adults"],
                    rows.into_iter()
                        .map(|r| vec![r.space, r.workshop, r.students, r.adults])
                        .collect(),
                ))
            }
            Command::Week => {
                let rows = self.week_rows();
                Ok(render_table(
                    &["Timeslot", "Space", "Workshop", "Students", "Adults", "Notes"],
                    rows.into_iter()
                        .map(|r| {
                            vec![
                                r.timeslot.to_string(),
                                r.space,
                                r.workshop,
                                r.students,
                                r.adults,
                                r.notes,
                            ]
                        })
                        .collect(),
                ))
            }
            Command::Grid => Ok(self.render_grid()),
            Command::Timetable { kind, person_id } => {
                let rows = match kind {
                    PersonKind::Student => {
                        require(&self.students, person_id)?;
                        self.schedule
                            .student_timetable(person_id, &self.catalog, &self.adults)
                    }
                    PersonKind::Adult => {
                        require(&self.adults, person_id)?;
                        self.schedule
                            .adult_timetable(person_id, &self.catalog, &self.students)
                    }
                };
                Ok(render_table(
                    &["Timeslot", "Space", "Workshop", "With", "Notes"],
                    rows.into_iter()
                        .map(|r| {
                            vec![
                                r.timeslot.to_string(),
                                r.space,
                                r.workshop,
                                r.companions,
                                r.notes,
                            ]
                        })
                        .collect(),
                ))
            }
            Command::Export { path } => {
                let rows = self.week_rows();
                views::write_week_csv(&rows, File::create(path)?)?;
                info!(path = %path.display(), rows = rows.len(), "week exported");
                Ok(format!("Exported {} rows to {}", rows.len(), path.display()))
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    fn week_rows(&self) -> Vec<views::WeekRow> {
        self.schedule
            .week_rows(self.week_order, &self.catalog, &self.students, &self.adults)
    }

    fn render_grid(&self) -> String {
        let grid = self
            .schedule
            .grid(&self.catalog, &self.students, &self.adults);
        let mut out = Vec::new();
        for timeslot in grid.timeslots() {
            out.push(format!("== {timeslot} =="));
            for space in grid.spaces() {
                if let Some(cell) = grid.cell(timeslot, space) {
                    out.push(format!("[{space}]"));
                    out.extend(cell.text().lines().map(|l| format!("  {l}")));
                }
            }
        }
        out.join("\n")
    }
}

fn require<'a, P: Person>(dir: &'a Directory<P>, id: &str) -> Result<&'a P, SessionError> {
    dir.get(id).ok_or_else(|| SessionError::UnknownPerson {
        kind: P::KIND,
        id: id.to_string(),
    })
}

/// Assigns each id in turn, stopping at the first rejection. Unknown ids
/// are reported before anyone is placed.
fn assign_all<P: Person>(
    schedule: &mut Schedule,
    dir: &Directory<P>,
    ids: &[String],
    timeslot: &Timeslot,
    workshop_id: &str,
) -> Result<Vec<String>, SessionError> {
    let people = ids
        .iter()
        .map(|id| require(dir, id))
        .collect::<Result<Vec<_>, _>>()?;

    let mut assigned = Vec::new();
    for person in people {
        if let Err(source) = schedule.assign(person, timeslot, workshop_id) {
            if assigned.is_empty() {
                return Err(source.into());
            }
            return Err(SessionError::AssignStopped { assigned, source });
        }
        assigned.push(person.name().to_string());
    }
    Ok(assigned)
}

fn unassign_from<P: Person>(
    schedule: &mut Schedule,
    dir: &Directory<P>,
    id: &str,
    timeslot: &Timeslot,
    workshop_id: &str,
) -> Result<(String, bool), SessionError> {
    let person = require(dir, id)?;
    let removed = schedule.unassign(person, timeslot, workshop_id);
    Ok((person.name().to_string(), removed))
}

/// Left-aligned plain-text table.
fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end_matches(&[' ', '|'][..])
            .to_string()
    };

    let mut lines = vec![format_row(headers.to_vec())];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &rows {
        lines.push(format_row(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}
