//! CSV ingestion of students, adults and workshops.
//!
//! Every loader checks the header row for its required columns, trims all
//! fields and skips rows without an `id` or `name`. Rows shorter than the
//! header leave their trailing columns empty. Loads are all-or-nothing: the
//! first bad row aborts the whole file.
//!
//! | File | Required columns | Optional |
//! |------|------------------|----------|
//! | students | `id`, `name`, `stage` | `group` |
//! | adults | `id`, `name` | `role` |
//! | workshops | `id`, `name`, `space`, `timeslot`, `capacity_students`, `capacity_adults` | `notes` |

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::LoadError;
use crate::models::{Adult, Student, TimeslotCatalog, Workshop, DEFAULT_ADULT_CAPACITY};

const STUDENT_COLUMNS: &[&str] = &["id", "name", "stage"];
const ADULT_COLUMNS: &[&str] = &["id", "name"];
const WORKSHOP_COLUMNS: &[&str] = &[
    "id",
    "name",
    "space",
    "timeslot",
    "capacity_students",
    "capacity_adults",
];

#[derive(Debug, Deserialize)]
struct StudentRecord {
    id: Option<String>,
    name: Option<String>,
    stage: Option<String>,
    group: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AdultRecord {
    id: Option<String>,
    name: Option<String>,
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorkshopRecord {
    id: Option<String>,
    name: Option<String>,
    space: Option<String>,
    timeslot: Option<String>,
    capacity_students: Option<String>,
    capacity_adults: Option<String>,
    notes: Option<String>,
}

/// Loads students from a CSV file.
pub fn load_students(path: impl AsRef<Path>) -> Result<Vec<Student>, LoadError> {
    let path = path.as_ref();
    load_students_from_reader(open(path)?, &path.display().to_string())
}

/// Loads students from any CSV source. `label` names the source in errors.
///
/// Stages are lower-cased.
pub fn load_students_from_reader<R: Read>(
    source: R,
    label: &str,
) -> Result<Vec<Student>, LoadError> {
    let mut reader = csv_reader(source);
    require_columns(&mut reader, STUDENT_COLUMNS, label)?;

    let mut students = Vec::new();
    for (line, record) in reader.deserialize::<StudentRecord>().enumerate() {
        let record = record?;
        let (Some(id), Some(name)) = (non_blank(record.id), non_blank(record.name)) else {
            debug!(file = label, row = line + 1, "skipping student row without id or name");
            continue;
        };
        students.push(Student {
            id,
            name,
            stage: non_blank(record.stage).map(|s| s.to_lowercase()),
            group: non_blank(record.group),
        });
    }
    Ok(students)
}

/// Loads adults from a CSV file.
pub fn load_adults(path: impl AsRef<Path>) -> Result<Vec<Adult>, LoadError> {
    let path = path.as_ref();
    load_adults_from_reader(open(path)?, &path.display().to_string())
}

/// Loads adults from any CSV source. `label` names the source in errors.
pub fn load_adults_from_reader<R: Read>(source: R, label: &str) -> Result<Vec<Adult>, LoadError> {
    let mut reader = csv_reader(source);
    require_columns(&mut reader, ADULT_COLUMNS, label)?;

    let mut adults = Vec::new();
    for (line, record) in reader.deserialize::<AdultRecord>().enumerate() {
        let record = record?;
        let (Some(id), Some(name)) = (non_blank(record.id), non_blank(record.name)) else {
            debug!(file = label, row = line + 1, "skipping adult row without id or name");
            continue;
        };
        adults.push(Adult {
            id,
            name,
            role: non_blank(record.role),
        });
    }
    Ok(adults)
}

/// Loads workshops from a CSV file, checking timeslots against `catalog`.
pub fn load_workshops(
    path: impl AsRef<Path>,
    catalog: &TimeslotCatalog,
) -> Result<Vec<Workshop>, LoadError> {
    let path = path.as_ref();
    load_workshops_from_reader(open(path)?, &path.display().to_string(), catalog)
}

/// Loads workshops from any CSV source. `label` names the source in errors.
///
/// Blank capacities mean unbounded students and [`DEFAULT_ADULT_CAPACITY`]
/// adults.
pub fn load_workshops_from_reader<R: Read>(
    source: R,
    label: &str,
    catalog: &TimeslotCatalog,
) -> Result<Vec<Workshop>, LoadError> {
    let mut reader = csv_reader(source);
    require_columns(&mut reader, WORKSHOP_COLUMNS, label)?;

    let mut workshops = Vec::new();
    for (line, record) in reader.deserialize::<WorkshopRecord>().enumerate() {
        let record = record?;
        let (Some(id), Some(name)) = (non_blank(record.id), non_blank(record.name)) else {
            debug!(file = label, row = line + 1, "skipping workshop row without id or name");
            continue;
        };

        let raw_timeslot = non_blank(record.timeslot).unwrap_or_default();
        let Some(timeslot) = catalog.parse(&raw_timeslot) else {
            return Err(LoadError::InvalidTimeslot {
                workshop: name,
                timeslot: raw_timeslot,
            });
        };

        let capacity_students =
            parse_capacity(record.capacity_students, "capacity_students", &name)?;
        let capacity_adults = parse_capacity(record.capacity_adults, "capacity_adults", &name)?
            .unwrap_or(DEFAULT_ADULT_CAPACITY);

        workshops.push(Workshop {
            id,
            name,
            space: non_blank(record.space).unwrap_or_default(),
            timeslot: timeslot.clone(),
            capacity_students,
            capacity_adults,
            notes: non_blank(record.notes),
        });
    }
    Ok(workshops)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source)
}

fn require_columns<R: Read>(
    reader: &mut csv::Reader<R>,
    expected: &[&str],
    label: &str,
) -> Result<(), LoadError> {
    let headers = reader.headers()?;
    let missing: Vec<String> = expected
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::MissingColumns {
            file: label.to_string(),
            columns: missing,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_capacity(
    value: Option<String>,
    column: &'static str,
    workshop: &str,
) -> Result<Option<u32>, LoadError> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u32>()
            .map(Some)
            .map_err(|_| LoadError::InvalidCapacity {
                workshop: workshop.to_string(),
                column,
                value: raw,
            }),
    }
}
