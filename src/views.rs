//! Read-only projections of a schedule for rendering and export.
//!
//! Each projection has its own row type so that every column is checked
//! at compile time:
//!
//! | Projection | Row type | Order |
//! |------------|----------|-------|
//! | one timeslot | [`SummaryRow`] | space, workshop |
//! | whole week | [`WeekRow`] | timeslot ([`WeekOrder`]), space |
//! | space × timeslot grid | [`Grid`] / [`GridCell`] | catalog, space |
//! | one person | [`TimetableRow`] | catalog |
//! | who can still join | `&Student` / `&Adult` | id |
//!
//! Names are resolved through [`Directory`] lookups: identifiers are
//! sorted, unknown identifiers are skipped, and names are joined with
//! `", "`.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{
    Adult, Assignment, Directory, Person, PersonKind, Schedule, Student, Timeslot,
    TimeslotCatalog,
};

/// How week listings order their timeslots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekOrder {
    /// Plain label comparison (`"10:15-11:00"` before `"8:45-9:30"`).
    Label,
    /// Position in the configured timeslot catalog.
    #[default]
    Chronological,
}

/// One workshop within a single-timeslot summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Space")]
    pub space: String,
    #[serde(rename = "Workshop")]
    pub workshop: String,
    #[serde(rename = "Students")]
    pub students: String,
    #[serde(rename = "Adults")]
    pub adults: String,
}

/// One workshop within the full-week listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekRow {
    #[serde(rename = "Timeslot")]
    pub timeslot: Timeslot,
    #[serde(rename = "Space")]
    pub space: String,
    #[serde(rename = "Workshop")]
    pub workshop: String,
    #[serde(rename = "Students")]
    pub students: String,
    #[serde(rename = "Adults")]
    pub adults: String,
    #[serde(rename = "Notes")]
    pub notes: String,
}

/// One timeslot of a person's timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableRow {
    #[serde(rename = "Timeslot")]
    pub timeslot: Timeslot,
    #[serde(rename = "Space")]
    pub space: String,
    #[serde(rename = "Workshop")]
    pub workshop: String,
    /// Adults for a student's timetable, students for an adult's.
    #[serde(rename = "With")]
    pub companions: String,
    #[serde(rename = "Notes")]
    pub notes: String,
}

/// A workshop as shown inside a grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEntry {
    pub workshop: String,
    pub notes: Option<String>,
    pub adults: Vec<String>,
    /// Student names annotated with their stage, e.g. `"Anna (primaria)"`.
    pub students: Vec<String>,
}

impl CellEntry {
    /// Lines of cell content: name, notes, adults, students.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.workshop.clone()];
        if let Some(notes) = &self.notes {
            lines.push(notes.clone());
        }
        if !self.adults.is_empty() {
            lines.push(format!("Adults: {}", self.adults.join(", ")));
        }
        if !self.students.is_empty() {
            lines.push(format!("Students: {}", self.students.join(", ")));
        }
        lines
    }
}

/// Contents of one (timeslot, space) cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridCell {
    /// Workshops held there, by name. Normally one.
    pub entries: Vec<CellEntry>,
}

impl GridCell {
    /// Multi-line cell text; entries are separated by a blank line.
    pub fn text(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.lines().join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Space-by-timeslot grid.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    timeslots: Vec<Timeslot>,
    spaces: Vec<String>,
    cells: BTreeMap<(Timeslot, String), GridCell>,
}

impl Grid {
    /// Row headers, chronological.
    pub fn timeslots(&self) -> &[Timeslot] {
        &self.timeslots
    }

    /// Column headers, sorted.
    pub fn spaces(&self) -> &[String] {
        &self.spaces
    }

    /// The cell at (timeslot, space); `None` when nothing is held there.
    pub fn cell(&self, timeslot: &Timeslot, space: &str) -> Option<&GridCell> {
        self.cells.get(&(timeslot.clone(), space.to_string()))
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.len()
    }
}

impl Schedule {
    /// Summary of one timeslot, ordered by space then workshop name.
    pub fn timeslot_summary(
        &self,
        timeslot: &Timeslot,
        students: &Directory<Student>,
        adults: &Directory<Adult>,
    ) -> Result<Vec<SummaryRow>> {
        let mut rows: Vec<SummaryRow> = self
            .assignments_for_timeslot(timeslot)?
            .values()
            .map(|a| SummaryRow {
                space: a.workshop().space.clone(),
                workshop: a.workshop().name.clone(),
                students: students.join_names(a.students()),
                adults: adults.join_names(a.adults()),
            })
            .collect();
        rows.sort_by(|x, y| (&x.space, &x.workshop).cmp(&(&y.space, &y.workshop)));
        Ok(rows)
    }

    /// Full-week listing, one row per workshop, sorted by timeslot label
    /// (lexicographic, not chronological) then space.
    pub fn as_rows(&self, students: &Directory<Student>, adults: &Directory<Adult>) -> Vec<WeekRow> {
        let mut rows = self.week_listing(students, adults);
        rows.sort_by(|x, y| (&x.timeslot, &x.space).cmp(&(&y.timeslot, &y.space)));
        rows
    }

    /// Full-week listing in the requested timeslot order, then space.
    pub fn week_rows(
        &self,
        order: WeekOrder,
        catalog: &TimeslotCatalog,
        students: &Directory<Student>,
        adults: &Directory<Adult>,
    ) -> Vec<WeekRow> {
        match order {
            WeekOrder::Label => self.as_rows(students, adults),
            WeekOrder::Chronological => {
                let mut rows = self.week_listing(students, adults);
                rows.sort_by(|x, y| {
                    (catalog.sort_key(&x.timeslot), &x.space)
                        .cmp(&(catalog.sort_key(&y.timeslot), &y.space))
                });
                rows
            }
        }
    }

    fn week_listing(&self, students: &Directory<Student>, adults: &Directory<Adult>) -> Vec<WeekRow> {
        self.assignments()
            .map(|a| {
                let w = a.workshop();
                WeekRow {
                    timeslot: w.timeslot.clone(),
                    space: w.space.clone(),
                    workshop: w.name.clone(),
                    students: students.join_names(a.students()),
                    adults: adults.join_names(a.adults()),
                    notes: w.notes_or_empty().to_string(),
                }
            })
            .collect()
    }

    /// Space-by-timeslot grid.
    ///
    /// Rows follow the catalog; timeslots the catalog does not know come
    /// last. Columns are every space in use, sorted.
    pub fn grid(
        &self,
        catalog: &TimeslotCatalog,
        students: &Directory<Student>,
        adults: &Directory<Adult>,
    ) -> Grid {
        let mut timeslots: Vec<Timeslot> = catalog.iter().cloned().collect();
        let mut extra: Vec<Timeslot> = self
            .timeslots()
            .filter(|t| !catalog.contains(t))
            .cloned()
            .collect();
        extra.sort();
        timeslots.extend(extra);

        let spaces: BTreeSet<String> = self.workshops().values().map(|w| w.space.clone()).collect();

        let mut cells: BTreeMap<(Timeslot, String), GridCell> = BTreeMap::new();
        for a in self.assignments() {
            let w = a.workshop();
            cells
                .entry((w.timeslot.clone(), w.space.clone()))
                .or_default()
                .entries
                .push(CellEntry {
                    workshop: w.name.clone(),
                    notes: w.notes.clone(),
                    adults: adults.labels(a.adults(), Adult::grid_label),
                    students: students.labels(a.students(), Student::grid_label),
                });
        }
        for cell in cells.values_mut() {
            cell.entries.sort_by(|x, y| x.workshop.cmp(&y.workshop));
        }

        Grid {
            timeslots,
            spaces: spaces.into_iter().collect(),
            cells,
        }
    }

    /// Where a student is, per timeslot, in catalog order. The companions
    /// column lists the adults of each workshop.
    pub fn student_timetable(
        &self,
        student_id: &str,
        catalog: &TimeslotCatalog,
        adults: &Directory<Adult>,
    ) -> Vec<TimetableRow> {
        self.timetable(PersonKind::Student, student_id, catalog, |a| {
            adults.join_names(a.adults())
        })
    }

    /// Where an adult is, per timeslot, in catalog order. The companions
    /// column lists the students of each workshop.
    pub fn adult_timetable(
        &self,
        adult_id: &str,
        catalog: &TimeslotCatalog,
        students: &Directory<Student>,
    ) -> Vec<TimetableRow> {
        self.timetable(PersonKind::Adult, adult_id, catalog, |a| {
            students.join_names(a.students())
        })
    }

    fn timetable<F>(
        &self,
        kind: PersonKind,
        person_id: &str,
        catalog: &TimeslotCatalog,
        companions: F,
    ) -> Vec<TimetableRow>
    where
        F: Fn(&Assignment) -> String,
    {
        let mut rows: Vec<TimetableRow> = self
            .timeslots()
            .filter_map(|t| self.placement(kind, person_id, t))
            .map(|a| {
                let w = a.workshop();
                TimetableRow {
                    timeslot: w.timeslot.clone(),
                    space: w.space.clone(),
                    workshop: w.name.clone(),
                    companions: companions(a),
                    notes: w.notes_or_empty().to_string(),
                }
            })
            .collect();
        rows.sort_by(|x, y| catalog.sort_key(&x.timeslot).cmp(&catalog.sort_key(&y.timeslot)));
        rows
    }

    /// Students who can be offered for `workshop_id` in `timeslot`.
    ///
    /// Everyone not yet placed in that timeslot, plus the current members
    /// of the selected workshop. Without a workshop only the unplaced
    /// students are listed.
    pub fn available_students<'a>(
        &self,
        timeslot: &Timeslot,
        workshop_id: Option<&str>,
        students: &'a Directory<Student>,
    ) -> Result<Vec<&'a Student>> {
        self.available(timeslot, workshop_id, students)
    }

    /// Adults who can be offered for `workshop_id` in `timeslot`.
    /// See [`Schedule::available_students`].
    pub fn available_adults<'a>(
        &self,
        timeslot: &Timeslot,
        workshop_id: Option<&str>,
        adults: &'a Directory<Adult>,
    ) -> Result<Vec<&'a Adult>> {
        self.available(timeslot, workshop_id, adults)
    }

    fn available<'a, P: Person>(
        &self,
        timeslot: &Timeslot,
        workshop_id: Option<&str>,
        directory: &'a Directory<P>,
    ) -> Result<Vec<&'a P>> {
        self.assignments_for_timeslot(timeslot)?;
        let selected = workshop_id
            .map(|id| self.get_assignment(timeslot, id))
            .transpose()?;
        Ok(directory
            .iter()
            .filter(|p| {
                !self.is_assigned(P::KIND, p.id(), timeslot)
                    || selected.is_some_and(|a| a.contains(P::KIND, p.id()))
            })
            .collect())
    }
}

/// Writes rows as CSV with a header line.
pub fn write_csv<T: Serialize, W: Write>(rows: &[T], writer: W) -> std::result::Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}

/// Writes the full-week listing as CSV
/// (`Timeslot,Space,Workshop,Students,Adults,Notes`).
pub fn write_week_csv<W: Write>(rows: &[WeekRow], writer: W) -> std::result::Result<(), csv::Error> {
    write_csv(rows, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::Workshop;

    fn ts(label: &str) -> Timeslot {
        Timeslot::new(label)
    }

    fn students() -> Directory<Student> {
        vec![
            Student::new("S1", "Anna").with_stage("primaria"),
            Student::new("S2", "Biel"),
            Student::new("S3", "Carla").with_stage("infantil"),
        ]
        .into_iter()
        .collect()
    }

    fn adults() -> Directory<Adult> {
        vec![Adult::new("A1", "Marta"), Adult::new("A2", "Joan")]
            .into_iter()
            .collect()
    }

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new(vec![
            Workshop::new("W1", "Clay", "Room 1", "8:45-9:30").with_notes("Aprons"),
            Workshop::new("W2", "Music", "Hall", "8:45-9:30").with_adult_capacity(2),
            Workshop::new("W3", "Chess", "Library", "10:15-11:00"),
            Workshop::new("W4", "Dance", "Gym", "9:30-10:15"),
        ])
        .unwrap();
        let early = ts("8:45-9:30");
        s.assign_student(&Student::new("S2", "Biel"), &early, "W1").unwrap();
        s.assign_student(&Student::new("S1", "Anna"), &early, "W1").unwrap();
        s.assign_student(&Student::new("S3", "Carla"), &early, "W2").unwrap();
        s.assign_adult(&Adult::new("A2", "Joan"), &early, "W2").unwrap();
        s.assign_adult(&Adult::new("A1", "Marta"), &early, "W2").unwrap();
        s.assign_student(&Student::new("S1", "Anna"), &ts("10:15-11:00"), "W3").unwrap();
        s.assign_adult(&Adult::new("A1", "Marta"), &ts("9:30-10:15"), "W4").unwrap();
        s
    }

    #[test]
    fn test_timeslot_summary() {
        let s = sample_schedule();
        let rows = s.timeslot_summary(&ts("8:45-9:30"), &students(), &adults()).unwrap();
        assert_eq!(
            rows,
            vec![
                SummaryRow {
                    space: "Hall".into(),
                    workshop: "Music".into(),
                    students: "Carla".into(),
                    adults: "Marta, Joan".into(),
                },
                SummaryRow {
                    space: "Room 1".into(),
                    workshop: "Clay".into(),
                    students: "Anna, Biel".into(),
                    adults: String::new(),
                },
            ]
        );
        assert!(s.timeslot_summary(&ts("7:00-7:45"), &students(), &adults()).is_err());
    }

    #[test]
    fn test_as_rows_label_order() {
        let s = sample_schedule();
        let rows = s.as_rows(&students(), &adults());
        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.timeslot.label(), r.space.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("10:15-11:00", "Library"),
                ("8:45-9:30", "Hall"),
                ("8:45-9:30", "Room 1"),
                ("9:30-10:15", "Gym"),
            ]
        );
        assert_eq!(rows[2].notes, "Aprons");
        assert_eq!(rows[0].students, "Anna");
    }

    #[test]
    fn test_week_rows_chronological() {
        let s = sample_schedule();
        let catalog = TimeslotCatalog::default();
        let rows = s.week_rows(WeekOrder::Chronological, &catalog, &students(), &adults());
        let slots: Vec<&str> = rows.iter().map(|r| r.timeslot.label()).collect();
        assert_eq!(slots, vec!["8:45-9:30", "8:45-9:30", "9:30-10:15", "10:15-11:00"]);

        let by_label = s.week_rows(WeekOrder::Label, &catalog, &students(), &adults());
        assert_eq!(by_label, s.as_rows(&students(), &adults()));
    }

    #[test]
    fn test_scenario_d_empty_schedule_rows() {
        let s = Schedule::new(vec![
            Workshop::new("W1", "Clay", "Room 1", "8:45-9:30").with_notes("Aprons"),
            Workshop::new("W2", "Music", "Hall", "9:30-10:15"),
        ])
        .unwrap();
        let rows = s.as_rows(&students(), &adults());
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert!(row.students.is_empty());
            assert!(row.adults.is_empty());
        }
        assert_eq!(rows[0].notes, "Aprons");
        assert_eq!(rows[1].notes, "");
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let mut s = sample_schedule();
        s.assign_student(&Student::new("S9", "Ghost"), &ts("9:30-10:15"), "W4").unwrap();
        let rows = s.timeslot_summary(&ts("9:30-10:15"), &students(), &adults()).unwrap();
        assert_eq!(rows[0].students, "");
        assert_eq!(rows[0].adults, "Marta");
    }

    #[test]
    fn test_grid() {
        let s = sample_schedule();
        let grid = s.grid(&TimeslotCatalog::default(), &students(), &adults());

        assert_eq!(grid.timeslots().len(), 5);
        assert_eq!(grid.spaces(), ["Gym", "Hall", "Library", "Room 1"]);
        assert_eq!(grid.occupied(), 4);
        assert!(grid.cell(&ts("12:15-13:00"), "Gym").is_none());

        let cell = grid.cell(&ts("8:45-9:30"), "Room 1").unwrap();
        assert_eq!(cell.text(), "Clay\nAprons\nStudents: Anna (primaria), Biel");

        let cell = grid.cell(&ts("8:45-9:30"), "Hall").unwrap();
        assert_eq!(cell.text(), "Music\nAdults: Marta, Joan\nStudents: Carla (infantil)");
    }

    #[test]
    fn test_grid_shared_cell() {
        let s = Schedule::new(vec![
            Workshop::new("W1", "Painting", "Room 1", "8:45-9:30"),
            Workshop::new("W2", "Drawing", "Room 1", "8:45-9:30"),
        ])
        .unwrap();
        let grid = s.grid(&TimeslotCatalog::default(), &students(), &adults());
        let cell = grid.cell(&ts("8:45-9:30"), "Room 1").unwrap();
        assert_eq!(cell.text(), "Drawing\n\nPainting");
    }

    #[test]
    fn test_timetables() {
        let s = sample_schedule();
        let catalog = TimeslotCatalog::default();

        let rows = s.student_timetable("S1", &catalog, &adults());
        let slots: Vec<&str> = rows.iter().map(|r| r.timeslot.label()).collect();
        assert_eq!(slots, vec!["8:45-9:30", "10:15-11:00"]);
        assert_eq!(rows[0].workshop, "Clay");

        let rows = s.adult_timetable("A1", &catalog, &students());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].workshop, "Music");
        assert_eq!(rows[0].companions, "Carla");
        assert_eq!(rows[1].workshop, "Dance");

        assert!(s.student_timetable("S9", &catalog, &adults()).is_empty());
    }

    #[test]
    fn test_available_people() {
        let s = sample_schedule();
        let early = ts("8:45-9:30");
        let dir = students();

        let ids = |people: Vec<&Student>| -> Vec<String> {
            people.into_iter().map(|p| p.id.clone()).collect()
        };
        assert!(s.available_students(&early, None, &dir).unwrap().is_empty());
        assert_eq!(ids(s.available_students(&early, Some("W1"), &dir).unwrap()), vec!["S1", "S2"]);
        assert_eq!(
            ids(s.available_students(&ts("9:30-10:15"), Some("W4"), &dir).unwrap()),
            vec!["S1", "S2", "S3"]
        );

        let adult_dir = adults();
        let free: Vec<&str> = s
            .available_adults(&ts("10:15-11:00"), Some("W3"), &adult_dir)
            .unwrap()
            .into_iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(free, vec!["Marta", "Joan"]);
    }

    #[test]
    fn test_available_lookup_errors() {
        let s = sample_schedule();
        assert_eq!(
            s.available_students(&ts("12:15-13:00"), None, &students()).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            s.available_adults(&ts("8:45-9:30"), Some("W3"), &adults()).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_write_week_csv() {
        let s = Schedule::new(vec![
            Workshop::new("W1", "Clay", "Room 1", "8:45-9:30").with_notes("Aprons, smocks"),
        ])
        .unwrap();
        let rows = s.as_rows(&students(), &adults());

        let mut out = Vec::new();
        write_week_csv(&rows, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Timeslot,Space,Workshop,Students,Adults,Notes\n\
             8:45-9:30,Room 1,Clay,,,\"Aprons, smocks\"\n"
        );
    }
}
