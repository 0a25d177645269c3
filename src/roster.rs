use std::str::FromStr;

use thiserror::Error;

use crate::models::{CourseConfig, StudentRecord};

const GRADE_FIELDS: [&str; 3] = ["grade1", "grade2", "grade3"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("row {row}: missing {field}")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: {field} is not a whole number: {value:?}")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("total classes cell is empty")]
    MissingTotalClasses,

    #[error("total classes cell does not end in a whole number: {0:?}")]
    InvalidTotalClasses(String),

    #[error("total classes must be greater than zero")]
    ZeroTotalClasses,
}

/// Column positions inside the roster range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterLayout {
    pub student_column: Option<usize>,
    pub absences_column: usize,
}

impl Default for RosterLayout {
    fn default() -> Self {
        Self {
            student_column: Some(0),
            absences_column: 1,
        }
    }
}

impl RosterLayout {
    fn grade_column(&self, index: usize) -> usize {
        self.absences_column + 1 + index
    }
}

/// Parses raw roster rows. Fails on the first malformed cell.
pub fn parse_records(
    rows: &[Vec<String>],
    layout: RosterLayout,
) -> Result<Vec<StudentRecord>, RosterError> {
    rows.iter()
        .enumerate()
        .map(|(row, cells)| parse_record(row, cells, layout))
        .collect()
}

fn parse_record(
    row: usize,
    cells: &[String],
    layout: RosterLayout,
) -> Result<StudentRecord, RosterError> {
    let student = layout
        .student_column
        .and_then(|column| cells.get(column))
        .map(|cell| cell.trim().to_string())
        .filter(|name| !name.is_empty());

    let absences = parse_field(row, "absences", cells.get(layout.absences_column))?;

    let mut grades = [0i32; 3];
    for (index, field) in GRADE_FIELDS.iter().enumerate() {
        grades[index] = parse_field(row, *field, cells.get(layout.grade_column(index)))?;
    }

    Ok(StudentRecord {
        student,
        absences,
        grades,
    })
}

fn parse_field<T: FromStr>(
    row: usize,
    field: &'static str,
    cell: Option<&String>,
) -> Result<T, RosterError> {
    let raw = cell.map(|cell| cell.trim()).unwrap_or_default();
    if raw.is_empty() {
        return Err(RosterError::MissingField { row, field });
    }
    raw.parse().map_err(|_| RosterError::InvalidNumber {
        row,
        field,
        value: raw.to_string(),
    })
}

/// Reads the class count from a cell like `Total de aulas no semestre: 60`,
/// skipping the first `label_len` characters.
pub fn parse_total_classes(cell: &str, label_len: usize) -> Result<CourseConfig, RosterError> {
    if cell.trim().is_empty() {
        return Err(RosterError::MissingTotalClasses);
    }

    let suffix: String = cell.chars().skip(label_len).collect();
    let total_classes: u32 = suffix
        .trim()
        .parse()
        .map_err(|_| RosterError::InvalidTotalClasses(cell.to_string()))?;

    if total_classes == 0 {
        return Err(RosterError::ZeroTotalClasses);
    }

    Ok(CourseConfig { total_classes })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL_LEN: usize = 27;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn parses_named_rows() {
        let input = rows(&[&["Eduardo", "8", "35", "63", "61"], &["Murilo", " 2 ", "60", "70", "80"]]);
        let records = parse_records(&input, RosterLayout::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].student.as_deref(), Some("Eduardo"));
        assert_eq!(records[0].absences, 8);
        assert_eq!(records[0].grades, [35, 63, 61]);
        assert_eq!(records[1].absences, 2);
    }

    #[test]
    fn parses_rows_without_identifier() {
        let layout = RosterLayout {
            student_column: None,
            absences_column: 0,
        };
        let records = parse_records(&rows(&[&["3", "50", "60", "70"]]), layout).unwrap();
        assert_eq!(records[0].student, None);
        assert_eq!(records[0].grades, [50, 60, 70]);
    }

    #[test]
    fn reports_row_and_field_for_bad_grade() {
        let input = rows(&[&["Ana", "1", "50", "50", "50"], &["Bia", "1", "50", "dez", "50"]]);
        let err = parse_records(&input, RosterLayout::default()).unwrap_err();
        assert_eq!(
            err,
            RosterError::InvalidNumber {
                row: 1,
                field: "grade2",
                value: "dez".to_string(),
            }
        );
        assert_eq!(err.to_string(), "row 1: grade2 is not a whole number: \"dez\"");
    }

    #[test]
    fn negative_absences_are_rejected() {
        let err = parse_records(&rows(&[&["Ana", "-1", "50", "50", "50"]]), RosterLayout::default())
            .unwrap_err();
        assert!(matches!(err, RosterError::InvalidNumber { row: 0, field: "absences", .. }));
    }

    #[test]
    fn short_and_blank_rows_are_missing_fields() {
        let short = rows(&[&["Ana", "1", "50", "50"]]);
        assert_eq!(
            parse_records(&short, RosterLayout::default()).unwrap_err(),
            RosterError::MissingField { row: 0, field: "grade3" }
        );

        let blank: Vec<Vec<String>> = vec![vec![]];
        assert_eq!(
            parse_records(&blank, RosterLayout::default()).unwrap_err(),
            RosterError::MissingField { row: 0, field: "absences" }
        );
    }

    #[test]
    fn total_classes_follows_label() {
        let course = parse_total_classes("Total de aulas no semestre: 60", LABEL_LEN).unwrap();
        assert_eq!(course.total_classes, 60);
    }

    #[test]
    fn total_classes_rejects_bad_cells() {
        assert_eq!(parse_total_classes("  ", LABEL_LEN), Err(RosterError::MissingTotalClasses));
        assert!(matches!(
            parse_total_classes("Total de aulas no semestre: sessenta", LABEL_LEN),
            Err(RosterError::InvalidTotalClasses(_))
        ));
        assert_eq!(
            parse_total_classes("Total de aulas no semestre: 0", LABEL_LEN),
            Err(RosterError::ZeroTotalClasses)
        );
    }
}
