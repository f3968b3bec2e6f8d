//! CSV codec for bulk student import/export
//!
//! The exchange format is a two-column file with a `username,level` header.
//! Unknown or empty level values fall back to [`Level::Freshman`] on import.

use std::io::Read;

use crate::{
    Error,
    error::ValidationError,
    student::{Level, NewStudent, Student},
};

pub const CSV_CONTENT_TYPE: &str = "text/csv";

const HEADERS: [&str; 2] = ["username", "level"];

/// Serialize students into CSV bytes, header included.
pub fn students_to_csv(students: &[Student]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(HEADERS)
        .map_err(|e| ValidationError::Csv(format!("Failed to write CSV header: {e}")))?;

    for student in students {
        writer
            .write_record([student.username.as_str(), student.level.as_str()])
            .map_err(|e| ValidationError::Csv(format!("Failed to write CSV record: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| ValidationError::Csv(format!("Failed to flush CSV output: {e}")).into())
}

/// Parse students from CSV bytes.
///
/// Header names are matched case-insensitively; fields are trimmed. A
/// missing `username` column or a row with an empty username is an error,
/// while an unrecognized level silently defaults to `FRESHMAN`.
pub fn students_from_csv<R: Read>(reader: R) -> Result<Vec<NewStudent>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| ValidationError::Csv(format!("Failed to parse CSV header: {e}")))?
        .clone();

    let username_idx = find_column(&headers, "username").ok_or_else(|| {
        Error::Validation(ValidationError::Csv("Missing 'username' column".to_string()))
    })?;
    let level_idx = find_column(&headers, "level");

    let mut students = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record =
            record.map_err(|e| ValidationError::Csv(format!("Failed to parse CSV row: {e}")))?;

        let username = record.get(username_idx).unwrap_or_default();
        if username.is_empty() {
            return Err(ValidationError::Csv(format!(
                "Row {}: username is empty",
                row + 1
            ))
            .into());
        }

        let level = level_idx
            .and_then(|idx| record.get(idx))
            .map(parse_level)
            .unwrap_or(Level::Freshman);

        students.push(NewStudent::new(username.to_string(), level));
    }

    Ok(students)
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

fn parse_level(value: &str) -> Level {
    value.parse().unwrap_or(Level::Freshman)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::student::StudentId;

    fn student(username: &str, level: Level) -> Student {
        Student::builder()
            .id(StudentId::new_random())
            .username(username.to_string())
            .level(level)
            .build()
            .unwrap()
    }

    #[test]
    fn test_export_includes_header_and_rows() {
        let students = vec![
            student("jane.doe", Level::Senior),
            student("john_roe", Level::Freshman),
        ];

        let bytes = students_to_csv(&students).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("username,level"));
        assert_eq!(lines.next(), Some("jane.doe,SENIOR"));
        assert_eq!(lines.next(), Some("john_roe,FRESHMAN"));
    }

    #[test]
    fn test_import_round_trips() {
        let input = "username,level\njane.doe,SENIOR\njohn_roe,JUNIOR\n";
        let students = students_from_csv(input.as_bytes()).unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].username, "jane.doe");
        assert_eq!(students[0].level, Level::Senior);
        assert_eq!(students[1].level, Level::Junior);
    }

    #[test]
    fn test_import_header_case_insensitive_and_trimmed() {
        let input = "Username, Level\n jane , sophomore \n";
        let students = students_from_csv(input.as_bytes()).unwrap();

        assert_eq!(students[0].username, "jane");
        assert_eq!(students[0].level, Level::Sophomore);
    }

    #[test]
    fn test_import_unknown_level_defaults_to_freshman() {
        let input = "username,level\njane,WIZARD\njohn,\n";
        let students = students_from_csv(input.as_bytes()).unwrap();

        assert_eq!(students[0].level, Level::Freshman);
        assert_eq!(students[1].level, Level::Freshman);
    }

    #[test]
    fn test_import_missing_level_column_defaults() {
        let input = "username\njane\n";
        let students = students_from_csv(input.as_bytes()).unwrap();
        assert_eq!(students[0].level, Level::Freshman);
    }

    #[test]
    fn test_import_missing_username_column_is_error() {
        let input = "name,level\njane,SENIOR\n";
        let result = students_from_csv(input.as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_import_empty_username_is_error() {
        let input = "username,level\n,SENIOR\n";
        let result = students_from_csv(input.as_bytes());
        assert!(result.is_err());
    }
}
