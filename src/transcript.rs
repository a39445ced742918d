// 📄 Transcript CSV - Import / export of the course list
// Columns: Grade, Credit_Hours, Grade_Points

use crate::grades::{CreditHours, Grade};
use crate::ledger::Ledger;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRow {
    #[serde(rename = "Grade")]
    pub grade: String,

    #[serde(rename = "Credit_Hours")]
    pub credit_hours: u32,

    /// Informational on import; points are always recomputed
    #[serde(rename = "Grade_Points", default)]
    pub grade_points: Option<String>,
}

/// Write every course as one CSV row, in ledger order
pub fn export_csv(ledger: &Ledger, csv_path: &Path) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(csv_path)
        .with_context(|| format!("Failed to create {}", csv_path.display()))?;

    for (index, course) in ledger.iter().enumerate() {
        let grade = Grade::from_points(course.grade()).ok_or_else(|| {
            anyhow!(
                "Course {} has grade value {} outside the grade table",
                index,
                course.grade()
            )
        })?;

        wtr.serialize(TranscriptRow {
            grade: grade.letter().to_string(),
            credit_hours: course.credit_hours(),
            grade_points: Some(format!("{:.2}", course.grade_points())),
        })?;
    }

    wtr.flush()?;
    tracing::info!(path = %csv_path.display(), rows = ledger.len(), "transcript exported");
    Ok(ledger.len())
}

/// Read (grade, credit hours) pairs from a transcript.
/// Any bad row fails the whole import, naming its line.
pub fn import_csv(csv_path: &Path) -> Result<Vec<(Grade, CreditHours)>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open {}", csv_path.display()))?;

    let mut courses = Vec::new();

    for (i, result) in rdr.deserialize().enumerate() {
        // Header is line 1
        let line = i + 2;
        let row: TranscriptRow =
            result.with_context(|| format!("Failed to read transcript line {}", line))?;

        let grade: Grade = row
            .grade
            .parse()
            .with_context(|| format!("Line {}: bad grade", line))?;
        let hours = CreditHours::new(row.credit_hours)
            .with_context(|| format!("Line {}: bad credit hours", line))?;

        courses.push((grade, hours));
    }

    tracing::info!(path = %csv_path.display(), rows = courses.len(), "transcript read");
    Ok(courses)
}

/// Append every row of a transcript to `ledger`
pub fn import_into(ledger: &mut Ledger, csv_path: &Path) -> Result<usize> {
    let courses = import_csv(csv_path)?;
    for (grade, hours) in &courses {
        ledger.append(*grade, *hours);
    }
    Ok(courses.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.csv");

        let mut ledger = Ledger::new();
        ledger.append(Grade::APlus, CreditHours::new(3).unwrap());
        ledger.append(Grade::CMinus, CreditHours::new(4).unwrap());

        assert_eq!(export_csv(&ledger, &path).unwrap(), 2);

        let mut restored = Ledger::new();
        assert_eq!(import_into(&mut restored, &path).unwrap(), 2);
        assert_eq!(restored, ledger);
    }

    #[test]
    fn test_export_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut ledger = Ledger::new();
        ledger.append(Grade::B, CreditHours::new(4).unwrap());
        export_csv(&ledger, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Grade,Credit_Hours,Grade_Points\nB,4,12.00\n");
    }

    #[test]
    fn test_import_without_points_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(&path, "Grade,Credit_Hours\nA-,3\nB+ (3.3),2\n").unwrap();

        let courses = import_csv(&path).unwrap();
        assert_eq!(
            courses,
            vec![
                (Grade::AMinus, CreditHours::new(3).unwrap()),
                (Grade::BPlus, CreditHours::new(2).unwrap()),
            ]
        );
    }

    #[test]
    fn test_import_rejects_bad_rows() {
        let dir = tempfile::tempdir().unwrap();

        let bad_grade = dir.path().join("bad_grade.csv");
        fs::write(&bad_grade, "Grade,Credit_Hours\nA,3\nQ,2\n").unwrap();
        let err = import_csv(&bad_grade).unwrap_err();
        assert!(format!("{:#}", err).contains("Line 3"));

        let bad_hours = dir.path().join("bad_hours.csv");
        fs::write(&bad_hours, "Grade,Credit_Hours\nA,9\n").unwrap();
        assert!(import_csv(&bad_hours).is_err());
    }

    #[test]
    fn test_export_rejects_off_table_grade() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let ledger = Ledger::deserialize(br#"[{"grade":2.5,"creditHours":3,"gradePoints":7.5}]"#);

        assert!(export_csv(&ledger, &path).is_err());
    }
}
