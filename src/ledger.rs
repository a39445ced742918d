// 📒 Course Ledger - Ordered list of courses + weighted GPA
// Append, remove-by-position, recompute, snapshot to bytes

use crate::grades::{CreditHours, Grade};
use serde::{Deserialize, Serialize};

// ============================================================================
// COURSE RECORD
// ============================================================================

/// One course entry.
///
/// Immutable after creation: `grade_points` is computed once in
/// [`Ledger::append`] and never touched again. Deserialized records keep
/// whatever `gradePoints` was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    grade: f64,
    credit_hours: u32,
    grade_points: f64,
}

impl CourseRecord {
    fn new(grade: Grade, credit_hours: CreditHours) -> Self {
        let grade = grade.points();
        let credit_hours = credit_hours.get();
        CourseRecord {
            grade,
            credit_hours,
            grade_points: grade * credit_hours as f64,
        }
    }

    pub fn grade(&self) -> f64 {
        self.grade
    }

    pub fn credit_hours(&self) -> u32 {
        self.credit_hours
    }

    pub fn grade_points(&self) -> f64 {
        self.grade_points
    }
}

// ============================================================================
// LEDGER
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    courses: Vec<CourseRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a course to the end and return a copy of the stored record
    pub fn append(&mut self, grade: Grade, credit_hours: CreditHours) -> CourseRecord {
        let record = CourseRecord::new(grade, credit_hours);
        self.courses.push(record.clone());
        tracing::debug!(
            grade = record.grade,
            credit_hours = record.credit_hours,
            len = self.courses.len(),
            "course appended"
        );
        record
    }

    /// Remove the course at `index`, shifting later courses down.
    /// Out-of-range indices leave the ledger untouched.
    pub fn remove_at(&mut self, index: usize) -> Option<CourseRecord> {
        if index >= self.courses.len() {
            tracing::warn!(index, len = self.courses.len(), "remove index out of range");
            return None;
        }
        let removed = self.courses.remove(index);
        tracing::debug!(index, len = self.courses.len(), "course removed");
        Some(removed)
    }

    /// Credit-weighted mean of all courses, unrounded.
    /// `None` when there is nothing to average.
    pub fn compute_average(&self) -> Option<f64> {
        let credits = self.total_credit_hours();
        if credits == 0 {
            return None;
        }
        Some(self.total_grade_points() / credits as f64)
    }

    pub fn total_grade_points(&self) -> f64 {
        self.courses.iter().map(|c| c.grade_points).sum()
    }

    pub fn total_credit_hours(&self) -> u64 {
        self.courses.iter().map(|c| c.credit_hours as u64).sum()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CourseRecord> {
        self.courses.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CourseRecord> {
        self.courses.iter()
    }

    pub fn clear(&mut self) {
        self.courses.clear();
    }

    // ========================================================================
    // SNAPSHOTS
    // ========================================================================

    /// JSON array of records, field for field
    pub fn serialize(&self) -> Vec<u8> {
        serde_json::to_vec(&self.courses).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to encode ledger, writing empty snapshot");
            b"[]".to_vec()
        })
    }

    /// Rebuild a ledger from a snapshot. Anything unreadable is an empty ledger.
    pub fn deserialize(bytes: &[u8]) -> Ledger {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ledger::new();
        }
        match serde_json::from_slice::<Vec<CourseRecord>>(bytes) {
            Ok(courses) => Ledger { courses },
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable ledger snapshot");
                Ledger::new()
            }
        }
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a CourseRecord;
    type IntoIter = std::slice::Iter<'a, CourseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.courses.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(h: u32) -> CreditHours {
        CreditHours::new(h).unwrap()
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.append(Grade::A, hours(3));
        ledger.append(Grade::BPlus, hours(4));
        ledger.append(Grade::CMinus, hours(2));
        ledger
    }

    #[test]
    fn test_append_computes_grade_points() {
        let mut ledger = Ledger::new();
        let record = ledger.append(Grade::AMinus, hours(3));

        assert_eq!(record.grade(), 3.7);
        assert_eq!(record.credit_hours(), 3);
        assert_eq!(record.grade_points(), 3.7 * 3.0);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(0), Some(&record));
    }

    #[test]
    fn test_average_two_courses() {
        let mut ledger = Ledger::new();
        ledger.append(Grade::A, hours(3));
        ledger.append(Grade::B, hours(4));

        let gpa = ledger.compute_average().unwrap();
        assert!((gpa - 24.0 / 7.0).abs() < 1e-12);
        assert_eq!(format!("{:.2}", gpa), "3.43");
    }

    #[test]
    fn test_average_matches_weighted_mean() {
        let ledger = sample_ledger();
        let expected = (4.0 * 3.0 + 3.3 * 4.0 + 1.7 * 2.0) / 9.0;
        let gpa = ledger.compute_average().unwrap();
        assert!((gpa - expected).abs() < 1e-12);
    }

    #[test]
    fn test_average_single_failing_course() {
        let mut ledger = Ledger::new();
        ledger.append(Grade::F, hours(3));
        assert_eq!(ledger.compute_average(), Some(0.0));
    }

    #[test]
    fn test_empty_ledger_has_no_average() {
        let ledger = Ledger::new();
        assert_eq!(ledger.compute_average(), None);
    }

    #[test]
    fn test_zero_credit_snapshot_has_no_average() {
        let ledger = Ledger::deserialize(br#"[{"grade":4.0,"creditHours":0,"gradePoints":0.0}]"#);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.compute_average(), None);
    }

    #[test]
    fn test_append_then_remove_restores_state() {
        let before = sample_ledger();
        let mut ledger = before.clone();

        ledger.append(Grade::D, hours(1));
        let removed = ledger.remove_at(ledger.len() - 1);

        assert!(removed.is_some());
        assert_eq!(ledger, before);

        let mut empty = Ledger::new();
        empty.append(Grade::B, hours(2));
        empty.remove_at(0);
        assert_eq!(empty, Ledger::new());
    }

    #[test]
    fn test_remove_shifts_positions() {
        let mut ledger = Ledger::new();
        ledger.append(Grade::A, hours(3));
        let second = ledger.append(Grade::C, hours(2));

        ledger.remove_at(0);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(0), Some(&second));
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut ledger = sample_ledger();
        let before = ledger.clone();

        assert_eq!(ledger.remove_at(3), None);
        assert_eq!(ledger.remove_at(usize::MAX), None);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_duplicates_allowed() {
        let mut ledger = Ledger::new();
        ledger.append(Grade::B, hours(3));
        ledger.append(Grade::B, hours(3));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(0), ledger.get(1));
    }

    #[test]
    fn test_snapshot_round_trip_every_grade_and_credit() {
        let mut ledger = Ledger::new();
        for grade in Grade::ALL {
            for credits in CreditHours::ALL {
                ledger.append(grade, credits);
            }
        }
        assert_eq!(ledger.len(), 78);

        let restored = Ledger::deserialize(&ledger.serialize());

        assert_eq!(restored, ledger);
        for (a, b) in restored.iter().zip(ledger.iter()) {
            assert_eq!(
                a.grade_points().to_bits(),
                b.grade_points().to_bits(),
                "grade {} x {} credits",
                b.grade(),
                b.credit_hours()
            );
        }
    }

    #[test]
    fn test_snapshot_keeps_17_digit_grade_points() {
        let mut ledger = Ledger::new();
        let a_minus = ledger.append(Grade::AMinus, hours(3));
        let d_plus = ledger.append(Grade::DPlus, hours(3));

        let restored = Ledger::deserialize(&ledger.serialize());

        assert_eq!(
            restored.get(0).unwrap().grade_points().to_bits(),
            a_minus.grade_points().to_bits()
        );
        assert_eq!(
            restored.get(1).unwrap().grade_points().to_bits(),
            d_plus.grade_points().to_bits()
        );
    }

    #[test]
    fn test_snapshot_round_trip() {
        let ledger = sample_ledger();
        let restored = Ledger::deserialize(&ledger.serialize());

        assert_eq!(restored, ledger);
        for (a, b) in restored.iter().zip(ledger.iter()) {
            assert_eq!(a.grade_points().to_bits(), b.grade_points().to_bits());
        }
    }

    #[test]
    fn test_snapshot_layout() {
        let mut ledger = Ledger::new();
        ledger.append(Grade::B, hours(4));

        let json: serde_json::Value = serde_json::from_slice(&ledger.serialize()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"grade": 3.0, "creditHours": 4, "gradePoints": 12.0}])
        );
    }

    #[test]
    fn test_deserialize_keeps_stored_grade_points() {
        let ledger = Ledger::deserialize(br#"[{"grade":3.0,"creditHours":4,"gradePoints":11.5}]"#);
        assert_eq!(ledger.get(0).unwrap().grade_points(), 11.5);
    }

    #[test]
    fn test_deserialize_garbage_is_empty() {
        assert!(Ledger::deserialize(b"").is_empty());
        assert!(Ledger::deserialize(b"   \n").is_empty());
        assert!(Ledger::deserialize(b"not json").is_empty());
        assert!(Ledger::deserialize(b"{\"grade\":4}").is_empty());
        assert!(Ledger::deserialize(br#"[{"grade":"A"}]"#).is_empty());
        assert!(Ledger::deserialize(b"null").is_empty());
        assert_eq!(Ledger::deserialize(b"[]"), Ledger::new());
    }
}
