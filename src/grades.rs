// 🎓 Grade Table - Fixed letter grades and credit-hour choices
// Everything the input controls can offer lives here

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    #[error("unknown letter grade '{0}' (expected one of A+, A, A-, ... F)")]
    UnknownLetter(String),

    #[error("credit hours must be a whole number, got '{0}'")]
    InvalidCreditHours(String),

    #[error("credit hours must be between {min} and {max}, got {got}")]
    CreditHoursOutOfRange { got: u32, min: u32, max: u32 },
}

// ============================================================================
// LETTER GRADES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    DMinus,
    F,
}

impl Grade {
    /// All grades in selector order (best first)
    pub const ALL: [Grade; 13] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::DPlus,
        Grade::D,
        Grade::DMinus,
        Grade::F,
    ];

    /// Grade-point value on the 4.0 scale
    pub fn points(&self) -> f64 {
        match self {
            Grade::APlus | Grade::A => 4.0,
            Grade::AMinus => 3.7,
            Grade::BPlus => 3.3,
            Grade::B => 3.0,
            Grade::BMinus => 2.7,
            Grade::CPlus => 2.3,
            Grade::C => 2.0,
            Grade::CMinus => 1.7,
            Grade::DPlus => 1.3,
            Grade::D => 1.0,
            Grade::DMinus => 0.7,
            Grade::F => 0.0,
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::DMinus => "D-",
            Grade::F => "F",
        }
    }

    /// Display label, e.g. "B+ (3.3)"
    pub fn label(&self) -> String {
        format!("{} ({:.1})", self.letter(), self.points())
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

impl FromStr for Grade {
    type Err = GradeError;

    /// Accepts "b+" as well as a full label like "B+ (3.3)"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_uppercase();
        Grade::ALL
            .iter()
            .copied()
            .find(|g| g.letter() == wanted)
            .ok_or_else(|| GradeError::UnknownLetter(s.to_string()))
    }
}

impl Grade {
    /// First grade in table order worth exactly `points`
    pub fn from_points(points: f64) -> Option<Grade> {
        Grade::ALL.iter().copied().find(|g| g.points() == points)
    }
}

/// Label for a stored grade-point value.
///
/// Stored records only keep the number, so 4.0 shows as "A+ (4.0)".
/// Values outside the table fall back to the F label.
pub fn label_for_points(points: f64) -> String {
    Grade::from_points(points)
        .unwrap_or(Grade::F)
        .label()
}

// ============================================================================
// CREDIT HOURS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CreditHours(u32);

impl CreditHours {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 6;

    pub const ALL: [CreditHours; 6] = [
        CreditHours(1),
        CreditHours(2),
        CreditHours(3),
        CreditHours(4),
        CreditHours(5),
        CreditHours(6),
    ];

    pub fn new(hours: u32) -> Result<Self, GradeError> {
        if (Self::MIN..=Self::MAX).contains(&hours) {
            Ok(CreditHours(hours))
        } else {
            Err(GradeError::CreditHoursOutOfRange {
                got: hours,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for CreditHours {
    fn default() -> Self {
        CreditHours(3)
    }
}

impl TryFrom<u32> for CreditHours {
    type Error = GradeError;

    fn try_from(hours: u32) -> Result<Self, Self::Error> {
        CreditHours::new(hours)
    }
}

impl FromStr for CreditHours {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hours: u32 = s
            .trim()
            .parse()
            .map_err(|_| GradeError::InvalidCreditHours(s.to_string()))?;
        CreditHours::new(hours)
    }
}

impl fmt::Display for CreditHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
