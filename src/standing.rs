// 🚦 Standing - How a computed GPA is shown
// Pure mapping from an average to text and a color band

pub const HIGH_THRESHOLD: f64 = 3.5;
pub const MEDIUM_THRESHOLD: f64 = 2.0;

/// Placeholder shown when there is no average to display
pub const NO_AVERAGE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpaTier {
    High,
    Medium,
    Low,
}

impl GpaTier {
    pub fn from_average(gpa: f64) -> Self {
        if gpa >= HIGH_THRESHOLD {
            GpaTier::High
        } else if gpa >= MEDIUM_THRESHOLD {
            GpaTier::Medium
        } else {
            GpaTier::Low
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GpaTier::High => "high",
            GpaTier::Medium => "medium",
            GpaTier::Low => "low",
        }
    }

    /// RGB used for the GPA readout (green / orange / pink)
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            GpaTier::High => (0x4a, 0xd6, 0x6d),
            GpaTier::Medium => (0xf8, 0x96, 0x1e),
            GpaTier::Low => (0xf7, 0x25, 0x85),
        }
    }
}

/// Two decimals, or the placeholder for an empty ledger
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(gpa) => format!("{:.2}", gpa),
        None => NO_AVERAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(GpaTier::from_average(4.0), GpaTier::High);
        assert_eq!(GpaTier::from_average(3.5), GpaTier::High);
        assert_eq!(GpaTier::from_average(3.49), GpaTier::Medium);
        assert_eq!(GpaTier::from_average(2.0), GpaTier::Medium);
        assert_eq!(GpaTier::from_average(1.99), GpaTier::Low);
        assert_eq!(GpaTier::from_average(0.0), GpaTier::Low);
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(None), "-");
        assert_eq!(format_average(Some(0.0)), "0.00");
        assert_eq!(format_average(Some(24.0 / 7.0)), "3.43");
        assert_eq!(format_average(Some(4.0)), "4.00");
    }
}
