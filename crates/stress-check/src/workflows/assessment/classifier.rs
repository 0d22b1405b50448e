use super::domain::StressLevel;

pub const LOW_CEILING: i64 = 13;
pub const MODERATE_CEILING: i64 = 26;

/// Bucket a total score. Total over all integers, so corrupt totals still classify.
pub fn classify(total: i64) -> StressLevel {
    if total <= LOW_CEILING {
        StressLevel::Low
    } else if total <= MODERATE_CEILING {
        StressLevel::Moderate
    } else {
        StressLevel::High
    }
}
