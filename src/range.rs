use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Optional minimum/maximum bounds for a field value, compared by canonical
/// date-time ordering.
///
/// The pair is deliberately not validated: configuring `min > max` is the
/// caller's responsibility, and a value between the two then fails both
/// bounds at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub min: Option<NaiveDateTime>,
    pub max: Option<NaiveDateTime>,
}

/// One violated bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RangeViolation {
    #[display(fmt = "below minimum")]
    TooLow,
    #[display(fmt = "above maximum")]
    TooHigh,
}

impl DateRange {
    pub const fn new(min: Option<NaiveDateTime>, max: Option<NaiveDateTime>) -> Self {
        Self { min, max }
    }

    /// Checks `value` against both bounds. Never short-circuits: with a
    /// misconfigured `min > max` both violations can be reported.
    pub fn check(&self, value: &NaiveDateTime) -> Vec<RangeViolation> {
        let mut violations = Vec::new();
        if let Some(min) = self.min {
            if *value < min {
                violations.push(RangeViolation::TooLow);
            }
        }
        if let Some(max) = self.max {
            if *value > max {
                violations.push(RangeViolation::TooHigh);
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_unbounded_passes_everything() {
        let range = DateRange::default();
        assert!(range.check(&dt(1970, 1, 1)).is_empty());
        assert!(range.check(&dt(9999, 12, 31)).is_empty());
    }

    #[test]
    fn test_below_minimum() {
        let range = DateRange::new(Some(dt(2017, 1, 1)), Some(dt(2018, 6, 24)));
        assert_eq!(range.check(&dt(2016, 12, 31)), vec![RangeViolation::TooLow]);
    }

    #[test]
    fn test_above_maximum() {
        let range = DateRange::new(Some(dt(2017, 1, 1)), Some(dt(2018, 6, 24)));
        assert_eq!(range.check(&dt(2018, 12, 31)), vec![RangeViolation::TooHigh]);
    }

    #[test]
    fn test_within_bounds() {
        let range = DateRange::new(Some(dt(2017, 1, 1)), Some(dt(2018, 6, 24)));
        assert!(range.check(&dt(2017, 6, 1)).is_empty());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let range = DateRange::new(Some(dt(2017, 1, 1)), Some(dt(2018, 6, 24)));
        assert!(range.check(&dt(2017, 1, 1)).is_empty());
        assert!(range.check(&dt(2018, 6, 24)).is_empty());
    }

    #[test]
    fn test_inverted_bounds_fire_both() {
        // min > max is passed through, not repaired
        let range = DateRange::new(Some(dt(2018, 6, 24)), Some(dt(2017, 1, 1)));
        assert_eq!(
            range.check(&dt(2017, 6, 1)),
            vec![RangeViolation::TooLow, RangeViolation::TooHigh]
        );
    }
}
