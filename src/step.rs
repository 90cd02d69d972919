use chrono::{Duration, Months, NaiveDateTime};

use crate::format::Mask;
use crate::kind::StepUnit;

/// Number of lattice points compared by formatted string, inclusive of the
/// anchor. The window tolerates rounding/formatting collisions near the
/// boundary between two lattice points.
const MATCH_WINDOW: u32 = 4;

/// Checks whether `candidate` lands on the step lattice generated by
/// repeatedly adding `step` units to `origin` (the field's current value).
///
/// The lattice is walked forward only: first to find the last point not
/// exceeding `candidate` (the anchor; `origin` itself when `candidate`
/// precedes it), then up to four points from the anchor are compared to
/// `candidate` through their mask-formatted strings. A candidate earlier
/// than the origin is therefore only ever checked against the origin's
/// immediate neighborhood.
///
/// A `step` below 1 generates no lattice to check against and passes
/// unconditionally. [`DateFieldBuilder`](crate::DateFieldBuilder) rejects
/// such steps up front.
pub fn matches_step(
    candidate: &NaiveDateTime,
    origin: &NaiveDateTime,
    step: i64,
    unit: StepUnit,
    mask: &Mask,
) -> bool {
    if step < 1 {
        return true;
    }

    let mut anchor = *origin;
    loop {
        match add_step(anchor, step, unit) {
            Some(next) if next <= *candidate => anchor = next,
            _ => break,
        }
    }

    let target = mask.format(candidate);
    let mut point = anchor;
    for _ in 0..MATCH_WINDOW {
        if mask.format(&point) == target {
            return true;
        }
        match add_step(point, step, unit) {
            Some(next) => point = next,
            None => return false,
        }
    }
    false
}

/// Adds one step interval using calendar-aware arithmetic: month addition
/// respects variable month lengths, day/week addition respects leap years.
fn add_step(value: NaiveDateTime, step: i64, unit: StepUnit) -> Option<NaiveDateTime> {
    match unit {
        StepUnit::Days => value.checked_add_signed(Duration::try_days(step)?),
        StepUnit::Seconds => value.checked_add_signed(Duration::try_seconds(step)?),
        StepUnit::Weeks => value.checked_add_signed(Duration::try_weeks(step)?),
        StepUnit::Months => {
            let months = u32::try_from(step).ok()?;
            value.checked_add_months(Months::new(months))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_weekly_lattice_in_days() {
        let mask = Mask::new("Y-m-d");
        let origin = dt(2024, 1, 1, 0, 0, 0);
        assert!(matches_step(&dt(2024, 1, 8, 0, 0, 0), &origin, 7, StepUnit::Days, &mask));
        assert!(matches_step(&dt(2024, 2, 26, 0, 0, 0), &origin, 7, StepUnit::Days, &mask));
        assert!(!matches_step(&dt(2024, 1, 10, 0, 0, 0), &origin, 7, StepUnit::Days, &mask));
    }

    #[test]
    fn test_origin_always_matches_itself() {
        let mask = Mask::new("Y-m-d");
        let origin = dt(2024, 1, 1, 0, 0, 0);
        assert!(matches_step(&origin, &origin, 7, StepUnit::Days, &mask));
    }

    #[test]
    fn test_candidate_before_origin_degenerates_to_origin_window() {
        // The lattice is only walked forward, so an earlier candidate is
        // compared to the origin's window and fails unless it formats
        // identically to one of those points.
        let mask = Mask::new("Y-m-d");
        let origin = dt(2024, 1, 1, 0, 0, 0);
        assert!(!matches_step(&dt(2023, 12, 25, 0, 0, 0), &origin, 7, StepUnit::Days, &mask));
    }

    #[test]
    fn test_non_positive_step_passes_without_walking() {
        // With no positive interval there is no lattice to walk; the check
        // must terminate and pass rather than spin on a zero-width step.
        let mask = Mask::new("Y-m-d");
        let origin = dt(2024, 1, 1, 0, 0, 0);
        let later = dt(2024, 3, 15, 0, 0, 0);
        assert!(matches_step(&later, &origin, 0, StepUnit::Days, &mask));
        assert!(matches_step(&later, &origin, -7, StepUnit::Days, &mask));
    }

    #[test]
    fn test_seconds_lattice_for_time() {
        let mask = Mask::new("H:i");
        let origin = dt(1970, 1, 1, 0, 0, 0);
        assert!(matches_step(&dt(1970, 1, 1, 0, 30, 0), &origin, 900, StepUnit::Seconds, &mask));
        assert!(!matches_step(&dt(1970, 1, 1, 0, 20, 0), &origin, 900, StepUnit::Seconds, &mask));
    }

    #[test]
    fn test_month_lattice_clamps_short_months() {
        let mask = Mask::new("Y-m");
        let origin = dt(2024, 1, 31, 0, 0, 0);
        // 2024-01-31 + 1 month clamps to 2024-02-29; the Y-m mask still
        // matches any day submitted within that month.
        assert!(matches_step(&dt(2024, 2, 1, 0, 0, 0), &origin, 1, StepUnit::Months, &mask));
        assert!(matches_step(&dt(2024, 4, 15, 0, 0, 0), &origin, 3, StepUnit::Months, &mask));
        assert!(!matches_step(&dt(2024, 4, 15, 0, 0, 0), &origin, 2, StepUnit::Months, &mask));
    }

    #[test]
    fn test_week_lattice() {
        let mask = Mask::new("o-\\WW");
        let origin = dt(2017, 1, 2, 0, 0, 0); // Monday of 2017-W01
        assert!(matches_step(&dt(2017, 1, 16, 0, 0, 0), &origin, 2, StepUnit::Weeks, &mask));
        assert!(!matches_step(&dt(2017, 1, 9, 0, 0, 0), &origin, 2, StepUnit::Weeks, &mask));
    }

    #[test]
    fn test_formatted_comparison_tolerates_sub_mask_noise() {
        // Candidate differs from a lattice point only below the mask's
        // granularity; the formatted comparison still matches.
        let mask = Mask::new("Y-m-d");
        let origin = dt(2024, 1, 1, 0, 0, 0);
        assert!(matches_step(&dt(2024, 1, 8, 13, 45, 0), &origin, 7, StepUnit::Days, &mask));
    }
}
