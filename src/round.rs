use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::format::{Directive, Mask};
use crate::kind::FieldKind;

/// Truncates a parsed value to the precision meaningful for its field kind,
/// so later equality and step comparisons are not perturbed by components
/// outside the field's granularity.
///
/// | kind | rule |
/// |---|---|
/// | Date | zero the whole time of day |
/// | DateTime | keep as-is when the mask carries seconds and sub-seconds, else drop sub-seconds (and seconds, when the mask lacks them) |
/// | Time | re-anchor the date to the Unix epoch day; drop seconds/sub-seconds absent from the mask |
/// | Month | first day of month, midnight |
/// | Week | unchanged (ISO week parsing already pins a weekday) |
pub fn round(value: NaiveDateTime, kind: FieldKind, mask: &Mask) -> NaiveDateTime {
    let has_seconds = mask.has_directive(Directive::Second);
    let has_subseconds =
        mask.has_directive(Directive::Micro) || mask.has_directive(Directive::Milli);
    match kind {
        FieldKind::Date => value.date().and_time(NaiveTime::default()),
        FieldKind::DateTime => {
            if has_seconds && has_subseconds {
                value
            } else {
                truncate_time(value, has_seconds, false)
            }
        }
        FieldKind::Time => {
            let truncated = truncate_time(value, has_seconds, has_subseconds);
            NaiveDate::default().and_time(truncated.time())
        }
        FieldKind::Month => NaiveDate::from_ymd_opt(value.year(), value.month(), 1)
            .map(|first| first.and_time(NaiveTime::default()))
            .unwrap_or(value),
        FieldKind::Week => value,
    }
}

fn truncate_time(value: NaiveDateTime, keep_seconds: bool, keep_subseconds: bool) -> NaiveDateTime {
    let second = if keep_seconds { value.second() } else { 0 };
    let micro = if keep_subseconds {
        (value.nanosecond() % 1_000_000_000) / 1_000
    } else {
        0
    };
    NaiveTime::from_hms_micro_opt(value.hour(), value.minute(), second, micro)
        .map(|time| value.date().and_time(time))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_date_drops_time_of_day() {
        let rounded = round(dt(2024, 3, 17, 13, 45, 31), FieldKind::Date, &Mask::new("Y-m-d"));
        assert_eq!(rounded, dt(2024, 3, 17, 0, 0, 0));
    }

    #[test]
    fn test_month_pins_first_day_midnight() {
        let rounded = round(dt(2024, 3, 17, 13, 45, 0), FieldKind::Month, &Mask::new("Y-m"));
        assert_eq!(rounded, dt(2024, 3, 1, 0, 0, 0));
    }

    #[test]
    fn test_datetime_without_seconds_in_mask() {
        let mask = Mask::new("Y-m-d\\TH:i");
        let rounded = round(dt(2024, 3, 17, 13, 45, 31), FieldKind::DateTime, &mask);
        assert_eq!(rounded, dt(2024, 3, 17, 13, 45, 0));
    }

    #[test]
    fn test_datetime_with_seconds_in_mask() {
        let mask = Mask::new("Y-m-d\\TH:i:s");
        let value = dt(2024, 3, 17, 13, 45, 31).with_nanosecond(250_000_000).unwrap();
        let rounded = round(value, FieldKind::DateTime, &mask);
        // seconds kept, sub-seconds dropped
        assert_eq!(rounded, dt(2024, 3, 17, 13, 45, 31));
        assert_eq!(rounded.nanosecond(), 0);
    }

    #[test]
    fn test_datetime_full_precision_mask_untouched() {
        let mask = Mask::new("Y-m-d\\TH:i:s.v");
        let value = dt(2024, 3, 17, 13, 45, 31).with_nanosecond(250_000_000).unwrap();
        assert_eq!(round(value, FieldKind::DateTime, &mask), value);
    }

    #[test]
    fn test_time_reanchors_to_epoch_day() {
        let mask = Mask::new("H:i");
        let rounded = round(dt(2024, 3, 17, 22, 15, 31), FieldKind::Time, &mask);
        assert_eq!(rounded, dt(1970, 1, 1, 22, 15, 0));
    }

    #[test]
    fn test_time_keeps_seconds_when_masked() {
        let mask = Mask::new("H:i:s");
        let rounded = round(dt(2024, 3, 17, 22, 15, 31), FieldKind::Time, &mask);
        assert_eq!(rounded, dt(1970, 1, 1, 22, 15, 31));
    }

    #[test]
    fn test_week_unchanged() {
        let value = dt(2014, 7, 21, 5, 0, 0);
        assert_eq!(round(value, FieldKind::Week, &Mask::new("o-\\WW")), value);
    }
}
