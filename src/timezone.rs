use chrono::{Duration, NaiveDateTime, Offset, TimeZone as _};
use chrono_tz::Tz;

use crate::prelude::*;

/// Which way a value moves between the field's storage timezone and the
/// ambient display timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Direction {
    /// Submitted value, expressed in the ambient timezone, moving into
    /// the field's storage timezone.
    #[display(fmt = "to storage")]
    ToStorage,
    /// Stored value moving into the ambient timezone for rendering.
    #[display(fmt = "to display")]
    ToDisplay,
}

/// Shifts the wall-clock fields of `value` between the field timezone and the
/// ambient timezone.
///
/// With no field timezone the value is returned unchanged; likewise when both
/// zones share the same UTC offset at the instant `value` represents. Offsets
/// are recomputed per call because daylight-saving rules make them vary with
/// the date.
///
/// This intentionally shifts the clock face rather than converting a true
/// instant: form fields display local wall-clock strings without a timezone
/// suffix. The two directions are exact inverses for any value/offset pair.
pub fn convert(
    value: NaiveDateTime,
    field_tz: Option<Tz>,
    ambient_tz: Tz,
    direction: Direction,
) -> NaiveDateTime {
    let Some(field_tz) = field_tz else {
        return value;
    };
    let diff = offset_diff(value, field_tz, ambient_tz, direction);
    if diff == 0 {
        return value;
    }
    value
        .checked_add_signed(Duration::seconds(diff))
        .unwrap_or(value)
}

/// The signed offset in seconds that [`convert`] would apply, without
/// applying it. Zero when the field has no timezone or both zones share
/// the same offset.
pub fn offset_seconds(
    value: NaiveDateTime,
    field_tz: Option<Tz>,
    ambient_tz: Tz,
    direction: Direction,
) -> i64 {
    match field_tz {
        None => 0,
        Some(field_tz) => offset_diff(value, field_tz, ambient_tz, direction),
    }
}

fn offset_diff(value: NaiveDateTime, field_tz: Tz, ambient_tz: Tz, direction: Direction) -> i64 {
    let field_offset = utc_offset(field_tz, value);
    let ambient_offset = utc_offset(ambient_tz, value);
    match direction {
        Direction::ToStorage => field_offset - ambient_offset,
        Direction::ToDisplay => ambient_offset - field_offset,
    }
}

fn utc_offset(tz: Tz, at: NaiveDateTime) -> i64 {
    i64::from(tz.offset_from_utc_datetime(&at).fix().local_minus_utc())
}
