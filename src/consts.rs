/// Maximum valid month number (December)
pub const MAX_MONTH: u32 = 12;

/// Maximum valid ISO-8601 week number in a long year
pub const MAX_ISO_WEEK: u32 = 53;

/// Two-digit years below this pivot parse into the 2000s,
/// the rest into the 1900s (PHP `date()` behavior).
pub(crate) const SHORT_YEAR_PIVOT: i64 = 70;

/// Abbreviated English month names, indexed by month number - 1.
pub const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Full English month names, indexed by month number - 1.
pub const MONTHS_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Abbreviated English weekday names, Monday first (ISO weekday number - 1).
pub const WEEKDAYS_SHORT: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Full English weekday names, Monday first (ISO weekday number - 1).
pub const WEEKDAYS_LONG: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Default format mask for `FieldKind::Date` values like `2014-03-17`.
pub const DATE_FORMAT: &str = "Y-m-d";

/// Default format mask for `FieldKind::DateTime` values like `2014-03-17T22:15`.
pub const DATETIME_FORMAT: &str = "Y-m-d\\TH:i";

/// Default format mask for `FieldKind::Time` values like `22:15`.
pub const TIME_FORMAT: &str = "H:i";

/// Default format mask for `FieldKind::Week` values like `2014-W30`.
pub const WEEK_FORMAT: &str = "o-\\WW";

/// Default format mask for `FieldKind::Month` values like `2014-03`.
pub const MONTH_FORMAT: &str = "Y-m";

/// Human-readable placeholders for mask directives, used to compose
/// the invalid-format validation message (`Y-m-d` becomes `YYYY-MM-DD`).
pub const FORMAT_LEGEND: [(char, &str); 24] = [
    ('d', "DD"),
    ('j', "D"),
    ('D', "Mon-Sun"),
    ('l', "Monday-Sunday"),
    ('N', "1-7"),
    ('m', "MM"),
    ('n', "M"),
    ('M', "Jan-Dec"),
    ('F', "January-December"),
    ('Y', "YYYY"),
    ('y', "YY"),
    ('o', "YYYY"),
    ('W', "WW"),
    ('z', "0-365"),
    ('a', "am/pm"),
    ('A', "AM/PM"),
    ('g', "1-12"),
    ('h', "01-12"),
    ('G', "01-12"),
    ('H', "00-23"),
    ('i', "00-59"),
    ('s', "00-59"),
    ('u', "0-999999"),
    ('v', "0-999"),
];

/// Characters allowed through the submitted-value sanitizer.
/// Anything else is treated as dangerous and its presence
/// invalidates the whole submission.
pub(crate) const fn is_safe_input_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ':' | '.' | '-' | ',' | '/' | ' ')
}
