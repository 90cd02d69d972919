use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::consts::{
    FORMAT_LEGEND, MAX_ISO_WEEK, MAX_MONTH, MONTHS_LONG, MONTHS_SHORT, SHORT_YEAR_PIVOT,
    WEEKDAYS_LONG, WEEKDAYS_SHORT,
};
use crate::prelude::*;

/// A single format directive from the PHP `date()`-style mask grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// `Y`: 4-digit year
    YearFull,
    /// `y`: 2-digit year
    YearShort,
    /// `m`: zero-padded month number
    MonthPad,
    /// `n`: month number without padding
    Month,
    /// `M`: abbreviated month name
    MonthShort,
    /// `F`: full month name
    MonthLong,
    /// `d`: zero-padded day of month
    DayPad,
    /// `j`: day of month without padding
    Day,
    /// `D`: abbreviated weekday name
    WeekdayShort,
    /// `l`: full weekday name
    WeekdayLong,
    /// `N`: ISO-8601 weekday number (1 = Monday)
    WeekdayIso,
    /// `H`: zero-padded 24-hour
    Hour24Pad,
    /// `G`: 24-hour without padding
    Hour24,
    /// `h`: zero-padded 12-hour
    Hour12Pad,
    /// `g`: 12-hour without padding
    Hour12,
    /// `a`: lowercase meridiem (`am`/`pm`)
    MeridiemLower,
    /// `A`: uppercase meridiem (`AM`/`PM`)
    MeridiemUpper,
    /// `i`: zero-padded minute
    Minute,
    /// `s`: zero-padded second
    Second,
    /// `u`: microseconds
    Micro,
    /// `v`: milliseconds
    Milli,
    /// `o`: ISO-8601 week-numbering year
    IsoYear,
    /// `W`: zero-padded ISO-8601 week number
    IsoWeek,
    /// `z`: day of year, starting at 0
    DayOfYear,
}

impl Directive {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'Y' => Self::YearFull,
            'y' => Self::YearShort,
            'm' => Self::MonthPad,
            'n' => Self::Month,
            'M' => Self::MonthShort,
            'F' => Self::MonthLong,
            'd' => Self::DayPad,
            'j' => Self::Day,
            'D' => Self::WeekdayShort,
            'l' => Self::WeekdayLong,
            'N' => Self::WeekdayIso,
            'H' => Self::Hour24Pad,
            'G' => Self::Hour24,
            'h' => Self::Hour12Pad,
            'g' => Self::Hour12,
            'a' => Self::MeridiemLower,
            'A' => Self::MeridiemUpper,
            'i' => Self::Minute,
            's' => Self::Second,
            'u' => Self::Micro,
            'v' => Self::Milli,
            'o' => Self::IsoYear,
            'W' => Self::IsoWeek,
            'z' => Self::DayOfYear,
            _ => return None,
        })
    }

    const fn as_char(self) -> char {
        match self {
            Self::YearFull => 'Y',
            Self::YearShort => 'y',
            Self::MonthPad => 'm',
            Self::Month => 'n',
            Self::MonthShort => 'M',
            Self::MonthLong => 'F',
            Self::DayPad => 'd',
            Self::Day => 'j',
            Self::WeekdayShort => 'D',
            Self::WeekdayLong => 'l',
            Self::WeekdayIso => 'N',
            Self::Hour24Pad => 'H',
            Self::Hour24 => 'G',
            Self::Hour12Pad => 'h',
            Self::Hour12 => 'g',
            Self::MeridiemLower => 'a',
            Self::MeridiemUpper => 'A',
            Self::Minute => 'i',
            Self::Second => 's',
            Self::Micro => 'u',
            Self::Milli => 'v',
            Self::IsoYear => 'o',
            Self::IsoWeek => 'W',
            Self::DayOfYear => 'z',
        }
    }
}

/// One element of a tokenized mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// Verbatim character, either escaped with `\` or not a known directive.
    Literal(char),
    /// Date/time component directive.
    Dir(Directive),
}

/// Error cases for parsing a textual value against a [`Mask`].
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Empty date string")]
    EmptyInput,
    #[display(fmt = "Expected {expected} at byte {at}")]
    Mismatch { expected: String, at: usize },
    #[display(fmt = "Unconsumed trailing input: {_0}")]
    TrailingInput(String),
    #[display(fmt = "Component {component} out of range: {value}")]
    OutOfRange { component: &'static str, value: i64 },
    #[display(fmt = "No such calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[display(fmt = "Unix epoch value out of range: {_0}")]
    InvalidEpoch(i64),
}

impl std::error::Error for ParseError {}

/// A format mask: an ordered sequence of directives and literal characters
/// in the PHP `date()` grammar, e.g. `Y-m-d` or `o-\WW`.
///
/// Tokenization never fails: unrecognized characters become literals, `\x`
/// escapes any character and a trailing lone backslash is kept verbatim.
///
/// Parsing and formatting with the same mask are inverse operations for any
/// value whose precision matches the mask's granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    raw: String,
    tokens: Vec<Token>,
}

impl Mask {
    /// Tokenizes a mask string.
    pub fn new(raw: &str) -> Self {
        let mut tokens = Vec::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                tokens.push(Token::Literal(chars.next().unwrap_or('\\')));
            } else if let Some(dir) = Directive::from_char(c) {
                tokens.push(Token::Dir(dir));
            } else {
                tokens.push(Token::Literal(c));
            }
        }
        Self {
            raw: raw.to_owned(),
            tokens,
        }
    }

    /// Returns the original mask string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the tokenized form of the mask.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Whether the mask contains the given directive.
    pub fn has_directive(&self, dir: Directive) -> bool {
        self.tokens.contains(&Token::Dir(dir))
    }

    /// Human-readable placeholder legend for this mask, used in the
    /// invalid-format validation message: `Y-m-d` becomes `YYYY-MM-DD`.
    pub fn legend(&self) -> String {
        let mut out = String::with_capacity(self.raw.len() * 2);
        for token in &self.tokens {
            match token {
                Token::Literal(c) => out.push(*c),
                Token::Dir(dir) => {
                    let c = dir.as_char();
                    match FORMAT_LEGEND.iter().find(|(lc, _)| *lc == c) {
                        Some((_, placeholder)) => out.push_str(placeholder),
                        None => out.push(c),
                    }
                }
            }
        }
        out
    }

    /// Renders a value through the mask. Never fails: directives absent
    /// from the mask are simply omitted from the output.
    pub fn format(&self, value: &NaiveDateTime) -> String {
        let mut out = String::with_capacity(self.raw.len() + 4);
        for token in &self.tokens {
            match token {
                Token::Literal(c) => out.push(*c),
                Token::Dir(dir) => format_directive(*dir, value, &mut out),
            }
        }
        out
    }

    /// Parses a textual value strictly against the mask.
    ///
    /// Every character of the input must be consumed; components not
    /// constrained by the mask reset to their Unix epoch zero values
    /// (1970-01-01 00:00:00.000000), so a partial mask never inherits
    /// wall-clock "now" values.
    pub fn parse(&self, input: &str) -> Result<NaiveDateTime, ParseError> {
        if input.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        let mut cursor = Cursor { input, pos: 0 };
        let mut fields = Fields::default();
        for token in &self.tokens {
            match token {
                Token::Literal(c) => cursor.expect_char(*c)?,
                Token::Dir(dir) => fields.consume(*dir, &mut cursor)?,
            }
        }
        if !cursor.rest().is_empty() {
            return Err(ParseError::TrailingInput(cursor.rest().to_owned()));
        }
        fields.resolve()
    }
}

impl From<&str> for Mask {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl std::fmt::Display for Mask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl serde::Serialize for Mask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> serde::Deserialize<'de> for Mask {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

/// Converts a Unix epoch second count (UTC) into a naive date-time value.
pub fn from_epoch(seconds: i64) -> Result<NaiveDateTime, ParseError> {
    chrono::DateTime::from_timestamp(seconds, 0)
        .map(|dt| dt.naive_utc())
        .ok_or(ParseError::InvalidEpoch(seconds))
}

fn format_directive(dir: Directive, value: &NaiveDateTime, out: &mut String) {
    let micros = (value.nanosecond() % 1_000_000_000) / 1_000;
    // Writing to a String is infallible.
    let _ = match dir {
        Directive::YearFull => write!(out, "{:04}", value.year()),
        Directive::YearShort => write!(out, "{:02}", value.year().rem_euclid(100)),
        Directive::MonthPad => write!(out, "{:02}", value.month()),
        Directive::Month => write!(out, "{}", value.month()),
        Directive::MonthShort => write!(out, "{}", MONTHS_SHORT[value.month0() as usize]),
        Directive::MonthLong => write!(out, "{}", MONTHS_LONG[value.month0() as usize]),
        Directive::DayPad => write!(out, "{:02}", value.day()),
        Directive::Day => write!(out, "{}", value.day()),
        Directive::WeekdayShort => write!(
            out,
            "{}",
            WEEKDAYS_SHORT[value.weekday().num_days_from_monday() as usize]
        ),
        Directive::WeekdayLong => write!(
            out,
            "{}",
            WEEKDAYS_LONG[value.weekday().num_days_from_monday() as usize]
        ),
        Directive::WeekdayIso => write!(out, "{}", value.weekday().number_from_monday()),
        Directive::Hour24Pad => write!(out, "{:02}", value.hour()),
        Directive::Hour24 => write!(out, "{}", value.hour()),
        Directive::Hour12Pad => write!(out, "{:02}", value.hour12().1),
        Directive::Hour12 => write!(out, "{}", value.hour12().1),
        Directive::MeridiemLower => write!(out, "{}", if value.hour12().0 { "pm" } else { "am" }),
        Directive::MeridiemUpper => write!(out, "{}", if value.hour12().0 { "PM" } else { "AM" }),
        Directive::Minute => write!(out, "{:02}", value.minute()),
        Directive::Second => write!(out, "{:02}", value.second()),
        Directive::Micro => write!(out, "{micros:06}"),
        Directive::Milli => write!(out, "{:03}", micros / 1_000),
        Directive::IsoYear => write!(out, "{:04}", value.iso_week().year()),
        Directive::IsoWeek => write!(out, "{:02}", value.iso_week().week()),
        Directive::DayOfYear => write!(out, "{}", value.ordinal0()),
    };
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        match self.rest().chars().next() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            _ => Err(ParseError::Mismatch {
                expected: format!("'{expected}'"),
                at: self.pos,
            }),
        }
    }

    /// Consumes 1 to `max` ASCII digits greedily.
    fn take_digits(&mut self, max: usize, component: &'static str) -> Result<i64, ParseError> {
        let digits: String = self.rest().chars().take_while(char::is_ascii_digit).take(max).collect();
        if digits.is_empty() {
            return Err(ParseError::Mismatch {
                expected: component.to_owned(),
                at: self.pos,
            });
        }
        self.pos += digits.len();
        digits.parse().map_err(|_| ParseError::OutOfRange {
            component,
            value: i64::MAX,
        })
    }

    /// Matches one of `names` case-insensitively (longest match wins)
    /// and returns its index in the table.
    fn take_name(
        &mut self,
        names: &[&str],
        component: &'static str,
    ) -> Result<usize, ParseError> {
        let mut found: Option<(usize, usize)> = None;
        for (idx, name) in names.iter().enumerate() {
            if let Some(prefix) = self.rest().get(..name.len()) {
                if prefix.eq_ignore_ascii_case(name)
                    && found.is_none_or(|(_, len)| name.len() > len)
                {
                    found = Some((idx, name.len()));
                }
            }
        }
        match found {
            Some((idx, len)) => {
                self.pos += len;
                Ok(idx)
            }
            None => Err(ParseError::Mismatch {
                expected: component.to_owned(),
                at: self.pos,
            }),
        }
    }
}

/// Components collected while walking the mask, resolved into a value
/// only once the whole input is consumed.
#[derive(Default)]
struct Fields {
    year: Option<i64>,
    month: Option<u32>,
    day: Option<u32>,
    hour24: Option<u32>,
    hour12: Option<u32>,
    is_pm: Option<bool>,
    minute: Option<u32>,
    second: Option<u32>,
    micro: Option<u32>,
    iso_year: Option<i64>,
    iso_week: Option<u32>,
    weekday: Option<u32>,
    day_of_year: Option<u32>,
}

impl Fields {
    fn consume(&mut self, dir: Directive, cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
        match dir {
            Directive::YearFull => {
                self.year = Some(cursor.take_digits(4, "year")?);
            }
            Directive::YearShort => {
                let v = cursor.take_digits(2, "year")?;
                self.year = Some(if v < SHORT_YEAR_PIVOT { 2000 + v } else { 1900 + v });
            }
            Directive::MonthPad | Directive::Month => {
                self.month = Some(ranged(cursor.take_digits(2, "month")?, 1, MAX_MONTH, "month")?);
            }
            Directive::MonthShort => {
                self.month = Some(cursor.take_name(&MONTHS_SHORT, "month name")? as u32 + 1);
            }
            Directive::MonthLong => {
                self.month = Some(cursor.take_name(&MONTHS_LONG, "month name")? as u32 + 1);
            }
            Directive::DayPad | Directive::Day => {
                self.day = Some(ranged(cursor.take_digits(2, "day")?, 1, 31, "day")?);
            }
            Directive::WeekdayShort => {
                self.weekday = Some(cursor.take_name(&WEEKDAYS_SHORT, "weekday name")? as u32 + 1);
            }
            Directive::WeekdayLong => {
                self.weekday = Some(cursor.take_name(&WEEKDAYS_LONG, "weekday name")? as u32 + 1);
            }
            Directive::WeekdayIso => {
                self.weekday = Some(ranged(cursor.take_digits(1, "weekday")?, 1, 7, "weekday")?);
            }
            Directive::Hour24Pad | Directive::Hour24 => {
                self.hour24 = Some(ranged(cursor.take_digits(2, "hour")?, 0, 23, "hour")?);
            }
            Directive::Hour12Pad | Directive::Hour12 => {
                self.hour12 = Some(ranged(cursor.take_digits(2, "hour")?, 1, 12, "hour")?);
            }
            Directive::MeridiemLower | Directive::MeridiemUpper => {
                let idx = cursor.take_name(&["am", "pm"], "meridiem")?;
                self.is_pm = Some(idx == 1);
            }
            Directive::Minute => {
                self.minute = Some(ranged(cursor.take_digits(2, "minute")?, 0, 59, "minute")?);
            }
            Directive::Second => {
                self.second = Some(ranged(cursor.take_digits(2, "second")?, 0, 59, "second")?);
            }
            Directive::Micro => {
                self.micro = Some(ranged(
                    cursor.take_digits(6, "microsecond")?,
                    0,
                    999_999,
                    "microsecond",
                )?);
            }
            Directive::Milli => {
                let v = ranged(cursor.take_digits(3, "millisecond")?, 0, 999, "millisecond")?;
                self.micro = Some(v * 1_000);
            }
            Directive::IsoYear => {
                self.iso_year = Some(cursor.take_digits(4, "week year")?);
            }
            Directive::IsoWeek => {
                self.iso_week = Some(ranged(
                    cursor.take_digits(2, "week")?,
                    1,
                    MAX_ISO_WEEK,
                    "week",
                )?);
            }
            Directive::DayOfYear => {
                self.day_of_year = Some(ranged(
                    cursor.take_digits(3, "day of year")?,
                    0,
                    365,
                    "day of year",
                )?);
            }
        }
        Ok(())
    }

    fn resolve(self) -> Result<NaiveDateTime, ParseError> {
        let date = if let (Some(iso_year), Some(iso_week)) = (self.iso_year, self.iso_week) {
            let weekday = iso_weekday(self.weekday.unwrap_or(1)).ok_or(ParseError::OutOfRange {
                component: "weekday",
                value: i64::from(self.weekday.unwrap_or(1)),
            })?;
            NaiveDate::from_isoywd_opt(iso_year as i32, iso_week, weekday).ok_or(
                ParseError::OutOfRange {
                    component: "week",
                    value: i64::from(iso_week),
                },
            )?
        } else if let (None, None, Some(ordinal0)) = (self.month, self.day, self.day_of_year) {
            let year = self.year.unwrap_or(1970) as i32;
            NaiveDate::from_yo_opt(year, ordinal0 + 1).ok_or(ParseError::OutOfRange {
                component: "day of year",
                value: i64::from(ordinal0),
            })?
        } else {
            let year = self.year.unwrap_or(1970) as i32;
            let month = self.month.unwrap_or(1);
            let day = self.day.unwrap_or(1);
            NaiveDate::from_ymd_opt(year, month, day).ok_or(ParseError::InvalidDate {
                year,
                month,
                day,
            })?
        };
        let hour = match (self.hour24, self.hour12) {
            (Some(h), _) => h,
            (None, Some(h)) => resolve_hour12(h, self.is_pm.unwrap_or(false)),
            (None, None) => 0,
        };
        let time = NaiveTime::from_hms_micro_opt(
            hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.micro.unwrap_or(0),
        )
        .ok_or(ParseError::OutOfRange {
            component: "hour",
            value: i64::from(hour),
        })?;
        Ok(date.and_time(time))
    }
}

fn ranged(value: i64, min: u32, max: u32, component: &'static str) -> Result<u32, ParseError> {
    if value < i64::from(min) || value > i64::from(max) {
        return Err(ParseError::OutOfRange { component, value });
    }
    Ok(value as u32)
}

const fn resolve_hour12(hour: u32, is_pm: bool) -> u32 {
    match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    }
}

const fn iso_weekday(n: u32) -> Option<Weekday> {
    Some(match n {
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        6 => Weekday::Sat,
        7 => Weekday::Sun,
        _ => return None,
    })
}
