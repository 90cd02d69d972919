//! Normalization and validation engine for HTML date/time form inputs.
//!
//! A [`DateField`] is configured once (kind, format mask, optional timezone,
//! min/max/step) and then validates raw submitted values: text is parsed
//! strictly against a PHP `date()`-style [`Mask`], converted from the ambient
//! display timezone into the field's storage timezone, rounded to the
//! granularity of its [`FieldKind`], and checked against the configured
//! range and step lattice. The outcome is a canonical
//! [`chrono::NaiveDateTime`] plus a list of structured validation errors;
//! the surrounding form framework decides what to do with them.
//!
//! ```
//! use datefield::{DateField, FieldKind};
//!
//! let field = DateField::builder("entry_date", FieldKind::Date)
//!     .default_mask()
//!     .min("2017-01-01")
//!     .max("2018-06-24")
//!     .build()
//!     .unwrap();
//!
//! let outcome = field.validate("2017-06-01", chrono_tz::UTC);
//! assert!(outcome.is_ok());
//! ```

mod consts;
mod format;
mod kind;
mod prelude;
mod range;
mod round;
mod step;
mod timezone;

pub use consts::*;
pub use format::{Directive, Mask, ParseError, Token, from_epoch};
pub use kind::{FieldKind, StepUnit};
pub use range::{DateRange, RangeViolation};
pub use round::round;
pub use step::matches_step;
pub use timezone::{Direction, convert, offset_seconds};

pub use chrono_tz::Tz;

use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::consts::is_safe_input_char;
use crate::prelude::*;

/// Raw input accepted everywhere a date-time value enters the engine:
/// submitted text, a Unix epoch second count, or an already-typed value.
#[derive(Debug, Clone, PartialEq, From)]
pub enum RawValue {
    Text(String),
    Epoch(i64),
    Value(NaiveDateTime),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// Configuration errors, raised at field setup time rather than deferred
/// to validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No format mask was ever set on the field.
    #[error("No format mask defined for field '{field}'")]
    MissingFormat { field: String },

    /// The configured timezone name is not in the tz database.
    #[error("Unknown time zone '{name}' for field '{field}'")]
    UnknownTimeZone { field: String, name: String },

    /// A min/max bound or the current value could not be converted into a
    /// date-time with the field's mask.
    #[error("Cannot parse {what} for field '{field}' with mask '{mask}': {source}")]
    InvalidBoundary {
        field: String,
        what: &'static str,
        mask: String,
        #[source]
        source: ParseError,
    },

    /// Step sizes are positive unit counts.
    #[error("Step for field '{field}' must be a positive number, got {step}")]
    InvalidStep { field: String, step: i64 },
}

/// Machine-readable validation error codes surfaced to the form framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    DateInvalid,
    TooLow,
    TooHigh,
    StepMismatch,
}

/// One validation failure: the field it happened on, a code, and formatted
/// string arguments for message interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    field: String,
    kind: FieldKind,
    code: ErrorCode,
    args: Vec<String>,
}

impl ValidationError {
    /// Name of the field the error belongs to.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Interpolation arguments: the mask legend for [`ErrorCode::DateInvalid`],
    /// the formatted bound for the range codes, the step size and formatted
    /// start point for [`ErrorCode::StepMismatch`].
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let noun = self.kind.noun();
        let arg = |i: usize| self.args.get(i).map_or("", String::as_str);
        match self.code {
            ErrorCode::DateInvalid => write!(
                f,
                "Field '{}' requires a valid {noun} format: '{}'.",
                self.field,
                arg(0)
            ),
            ErrorCode::TooLow => write!(
                f,
                "Field '{}' requires {noun} higher or equal to '{}'.",
                self.field,
                arg(0)
            ),
            ErrorCode::TooHigh => write!(
                f,
                "Field '{}' requires {noun} lower or equal to '{}'.",
                self.field,
                arg(0)
            ),
            ErrorCode::StepMismatch => write!(
                f,
                "Field '{}' requires {noun} in predefined {} interval '{}' from start point '{}'.",
                self.field,
                self.kind.step_unit(),
                arg(0),
                arg(1)
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Outcome of one validation call: the canonical value (when one could be
/// produced) and every validation error collected along the way.
///
/// Range violations leave the parsed value in place; a step mismatch
/// replaces it with the field's current value, the last known-good point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    pub value: Option<NaiveDateTime>,
    pub errors: Vec<ValidationError>,
}

impl Validated {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A configured date/time form field validator.
///
/// Configuration is immutable after [`DateFieldBuilder::build`]; a single
/// field definition can validate any number of submissions, concurrently if
/// needed, since nothing here is mutated per call.
#[derive(Debug, Clone, PartialEq)]
pub struct DateField {
    name: String,
    kind: FieldKind,
    mask: Mask,
    time_zone: Option<Tz>,
    range: DateRange,
    step: Option<i64>,
    value: Option<NaiveDateTime>,
}

impl DateField {
    /// Starts building a field of the given kind.
    pub fn builder(name: &str, kind: FieldKind) -> DateFieldBuilder {
        DateFieldBuilder::new(name, kind)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    pub const fn mask(&self) -> &Mask {
        &self.mask
    }

    pub const fn time_zone(&self) -> Option<Tz> {
        self.time_zone
    }

    pub const fn range(&self) -> &DateRange {
        &self.range
    }

    pub const fn step(&self) -> Option<i64> {
        self.step
    }

    /// The field's current value, used as the step-lattice origin and as
    /// the fallback when a submission fails the step check.
    pub const fn value(&self) -> Option<NaiveDateTime> {
        self.value
    }

    /// Replaces the current value, typically after a successful submit.
    pub fn set_value(&mut self, value: Option<NaiveDateTime>) {
        self.value = value;
    }

    /// Runs the full validation pipeline on one raw submitted value:
    /// parse, timezone-to-storage, round, range check, step check.
    ///
    /// `ambient_tz` is the timezone the application currently displays
    /// dates in; it only matters for fields that declare a storage
    /// timezone of their own.
    pub fn validate(&self, raw: impl Into<RawValue>, ambient_tz: Tz) -> Validated {
        let mut errors = Vec::new();
        let parsed = match raw.into() {
            RawValue::Value(value) => Some(value),
            RawValue::Epoch(seconds) => match format::from_epoch(seconds) {
                Ok(value) => Some(value),
                Err(_) => {
                    errors.push(self.invalid_format_error());
                    None
                }
            },
            RawValue::Text(text) => {
                let trimmed = text.trim();
                let sanitized: String =
                    trimmed.chars().filter(|c| is_safe_input_char(*c)).collect();
                if sanitized.is_empty() {
                    // Nothing submitted once dangerous characters are
                    // stripped: no value, but not an error either.
                    return Validated {
                        value: None,
                        errors,
                    };
                }
                if sanitized.len() != trimmed.len() {
                    errors.push(self.invalid_format_error());
                    None
                } else {
                    match self.mask.parse(trimmed) {
                        Ok(value) => Some(value),
                        Err(_) => {
                            errors.push(self.invalid_format_error());
                            None
                        }
                    }
                }
            }
        };
        // An unparseable submission terminates the pipeline: range and step
        // checks are meaningless without a value.
        let Some(parsed) = parsed else {
            return Validated {
                value: None,
                errors,
            };
        };

        let stored = timezone::convert(parsed, self.time_zone, ambient_tz, Direction::ToStorage);
        let rounded = round::round(stored, self.kind, &self.mask);

        for violation in self.range.check(&rounded) {
            let (code, bound) = match violation {
                RangeViolation::TooLow => (ErrorCode::TooLow, self.range.min),
                RangeViolation::TooHigh => (ErrorCode::TooHigh, self.range.max),
            };
            let formatted = bound.map(|b| self.mask.format(&b)).unwrap_or_default();
            errors.push(self.error(code, vec![formatted]));
        }

        let mut value = rounded;
        if let (Some(step), Some(origin)) = (self.step, self.value) {
            if !step::matches_step(&rounded, &origin, step, self.kind.step_unit(), &self.mask) {
                errors.push(self.error(
                    ErrorCode::StepMismatch,
                    vec![step.to_string(), self.mask.format(&origin)],
                ));
                // Step failure reverts to the last good value instead of
                // keeping the off-lattice one.
                value = origin;
            }
        }

        Validated {
            value: Some(value),
            errors,
        }
    }

    /// Renders a stored value for display: timezone-to-display conversion
    /// followed by the mask. `None` renders as the empty string.
    pub fn render(&self, value: Option<&NaiveDateTime>, ambient_tz: Tz) -> String {
        match value {
            None => String::new(),
            Some(value) => {
                let displayed =
                    timezone::convert(*value, self.time_zone, ambient_tz, Direction::ToDisplay);
                self.mask.format(&displayed)
            }
        }
    }

    fn invalid_format_error(&self) -> ValidationError {
        self.error(ErrorCode::DateInvalid, vec![self.mask.legend()])
    }

    fn error(&self, code: ErrorCode, args: Vec<String>) -> ValidationError {
        ValidationError {
            field: self.name.clone(),
            kind: self.kind,
            code,
            args,
        }
    }
}

/// Fallible builder for [`DateField`]; every configuration mistake is
/// reported from [`build`](Self::build), before any value is accepted.
#[derive(Debug, Clone)]
pub struct DateFieldBuilder {
    name: String,
    kind: FieldKind,
    mask: Option<Mask>,
    time_zone: Option<String>,
    min: Option<RawValue>,
    max: Option<RawValue>,
    step: Option<i64>,
    value: Option<RawValue>,
}

impl DateFieldBuilder {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            mask: None,
            time_zone: None,
            min: None,
            max: None,
            step: None,
            value: None,
        }
    }

    /// Sets an explicit format mask.
    pub fn mask(mut self, mask: &str) -> Self {
        self.mask = Some(Mask::new(mask));
        self
    }

    /// Uses the kind's default mask (`Y-m-d` for a date field and so on).
    pub fn default_mask(mut self) -> Self {
        self.mask = Some(self.kind.default_mask());
        self
    }

    /// Declares the field's storage timezone by tz-database name.
    pub fn time_zone(mut self, name: &str) -> Self {
        self.time_zone = Some(name.to_owned());
        self
    }

    /// Minimum allowed value, as text in the field's mask, an epoch second
    /// count, or a typed value.
    pub fn min(mut self, min: impl Into<RawValue>) -> Self {
        self.min = Some(min.into());
        self
    }

    /// Maximum allowed value, in the same forms as [`min`](Self::min).
    pub fn max(mut self, max: impl Into<RawValue>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Step size, counted in the kind's unit (days, seconds, weeks, months).
    pub fn step(mut self, step: i64) -> Self {
        self.step = Some(step);
        self
    }

    /// Current field value, the origin of the step lattice.
    pub fn value(mut self, value: impl Into<RawValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn build(self) -> Result<DateField, ConfigError> {
        let mask = self.mask.ok_or_else(|| ConfigError::MissingFormat {
            field: self.name.clone(),
        })?;
        let time_zone = match self.time_zone {
            None => None,
            Some(name) => {
                Some(Tz::from_str(&name).map_err(|_| ConfigError::UnknownTimeZone {
                    field: self.name.clone(),
                    name,
                })?)
            }
        };
        let min = self
            .min
            .map(|raw| boundary(raw, &mask, &self.name, "minimum"))
            .transpose()?;
        let max = self
            .max
            .map(|raw| boundary(raw, &mask, &self.name, "maximum"))
            .transpose()?;
        let value = self
            .value
            .map(|raw| boundary(raw, &mask, &self.name, "current value"))
            .transpose()?;
        if let Some(step) = self.step {
            if step < 1 {
                return Err(ConfigError::InvalidStep {
                    field: self.name,
                    step,
                });
            }
        }
        Ok(DateField {
            name: self.name,
            kind: self.kind,
            mask,
            time_zone,
            range: DateRange::new(min, max),
            step: self.step,
            value,
        })
    }
}

fn boundary(
    raw: RawValue,
    mask: &Mask,
    field: &str,
    what: &'static str,
) -> Result<NaiveDateTime, ConfigError> {
    let result = match raw {
        RawValue::Value(value) => Ok(value),
        RawValue::Epoch(seconds) => format::from_epoch(seconds),
        RawValue::Text(text) => mask.parse(text.trim()),
    };
    result.map_err(|source| ConfigError::InvalidBoundary {
        field: field.to_owned(),
        what,
        mask: mask.as_str().to_owned(),
        source,
    })
}
