use serde::{Deserialize, Serialize};

use crate::consts::{DATETIME_FORMAT, DATE_FORMAT, MONTH_FORMAT, TIME_FORMAT, WEEK_FORMAT};
use crate::format::Mask;
use crate::prelude::*;

/// The five HTML date/time input kinds. Each kind selects a default format
/// mask, the unit its step lattice is counted in, and whether the value
/// carries a meaningful time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum FieldKind {
    /// `<input type="date">`
    #[display(fmt = "date")]
    #[serde(rename = "date")]
    Date,
    /// `<input type="datetime-local">`
    #[display(fmt = "datetime-local")]
    #[serde(rename = "datetime-local")]
    DateTime,
    /// `<input type="time">`
    #[display(fmt = "time")]
    #[serde(rename = "time")]
    Time,
    /// `<input type="week">`
    #[display(fmt = "week")]
    #[serde(rename = "week")]
    Week,
    /// `<input type="month">`
    #[display(fmt = "month")]
    #[serde(rename = "month")]
    Month,
}

/// Calendar unit one step interval is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepUnit {
    #[display(fmt = "days")]
    Days,
    #[display(fmt = "seconds")]
    Seconds,
    #[display(fmt = "weeks")]
    Weeks,
    #[display(fmt = "months")]
    Months,
}

impl FieldKind {
    /// Default format mask for this kind, used when a field does not
    /// configure its own.
    pub fn default_mask(self) -> Mask {
        Mask::new(self.default_format())
    }

    /// Default format mask string for this kind.
    pub const fn default_format(self) -> &'static str {
        match self {
            Self::Date => DATE_FORMAT,
            Self::DateTime => DATETIME_FORMAT,
            Self::Time => TIME_FORMAT,
            Self::Week => WEEK_FORMAT,
            Self::Month => MONTH_FORMAT,
        }
    }

    /// Unit the step lattice is counted in for this kind.
    pub const fn step_unit(self) -> StepUnit {
        match self {
            Self::Date | Self::DateTime => StepUnit::Days,
            Self::Time => StepUnit::Seconds,
            Self::Week => StepUnit::Weeks,
            Self::Month => StepUnit::Months,
        }
    }

    /// Whether values of this kind carry a meaningful time of day.
    pub const fn with_time(self) -> bool {
        matches!(self, Self::DateTime | Self::Time)
    }

    /// Noun used in validation messages: "Field 'x' requires a valid
    /// {noun} format".
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::DateTime => "date time",
            Self::Time => "time",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_formats() {
        assert_eq!(FieldKind::Date.default_format(), "Y-m-d");
        assert_eq!(FieldKind::DateTime.default_format(), "Y-m-d\\TH:i");
        assert_eq!(FieldKind::Time.default_format(), "H:i");
        assert_eq!(FieldKind::Week.default_format(), "o-\\WW");
        assert_eq!(FieldKind::Month.default_format(), "Y-m");
    }

    #[test]
    fn test_step_units() {
        assert_eq!(FieldKind::Date.step_unit(), StepUnit::Days);
        assert_eq!(FieldKind::DateTime.step_unit(), StepUnit::Days);
        assert_eq!(FieldKind::Time.step_unit(), StepUnit::Seconds);
        assert_eq!(FieldKind::Week.step_unit(), StepUnit::Weeks);
        assert_eq!(FieldKind::Month.step_unit(), StepUnit::Months);
    }

    #[test]
    fn test_with_time() {
        assert!(FieldKind::DateTime.with_time());
        assert!(FieldKind::Time.with_time());
        assert!(!FieldKind::Date.with_time());
        assert!(!FieldKind::Week.with_time());
        assert!(!FieldKind::Month.with_time());
    }

    #[test]
    fn test_serde_html_input_types() {
        assert_eq!(
            serde_json::to_string(&FieldKind::DateTime).unwrap(),
            r#""datetime-local""#
        );
        let kind: FieldKind = serde_json::from_str(r#""week""#).unwrap();
        assert_eq!(kind, FieldKind::Week);
    }
}
