//! Validation error variants.
//!
//! One variant per concrete problem the splitter, the field grammar
//! validator, or the cross-field checks can report. Display strings name
//! the offending field by its camelCase name and quote the offending
//! token; the top-level entry points append the original expression.

use cron_schema_core::FieldKind;
use thiserror::Error;

/// A single validation finding.
///
/// Findings are collected, never short-circuited: every element of every
/// field contributes its own errors so the aggregate list is complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// Option resolution failed before any field was examined (unknown
    /// preset, malformed preset or override record).
    #[error("{message}")]
    OptionResolution { message: String },

    /// Wrong number of whitespace-separated fields for the enabled
    /// toggle combination.
    #[error("expected {expected} values, but got {actual}")]
    FieldCount { expected: usize, actual: usize },

    /// `?` in a non-day field, or blank days not enabled.
    #[error("blank day '?' is not allowed in {field} field")]
    BlankDayNotAllowed { field: FieldKind },

    /// Both day fields are `?` under `allowOnlyOneBlankDayField`.
    #[error("cannot use blank day '?' in both daysOfMonth and daysOfWeek field")]
    BothDayFieldsBlank,

    /// Neither day field is `?` under `mustHaveBlankDayField`.
    #[error("either daysOfMonth or daysOfWeek field must be a blank day '?'")]
    MissingBlankDayField,

    /// A special token (`L`, `W`, `#`) combined with list, range, or
    /// step syntax in the same field.
    #[error("'{token}' cannot be combined with lists, ranges or steps in {field} field")]
    SpecialTokenInList { token: char, field: FieldKind },

    /// Empty list element (e.g. trailing comma).
    #[error("one of the elements is empty in {field} field")]
    EmptyElement { field: FieldKind },

    /// Empty range endpoint (e.g. `5-`).
    #[error("one of the range elements is empty in {field} field")]
    EmptyRangeElement { field: FieldKind },

    /// Element is neither a number nor a recognized token.
    #[error("element '{element}' of {field} field is invalid")]
    InvalidNumber { element: String, field: FieldKind },

    /// Element is numeric but not a whole number.
    #[error("element '{element}' of {field} field is not a whole number")]
    NotAnInteger { element: String, field: FieldKind },

    /// Number below the field's effective lower limit.
    #[error("number {value} of {field} field is smaller than lower limit '{limit}'")]
    BelowLowerLimit {
        value: u32,
        field: FieldKind,
        limit: u32,
    },

    /// Number above the field's effective upper limit.
    #[error("number {value} of {field} field is bigger than upper limit '{limit}'")]
    AboveUpperLimit {
        value: u32,
        field: FieldKind,
        limit: u32,
    },

    /// `*` used as a range endpoint.
    #[error("'*' can't be part of a range in {field} field")]
    WildcardInRange { field: FieldKind },

    /// `*` used while the effective limits are narrower than the
    /// preset's absolute range.
    #[error("'*' is not allowed in {field} field when limits are narrower than {min}-{max}")]
    WildcardLimitMismatch {
        field: FieldKind,
        min: u32,
        max: u32,
    },

    /// More than one `-` in a range.
    #[error("list element '{element}' is not valid (more than one '-')")]
    TooManyRangeSeparators { element: String },

    /// Lower range end resolves above the upper range end.
    #[error("lower range end '{lower}' is bigger than upper range end '{upper}' of {field} field")]
    RangeOrderInverted {
        lower: u32,
        upper: u32,
        field: FieldKind,
    },

    /// More than one `/` in a list element.
    #[error("list element '{element}' is not valid (more than one '/')")]
    TooManyStepSeparators { element: String },

    /// Step separator with nothing after it (e.g. `*/`).
    #[error("step value is empty in {field} field")]
    EmptyStep { field: FieldKind },

    /// Step is not a positive whole number.
    #[error("step value '{step}' of {field} field is not a positive whole number")]
    InvalidStep { step: String, field: FieldKind },

    /// Step above the field's effective upper limit.
    #[error("step value {step} of {field} field is bigger than upper limit '{limit}'")]
    StepAboveUpperLimit {
        step: u32,
        field: FieldKind,
        limit: u32,
    },

    /// Step wider than the span of the range it repeats over.
    #[error("step value {step} of {field} field exceeds the span of range {lower}-{upper}")]
    StepExceedsRangeSpan {
        step: u32,
        lower: u32,
        upper: u32,
        field: FieldKind,
    },

    /// `L` used while last-day tokens are disabled for the field.
    #[error("'L' is not allowed in {field} field")]
    LastDayNotAllowed { field: FieldKind },

    /// `W` used while nearest-weekday tokens are disabled.
    #[error("'W' is not allowed in {field} field")]
    NearestWeekdayNotAllowed { field: FieldKind },

    /// Bare `W` with no day-of-month in front of it.
    #[error("'W' must be preceded by a day of month in {field} field")]
    MissingNearestWeekdayValue { field: FieldKind },

    /// `#` used while nth-weekday tokens are disabled.
    #[error("'#' is not allowed in {field} field")]
    NthWeekdayNotAllowed { field: FieldKind },

    /// More than one `#` in an element.
    #[error("list element '{element}' is not valid (more than one '#')")]
    TooManyNthSeparators { element: String },

    /// The occurrence count after `#` is not a positive whole number.
    #[error("nth weekday '{value}' of {field} field is not a positive whole number")]
    InvalidNthWeekday { value: String, field: FieldKind },

    /// The occurrence count after `#` is outside 1-5.
    #[error("nth weekday '#{value}' of {field} field must be between 1 and 5")]
    NthWeekdayOutOfRange { value: u32, field: FieldKind },
}
