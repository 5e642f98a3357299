//! Expression splitting and positional field assignment.
//!
//! Purely structural: trims the expression, splits on runs of
//! whitespace, checks the count against the enabled toggles, and assigns
//! fields by position. No grammar knowledge lives here.

use cron_schema_core::{CronFields, Options};
use tracing::debug;

use crate::error::CheckError;

/// Splits `expression` into its positional fields.
///
/// The expected field count is 5, plus one when `useSeconds` is enabled
/// (seconds become the first field) and one when `useYears` is enabled
/// (years become the last field).
///
/// # Examples
///
/// ```
/// use cron_schema_core::{resolve_options, InputOptions};
/// use cron_schema_validator::split_expression;
///
/// let options = resolve_options(&InputOptions::default()).unwrap();
/// let fields = split_expression("0 */4 * 1 6", &options).unwrap();
/// assert_eq!(fields.minutes, "0");
/// assert_eq!(fields.days_of_week, "6");
/// assert_eq!(fields.seconds, None);
/// ```
pub fn split_expression(expression: &str, options: &Options) -> Result<CronFields, CheckError> {
    let fields: Vec<&str> = expression.trim().split_whitespace().collect();
    let expected = options.expected_field_count();
    if fields.len() != expected {
        debug!(expected, actual = fields.len(), "field count mismatch");
        return Err(CheckError::FieldCount {
            expected,
            actual: fields.len(),
        });
    }

    let offset = usize::from(options.use_seconds);
    Ok(CronFields {
        seconds: options.use_seconds.then(|| fields[0].to_string()),
        minutes: fields[offset].to_string(),
        hours: fields[offset + 1].to_string(),
        days_of_month: fields[offset + 2].to_string(),
        months: fields[offset + 3].to_string(),
        days_of_week: fields[offset + 4].to_string(),
        years: options.use_years.then(|| fields[offset + 5].to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cron_schema_core::{InputOptions, OptionOverride, resolve_options};

    fn options(use_seconds: bool, use_years: bool) -> Options {
        resolve_options(&InputOptions::default().with_overrides(OptionOverride {
            use_seconds: Some(use_seconds),
            use_years: Some(use_years),
            ..OptionOverride::default()
        }))
        .unwrap()
    }

    #[test]
    fn test_five_field_assignment_is_positional() {
        let fields = split_expression("0 */4 * 1 6", &options(false, false)).unwrap();
        assert_eq!(fields.minutes, "0");
        assert_eq!(fields.hours, "*/4");
        assert_eq!(fields.days_of_month, "*");
        assert_eq!(fields.months, "1");
        assert_eq!(fields.days_of_week, "6");
        assert_eq!(fields.seconds, None);
        assert_eq!(fields.years, None);
    }

    #[test]
    fn test_seconds_shift_assignment() {
        let fields = split_expression("2 0 */4 * 1 6", &options(true, false)).unwrap();
        assert_eq!(fields.seconds.as_deref(), Some("2"));
        assert_eq!(fields.minutes, "0");
        assert_eq!(fields.days_of_week, "6");
    }

    #[test]
    fn test_years_are_last() {
        let fields = split_expression("0 * * * * 2038", &options(false, true)).unwrap();
        assert_eq!(fields.years.as_deref(), Some("2038"));
        assert_eq!(fields.days_of_week, "*");

        let fields = split_expression("2 0 * * * 6 2038", &options(true, true)).unwrap();
        assert_eq!(fields.seconds.as_deref(), Some("2"));
        assert_eq!(fields.years.as_deref(), Some("2038"));
    }

    #[test]
    fn test_count_mismatch() {
        let err = split_expression("* * * *", &options(false, false)).unwrap_err();
        assert_eq!(err, CheckError::FieldCount { expected: 5, actual: 4 });

        let err = split_expression("* * * * *", &options(true, true)).unwrap_err();
        assert_eq!(err, CheckError::FieldCount { expected: 7, actual: 5 });
    }

    #[test]
    fn test_whitespace_runs_and_padding_are_tolerated() {
        let fields = split_expression("  0   1\t2 3 4  ", &options(false, false)).unwrap();
        assert_eq!(fields.minutes, "0");
        assert_eq!(fields.days_of_week, "4");
    }
}
