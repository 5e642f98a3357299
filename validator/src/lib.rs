//! Grammar validation of cron expressions against configurable dialect
//! presets.
//!
//! An expression is validated in three stages:
//!
//! 1. The caller's [`InputOptions`] (preset name or literal preset plus
//!    overrides) are resolved into concrete [`Options`] by
//!    `cron-schema-core`.
//! 2. [`split_expression`] breaks the expression into 5, 6, or 7
//!    positional fields depending on the enabled toggles.
//! 3. [`check_field`] validates each field against the grammar
//!    `"?" | list` / `list := base("/"step)? ("," ...)*` /
//!    `base := "*" | atom | atom "-" atom`, including the vendor tokens
//!    (`L`, `nL`, `nW`, `LW`, `n#k`), symbolic aliases, and the
//!    per-field numeric bounds; cross-field blank-day rules run once per
//!    expression.
//!
//! Errors are collected, never short-circuited: the caller receives
//! either the parsed [`CronFields`] or the complete list of problems,
//! each annotated with the original expression.
//!
//! # Main entry points
//!
//! - [`validate`] — validate under the `default` preset.
//! - [`validate_with`] — validate under explicit [`InputOptions`].
//! - [`check_expression`] — same, but with typed [`CheckError`] values.
//! - [`is_valid`] — boolean convenience wrapper.
//!
//! # Example
//!
//! ```
//! use cron_schema_core::{InputOptions, OptionOverride};
//! use cron_schema_validator::{validate, validate_with};
//!
//! let fields = validate("0 */4 * 1 6").unwrap();
//! assert_eq!(fields.hours, "*/4");
//!
//! let input = InputOptions::default().with_overrides(OptionOverride {
//!     use_seconds: Some(true),
//!     ..OptionOverride::default()
//! });
//! let fields = validate_with("2 0 */4 * 1 6", &input).unwrap();
//! assert_eq!(fields.seconds.as_deref(), Some("2"));
//!
//! let errors = validate("1/2/3 * * * *").unwrap_err();
//! assert!(errors[0].contains("'/'"));
//! assert!(errors[0].contains("1/2/3 * * * *"));
//! ```

mod error;
mod field;
mod report;
mod split;

pub use error::CheckError;
pub use field::check_field;
pub use report::ValidationReport;
pub use split::split_expression;

use cron_schema_core::{CronFields, FieldKind, InputOptions, Options, resolve_options};
use tracing::debug;

/// Validates an expression under the `default` preset (5 fields, no
/// extensions).
pub fn validate(expression: &str) -> Result<CronFields, Vec<String>> {
    validate_with(expression, &InputOptions::default())
}

/// Validates an expression under explicit input options.
///
/// On failure, every error message is annotated with the original
/// expression text. Option resolution failures (unknown preset,
/// malformed override) are reported the same way, as a single-element
/// list.
pub fn validate_with(expression: &str, input: &InputOptions) -> Result<CronFields, Vec<String>> {
    check_expression(expression, input).map_err(|errors| {
        errors
            .iter()
            .map(|error| format!("{error} (input cron: '{expression}')"))
            .collect()
    })
}

/// Validates an expression, returning typed errors without the
/// expression annotation.
pub fn check_expression(
    expression: &str,
    input: &InputOptions,
) -> Result<CronFields, Vec<CheckError>> {
    let options = resolve_options(input).map_err(|error| {
        vec![CheckError::OptionResolution {
            message: error.to_string(),
        }]
    })?;

    let fields = split_expression(expression, &options).map_err(|error| vec![error])?;

    let mut errors = Vec::new();
    for kind in FieldKind::ALL {
        if let Some(raw) = fields.field(kind) {
            errors.extend(check_field(raw, kind, &options));
        }
    }
    errors.extend(check_blank_day_fields(&fields, &options));

    if errors.is_empty() {
        Ok(fields)
    } else {
        debug!(expression, count = errors.len(), "expression rejected");
        Err(errors)
    }
}

/// Whether an expression is valid under the `default` preset.
pub fn is_valid(expression: &str) -> bool {
    validate(expression).is_ok()
}

/// Whether an expression is valid under explicit input options.
pub fn is_valid_with(expression: &str, input: &InputOptions) -> bool {
    validate_with(expression, input).is_ok()
}

/// Cross-field blank-day rules, applied once per expression. Both rules
/// compare the raw whole-field text: a `?` inside a list does not count.
fn check_blank_day_fields(fields: &CronFields, options: &Options) -> Vec<CheckError> {
    let dom_blank = fields.days_of_month == "?";
    let dow_blank = fields.days_of_week == "?";

    let mut errors = Vec::new();
    if options.allow_only_one_blank_day_field && dom_blank && dow_blank {
        errors.push(CheckError::BothDayFieldsBlank);
    }
    if options.must_have_blank_day_field && !dom_blank && !dow_blank {
        errors.push(CheckError::MissingBlankDayField);
    }
    errors
}
